//! Backend Module
//!
//! The complete HTTP backend for forkfeed, a recipe-sharing social network:
//! registration and sessions, recipes with images and tags, likes, ratings
//! with reactions and replies, and the follow graph.
//!
//! # Architecture
//!
//! - **`server`** - configuration, shared state, application assembly
//! - **`routes`** - route tables and router construction
//! - **`auth`** - identity, JWT sessions, password reset
//! - **`middleware`** - bearer-token middleware and the `AuthUser` extractor
//! - **`recipes`** - feed/detail aggregation, CRUD, like toggle, tags
//! - **`ratings`** - rating upsert, reactions, replies
//! - **`tags`** - the tag catalog
//! - **`users`** - profiles and the follow graph
//! - **`uploads`** - image storage and the background cleanup worker
//! - **`email`** - outbound SMTP (reset codes)
//! - **`error`** - the `ApiError` taxonomy
//!
//! # Request flow
//!
//! Protected routes pass through `middleware::auth` (verify token, confirm
//! the user exists, attach identity), then the handler runs its queries
//! against the pool and folds derived counts into the response. Multi-step
//! writes (recipe + tag associations, rating cascade delete) run inside
//! explicit transactions. Stale uploaded files are handed to the supervised
//! cleanup worker instead of being deleted inline.

pub mod auth;
pub mod email;
pub mod error;
pub mod middleware;
pub mod ratings;
pub mod recipes;
pub mod routes;
pub mod server;
pub mod tags;
pub mod uploads;
pub mod users;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{create_app, AppState, Config};
