//! Recipes: feed and detail aggregation, create/update/delete, like toggle,
//! tag associations.
//!
//! - **`db`** - queries and transactions against the store
//! - **`handlers`** - HTTP handlers, including multipart form parsing
//! - **`types`** - row and wire types

pub mod db;
pub mod handlers;
pub mod types;
