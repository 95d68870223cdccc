//! Forkfeed - recipe-sharing social network backend.
//!
//! REST endpoints over PostgreSQL: users register and follow each other,
//! post recipes with images and tags, like them, and rate them with
//! reactions and replies. See `backend` for the module tree; the
//! `forkfeed-server` binary in `backend/main.rs` wires it to a listener.

pub mod backend;
