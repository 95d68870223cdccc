//! Application State
//!
//! `AppState` is the single state container handed to the router. The
//! `FromRef` impls let handlers extract just the piece they need
//! (`State<PgPool>`, `State<CleanupQueue>`, ...) instead of the whole struct.
//!
//! There is no in-process mutable state shared across requests: the pool and
//! the cleanup queue are both internally synchronized, and everything else is
//! read-only configuration.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::email::Mailer;
use crate::backend::server::config::Config;
use crate::backend::uploads::cleanup::CleanupQueue;

#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool. Required; the server refuses to start
    /// without its store.
    pub pool: PgPool,

    /// Startup-resolved configuration (JWT secret, upload root, ...).
    pub config: Arc<Config>,

    /// Outbound mail. `None` when SMTP is unconfigured; callers degrade to
    /// logging.
    pub mailer: Option<Mailer>,

    /// Queue feeding the background file-deletion worker.
    pub cleanup: CleanupQueue,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Option<Mailer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for CleanupQueue {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cleanup.clone()
    }
}
