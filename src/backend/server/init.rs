//! Server Initialization
//!
//! Builds the Axum application: connect the pool, run migrations, start the
//! upload-cleanup worker, assemble the router.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use crate::backend::email::Mailer;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::Config;
use crate::backend::server::state::AppState;
use crate::backend::uploads::cleanup::spawn_cleanup_worker;

/// Create and configure the Axum application.
///
/// Steps:
/// 1. Connect the PostgreSQL pool (fatal on failure; the API is nothing
///    without its store).
/// 2. Run migrations.
/// 3. Build the mailer if SMTP is configured.
/// 4. Spawn the background upload-cleanup worker.
/// 5. Assemble the router with the shared state.
pub async fn create_app(config: Config) -> Result<Router, Box<dyn std::error::Error>> {
    tracing::info!("connecting to database");
    let pool = PgPool::connect(&config.database_url).await?;

    tracing::info!("running database migrations");
    sqlx::migrate!().run(&pool).await?;

    let mailer = match &config.smtp {
        Some(smtp) => match Mailer::new(smtp) {
            Ok(mailer) => Some(mailer),
            Err(e) => {
                tracing::error!("failed to build SMTP transport: {e}");
                None
            }
        },
        None => None,
    };

    let cleanup = spawn_cleanup_worker(config.upload_dir.clone());

    let state = AppState {
        pool,
        config: Arc::new(config),
        mailer,
        cleanup,
    };

    tracing::info!("router configured");
    Ok(create_router(state))
}
