//! Router assembly.
//!
//! Merges the public and protected API route tables, mounts static file
//! services for uploaded images and avatars, and applies the cross-cutting
//! layers (request tracing, body-size limit).

use axum::{extract::DefaultBodyLimit, http::StatusCode, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::backend::routes::api_routes;
use crate::backend::server::state::AppState;
use crate::backend::uploads::{AVATAR_DIR, RECIPE_IMAGE_DIR};

/// Body limit for multipart uploads: the 5 MB image plus form fields.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let uploads_dir = state.config.upload_dir.join(RECIPE_IMAGE_DIR);
    let avatars_dir = state.config.upload_dir.join(AVATAR_DIR);

    Router::new()
        .merge(api_routes::public_routes())
        .merge(api_routes::protected_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .nest_service("/avatars", ServeDir::new(avatars_dir))
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
