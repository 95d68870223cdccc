//! Authentication Middleware
//!
//! Extracts and verifies the bearer token on protected routes, confirms the
//! user still exists, and attaches the identity to request extensions.
//! Handlers pick it up through the `AuthUser` extractor, so the "current
//! user" is always request-scoped state, never ambient.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::ApiError;
use crate::backend::server::state::AppState;

/// Identity derived from a verified bearer token.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

/// Middleware for protected routes.
///
/// 1. Read the `Authorization: Bearer <token>` header.
/// 2. Verify signature and expiry.
/// 3. Confirm the user row still exists (tokens outlive account deletion).
/// 4. Attach `AuthenticatedUser` to request extensions.
///
/// Returns 401 on any failure.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("missing Authorization header");
            ApiError::unauthorized("Missing token.")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("malformed Authorization header");
        ApiError::unauthorized("Malformed Authorization header.")
    })?;

    let claims = verify_token(&app_state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("invalid token: {e}");
        ApiError::unauthorized("Invalid or expired token.")
    })?;

    let user_id = claims.user_id().ok_or_else(|| {
        tracing::error!(sub = %claims.sub, "non-numeric user id in token");
        ApiError::unauthorized("Invalid token.")
    })?;

    let exists = get_user_by_id(&app_state.pool, user_id).await?.is_some();

    if !exists {
        tracing::warn!(user_id, "token for deleted user");
        return Err(ApiError::unauthorized("Invalid token."));
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Extractor handing handlers the authenticated user set by the middleware.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser missing from request extensions");
                ApiError::unauthorized("Missing token.")
            })?;

        Ok(AuthUser(user))
    }
}
