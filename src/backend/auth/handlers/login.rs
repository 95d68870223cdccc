//! Login handler for POST /auth/login.
//!
//! Unknown email and wrong password return the same 401 so the endpoint does
//! not leak which accounts exist.

use std::sync::Arc;

use axum::{extract::State, Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::ApiError;
use crate::backend::server::config::Config;

pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Arc<Config>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::validation("Please fill in all fields."));
    }

    let user = get_user_by_email(&pool, request.email.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials."))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| ApiError::internal(format!("password verification failed: {e}")))?;

    if !valid {
        tracing::warn!(user_id = user.id, "login with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials."));
    }

    let token = create_token(&config.jwt_secret, user.id, &user.username)
        .map_err(|e| ApiError::internal(format!("token creation failed: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login successful!".to_string(),
        token,
        id: user.id,
        username: user.username,
    }))
}
