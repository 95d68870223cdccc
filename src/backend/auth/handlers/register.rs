//! Registration handler for POST /auth/register.
//!
//! Validation, then bcrypt, then a single insert. Duplicates are detected by
//! the store's unique constraints rather than a read-then-insert probe, so
//! two racing registrations cannot both succeed.

use axum::{extract::State, http::StatusCode, Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{RegisterRequest, RegisterResponse};
use crate::backend::auth::users::create_user;
use crate::backend::error::ApiError;

pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(ApiError::validation("Please fill in all fields."));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))?;

    let user = match create_user(&pool, request.username.trim(), request.email.trim(), &password_hash)
        .await
    {
        Ok(user) => user,
        Err(e) => {
            let err = ApiError::from(e);
            if err.is_unique_violation() {
                return Err(ApiError::conflict("Email or username already in use."));
            }
            return Err(err);
        }
    };

    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully!".to_string(),
            user_id: user.id,
        }),
    ))
}
