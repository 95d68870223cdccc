//! Account deletion handler for POST /auth/delete-account.
//!
//! Requires a fresh password confirmation on top of the bearer token. The
//! user row is removed; recipes, engagement rows and follow edges cascade at
//! the store.

use axum::{extract::State, Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{DeleteAccountRequest, MessageResponse};
use crate::backend::auth::users::{delete_user, get_user_by_id};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;

pub async fn delete_account(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.password.is_empty() {
        return Err(ApiError::validation("Password is required."));
    }

    let row = get_user_by_id(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    let valid = verify(&request.password, &row.password_hash)
        .map_err(|e| ApiError::internal(format!("password verification failed: {e}")))?;

    if !valid {
        return Err(ApiError::forbidden("Incorrect password."));
    }

    delete_user(&pool, user.user_id).await?;

    tracing::info!(user_id = user.user_id, "account deleted");

    Ok(Json(MessageResponse::new("Account deleted successfully.")))
}
