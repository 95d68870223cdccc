//! User rows and identity queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_path: Option<String>,
    pub reset_code_hash: Option<String>,
    pub reset_code_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar_path, \
     reset_code_hash, reset_code_expires_at, created_at";

/// Insert a new user. A duplicate username or email surfaces as the store's
/// unique-violation error; the register handler maps that to 409.
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ($1, $2, $3) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Store a reset-code digest and its expiry, replacing any previous one.
pub async fn set_reset_code(
    pool: &PgPool,
    user_id: i64,
    code_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET reset_code_hash = $1, reset_code_expires_at = $2 WHERE id = $3",
    )
    .bind(code_hash)
    .bind(expires_at)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Find the user whose email matches and whose stored reset digest equals
/// `code_hash` and has not expired. `None` covers both a wrong code and an
/// expired one; callers answer 400 either way.
pub async fn find_user_with_valid_reset_code(
    pool: &PgPool,
    email: &str,
    code_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users \
         WHERE email = $1 AND reset_code_hash = $2 AND reset_code_expires_at > now()"
    ))
    .bind(email)
    .bind(code_hash)
    .fetch_optional(pool)
    .await
}

/// Set a new password hash and clear the reset-code columns in one statement.
pub async fn update_password_and_clear_reset(
    pool: &PgPool,
    user_id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users \
         SET password_hash = $1, reset_code_hash = NULL, reset_code_expires_at = NULL \
         WHERE id = $2",
    )
    .bind(password_hash)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete the user row. Recipes, likes, ratings, reactions, replies and
/// follow edges go with it via the store's cascades.
pub async fn delete_user(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
