//! Profile and follow-graph queries.

use sqlx::PgPool;

use crate::backend::users::types::{FollowListEntry, Profile, PublicProfile};

pub async fn get_profile(pool: &PgPool, user_id: i64) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, username, email, avatar_path, created_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Rename the user. A duplicate username surfaces as the store's
/// unique-violation error; the handler maps that to 409.
pub async fn update_username(
    pool: &PgPool,
    user_id: i64,
    username: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET username = $1 WHERE id = $2")
        .bind(username)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Point the user's avatar at a new stored file, returning the previous path
/// so the caller can schedule its cleanup.
pub async fn update_avatar(
    pool: &PgPool,
    user_id: i64,
    avatar_path: Option<&str>,
) -> Result<Option<String>, sqlx::Error> {
    let old: Option<Option<String>> =
        sqlx::query_scalar("SELECT avatar_path FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    sqlx::query("UPDATE users SET avatar_path = $1 WHERE id = $2")
        .bind(avatar_path)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(old.flatten())
}

pub async fn get_public_profile(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<PublicProfile>, sqlx::Error> {
    sqlx::query_as::<_, PublicProfile>(
        "SELECT u.id, u.username, u.avatar_path, \
                (SELECT COUNT(*) FROM recipes r WHERE r.user_id = u.id) AS recipe_count, \
                (SELECT COUNT(*) FROM follows f WHERE f.followed_id = u.id) AS follower_count, \
                (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count \
         FROM users u \
         WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn user_exists(pool: &PgPool, user_id: i64) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

/// Create a follow edge. Returns `false` when the edge already existed.
pub async fn follow(pool: &PgPool, follower_id: i64, followed_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO follows (follower_id, followed_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a follow edge. Removing a non-edge is a no-op.
pub async fn unfollow(pool: &PgPool, follower_id: i64, followed_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn is_following(
    pool: &PgPool,
    follower_id: i64,
    followed_id: i64,
) -> Result<bool, sqlx::Error> {
    let following: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;
    Ok(following)
}

pub async fn follower_count(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

pub async fn following_count(pool: &PgPool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Users who follow `user_id`, most recent first.
pub async fn followers_list(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<FollowListEntry>, sqlx::Error> {
    sqlx::query_as::<_, FollowListEntry>(
        "SELECT u.id, u.username, u.avatar_path \
         FROM follows f \
         JOIN users u ON u.id = f.follower_id \
         WHERE f.followed_id = $1 \
         ORDER BY f.followed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Users whom `user_id` follows, most recent first.
pub async fn following_list(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<FollowListEntry>, sqlx::Error> {
    sqlx::query_as::<_, FollowListEntry>(
        "SELECT u.id, u.username, u.avatar_path \
         FROM follows f \
         JOIN users u ON u.id = f.followed_id \
         WHERE f.follower_id = $1 \
         ORDER BY f.followed_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
