//! HTTP handlers for profiles and the follow graph.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::config::Config;
use crate::backend::uploads::cleanup::CleanupQueue;
use crate::backend::uploads::{store_image, AVATAR_DIR};
use crate::backend::users::db;
use crate::backend::users::types::{
    CountResponse, FollowListEntry, FollowRequest, IsFollowingResponse, Profile, PublicProfile,
};

/// GET /users/profile
pub async fn get_profile(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = db::get_profile(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(profile))
}

/// PUT /users/profile (multipart: optional `username` field, optional
/// `avatar` image)
pub async fn update_profile(
    State(pool): State<PgPool>,
    State(config): State<Arc<Config>>,
    State(cleanup): State<CleanupQueue>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Profile>, ApiError> {
    let mut new_username: Option<String> = None;
    let mut new_avatar: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart form: {e}")))?
    {
        match field.name().map(str::to_string).as_deref() {
            Some("username") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Malformed multipart form: {e}")))?;
                let trimmed = value.trim().to_string();
                if !trimmed.is_empty() {
                    new_username = Some(trimmed);
                }
            }
            Some("avatar") => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::validation("Avatar field has no content type."))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read avatar: {e}")))?;
                new_avatar = Some((content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    if let Some(username) = &new_username {
        if let Err(e) = db::update_username(&pool, user.user_id, username).await {
            let err = ApiError::from(e);
            if err.is_unique_violation() {
                return Err(ApiError::conflict("Username already in use."));
            }
            return Err(err);
        }
    }

    if let Some((content_type, data)) = &new_avatar {
        let stored = store_image(&config.upload_dir, AVATAR_DIR, content_type, data).await?;
        let old = db::update_avatar(&pool, user.user_id, Some(&stored.relative_path)).await?;
        if let Some(old_path) = old {
            cleanup.schedule(old_path);
        }
    }

    let profile = db::get_profile(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(profile))
}

/// DELETE /users/profile-picture
pub async fn delete_profile_picture(
    State(pool): State<PgPool>,
    State(cleanup): State<CleanupQueue>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let old = db::update_avatar(&pool, user.user_id, None).await?;

    if let Some(old_path) = old {
        cleanup.schedule(old_path);
    }

    Ok(Json(MessageResponse::new("Profile picture removed.")))
}

/// GET /users/{id}
pub async fn get_user(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<PublicProfile>, ApiError> {
    let profile = db::get_public_profile(&pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;

    Ok(Json(profile))
}

/// POST /users/follow
pub async fn follow_user(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if request.followed_id == user.user_id {
        return Err(ApiError::validation("You cannot follow yourself."));
    }

    if !db::user_exists(&pool, request.followed_id).await? {
        return Err(ApiError::not_found("User not found."));
    }

    let created = db::follow(&pool, user.user_id, request.followed_id).await?;
    if !created {
        return Err(ApiError::conflict("Already following this user."));
    }

    Ok(Json(MessageResponse::new("Now following.")))
}

/// DELETE /users/follow
pub async fn unfollow_user(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<FollowRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    db::unfollow(&pool, user.user_id, request.followed_id).await?;
    Ok(Json(MessageResponse::new("Unfollowed.")))
}

/// GET /users/{id}/is-following
pub async fn is_following(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<IsFollowingResponse>, ApiError> {
    let following = db::is_following(&pool, user.user_id, user_id).await?;
    Ok(Json(IsFollowingResponse { following }))
}

/// GET /users/{id}/followers
pub async fn follower_count(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = db::follower_count(&pool, user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /users/{id}/following
pub async fn following_count(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<CountResponse>, ApiError> {
    let count = db::following_count(&pool, user_id).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /users/{id}/followers-list
pub async fn followers_list(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<FollowListEntry>>, ApiError> {
    let entries = db::followers_list(&pool, user_id).await?;
    Ok(Json(entries))
}

/// GET /users/{id}/following-list
pub async fn following_list(
    State(pool): State<PgPool>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<FollowListEntry>>, ApiError> {
    let entries = db::following_list(&pool, user_id).await?;
    Ok(Json(entries))
}
