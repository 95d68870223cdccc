//! HTTP handlers for ratings, reactions and replies.

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::ratings::db;
use crate::backend::ratings::types::{
    RateRequest, RatingListResponse, ReactRequest, ReactResponse, ReactionKind, ReplyRequest,
    ReplyResponse,
};
use crate::backend::recipes::db::recipe_exists;

/// POST /recipes/{id}/avaliar
pub async fn rate_recipe(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
    Json(request): Json<RateRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let score = request
        .score
        .ok_or_else(|| ApiError::validation("Score is required."))?;

    if !(1..=5).contains(&score) {
        return Err(ApiError::validation("Score must be between 1 and 5."));
    }

    if !recipe_exists(&pool, recipe_id).await? {
        return Err(ApiError::not_found("Recipe not found."));
    }

    let created =
        db::upsert_rating(&pool, recipe_id, user.user_id, score, request.comment.as_deref())
            .await?;

    let message = if created {
        "Rating published!"
    } else {
        "Rating updated!"
    };

    Ok(Json(MessageResponse::new(message)))
}

/// GET /recipes/{id}/avaliacoes
pub async fn list_recipe_ratings(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RatingListResponse>, ApiError> {
    if !recipe_exists(&pool, recipe_id).await? {
        return Err(ApiError::not_found("Recipe not found."));
    }

    let ratings = db::list_ratings(&pool, user.user_id, recipe_id).await?;
    let stats = db::rating_stats(&pool, recipe_id).await?;

    Ok(Json(RatingListResponse { stats, ratings }))
}

/// POST /recipes/rating/{rating_id}/responder
pub async fn reply_to_rating(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(rating_id): Path<i64>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::validation("Reply cannot be empty."));
    }

    if !db::rating_exists(&pool, rating_id).await? {
        return Err(ApiError::not_found("Rating not found."));
    }

    let new_reply = db::insert_reply(&pool, rating_id, user.user_id, text).await?;

    Ok(Json(ReplyResponse {
        message: "Reply posted!".to_string(),
        new_reply,
    }))
}

/// POST /recipes/rating/{rating_id}/react
pub async fn react_to_rating(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(rating_id): Path<i64>,
    Json(request): Json<ReactRequest>,
) -> Result<Json<ReactResponse>, ApiError> {
    let kind = ReactionKind::parse(&request.kind)
        .ok_or_else(|| ApiError::validation("Invalid reaction kind."))?;

    if !db::rating_exists(&pool, rating_id).await? {
        return Err(ApiError::not_found("Rating not found."));
    }

    let response = db::react(&pool, rating_id, user.user_id, kind).await?;
    Ok(Json(response))
}

/// DELETE /recipes/{id}/avaliacoes/{rating_id}
pub async fn delete_rating(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path((_recipe_id, rating_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let owner_id = db::get_rating_owner(&pool, rating_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Rating not found."))?;

    if owner_id != user.user_id {
        return Err(ApiError::forbidden("You do not own this rating."));
    }

    db::delete_rating_cascade(&pool, rating_id).await?;

    Ok(Json(MessageResponse::new("Rating removed!")))
}

/// DELETE /recipes/rating/reply/{id}
pub async fn delete_reply(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(reply_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let owner_id = db::get_reply_owner(&pool, reply_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Reply not found."))?;

    if owner_id != user.user_id {
        return Err(ApiError::forbidden("You do not own this reply."));
    }

    db::delete_reply(&pool, reply_id).await?;

    Ok(Json(MessageResponse::new("Reply deleted!")))
}
