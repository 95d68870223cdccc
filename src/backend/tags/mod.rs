//! Tag catalog.
//!
//! The catalog is seeded by migration and read-only at runtime. The
//! `exclusive` flag marks tags in a mutually-exclusive group; enforcement is
//! a client-side concern.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::backend::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub exclusive: bool,
    pub color: String,
}

pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT id, name, exclusive, color FROM tags ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

/// GET /tags
pub async fn get_tags(State(pool): State<PgPool>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = list_tags(&pool).await?;
    Ok(Json(tags))
}
