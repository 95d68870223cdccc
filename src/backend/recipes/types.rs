//! Row and wire types for recipes.
//!
//! Aggregated rows carry their derived counts straight from the query;
//! `tags` is hydrated separately and skipped by `FromRow`. JSON keys are
//! camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag reference attached to a recipe row (id + name only).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
}

/// One feed row: recipe summary plus derived engagement counts.
///
/// `avg_rating` is `None` when the recipe has no ratings; callers must treat
/// that as "not yet rated", never as zero.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecipe {
    pub id: i64,
    pub user_id: i64,
    pub dish: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub username: String,
    pub avatar_path: Option<String>,
    pub total_likes: i64,
    pub liked_by_me: bool,
    /// Rounded to 1 decimal in the query.
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
    #[sqlx(skip)]
    pub tags: Vec<TagRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub recipes: Vec<FeedRecipe>,
    pub page: i64,
    pub has_more: bool,
}

/// Full recipe view for the detail page. `avg_rating` is unrounded here.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub user_id: i64,
    pub dish: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub prep_time: Option<String>,
    pub difficulty: Option<String>,
    pub cost: Option<String>,
    pub servings: Option<String>,
    pub cook_time: Option<String>,
    pub image_path: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub username: String,
    pub avatar_path: Option<String>,
    pub total_likes: i64,
    pub liked_by_me: bool,
    pub avg_rating: Option<f64>,
    pub total_ratings: i64,
    #[sqlx(skip)]
    pub tags: Vec<TagRef>,
}

/// Search hit: a slim row, no aggregation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    pub user_id: i64,
    pub dish: String,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedParams {
    pub page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub total_likes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeResponse {
    pub message: String,
    pub recipe_id: i64,
}

/// Scalar recipe fields as stored; shared by insert and update.
#[derive(Debug, Clone)]
pub struct RecipeFields {
    pub dish: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub steps: String,
    pub prep_time: Option<String>,
    pub difficulty: Option<String>,
    pub cost: Option<String>,
    pub servings: Option<String>,
    pub cook_time: Option<String>,
    pub image_path: Option<String>,
}

/// Accumulator for the multipart create/update form.
#[derive(Debug, Default)]
pub struct RecipeForm {
    pub dish: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
    pub prep_time: Option<String>,
    pub difficulty: Option<String>,
    pub cost: Option<String>,
    pub servings: Option<String>,
    pub cook_time: Option<String>,
    /// Submitted as a JSON array string, e.g. `[1,4,7]`.
    pub tags: Vec<i64>,
    /// (content type, bytes) of the uploaded image field, if any.
    pub image: Option<(String, Vec<u8>)>,
}
