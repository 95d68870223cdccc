//! HTTP handlers for the `/recipes` surface.
//!
//! Create and update take multipart forms (scalar fields + `tags` as a JSON
//! array string + optional `image` file), matching what the SPA submits.
//! Mutations check existence before ownership: a missing recipe is 404,
//! never 403.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::recipes::db;
use crate::backend::recipes::types::{
    CreateRecipeResponse, FeedParams, FeedRecipe, FeedResponse, LikeResponse, RecipeDetail,
    RecipeFields, RecipeForm, SearchHit, SearchParams,
};
use crate::backend::server::config::Config;
use crate::backend::uploads::cleanup::CleanupQueue;
use crate::backend::uploads::{store_image, RECIPE_IMAGE_DIR};

/// GET /recipes/feed
pub async fn feed(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    let page = params.page.unwrap_or(1).max(1);
    let (recipes, has_more) = db::list_feed(&pool, user.user_id, page).await?;

    Ok(Json(FeedResponse {
        recipes,
        page,
        has_more,
    }))
}

/// GET /recipes/my-recipes
pub async fn my_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<FeedRecipe>>, ApiError> {
    let recipes = db::list_by_user(&pool, user.user_id, user.user_id).await?;
    Ok(Json(recipes))
}

/// GET /recipes/user/{user_id}
pub async fn user_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<FeedRecipe>>, ApiError> {
    let recipes = db::list_by_user(&pool, user.user_id, user_id).await?;
    Ok(Json(recipes))
}

/// GET /recipes/liked
pub async fn liked_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<FeedRecipe>>, ApiError> {
    let recipes = db::list_liked(&pool, user.user_id).await?;
    Ok(Json(recipes))
}

/// GET /recipes/search?q=
pub async fn search_recipes(
    State(pool): State<PgPool>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let hits = db::search(&pool, query).await?;
    Ok(Json(hits))
}

/// GET /recipes/{id}
pub async fn get_recipe(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeDetail>, ApiError> {
    let detail = db::get_detail(&pool, user.user_id, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;

    Ok(Json(detail))
}

/// POST /recipes (multipart)
pub async fn create_recipe(
    State(pool): State<PgPool>,
    State(config): State<Arc<Config>>,
    State(cleanup): State<CleanupQueue>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateRecipeResponse>), ApiError> {
    let form = parse_recipe_form(multipart).await?;
    let (dish, ingredients, steps) = require_core_fields(&form)?;

    let image_path = match &form.image {
        Some((content_type, data)) => Some(
            store_image(&config.upload_dir, RECIPE_IMAGE_DIR, content_type, data)
                .await?
                .relative_path,
        ),
        None => None,
    };

    let fields = RecipeFields {
        dish,
        description: form.description.clone(),
        ingredients,
        steps,
        prep_time: form.prep_time.clone(),
        difficulty: form.difficulty.clone(),
        cost: form.cost.clone(),
        servings: form.servings.clone(),
        cook_time: form.cook_time.clone(),
        image_path: image_path.clone(),
    };

    let recipe_id = match db::create_recipe(&pool, user.user_id, &fields, &form.tags).await {
        Ok(id) => id,
        Err(e) => {
            // The insert rolled back; don't leave the freshly stored image
            // behind.
            if let Some(path) = image_path {
                cleanup.schedule(path);
            }
            return Err(e.into());
        }
    };

    tracing::info!(recipe_id, user_id = user.user_id, "recipe created");

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            message: "Recipe created!".to_string(),
            recipe_id,
        }),
    ))
}

/// PUT /recipes/{id} (multipart)
pub async fn update_recipe(
    State(pool): State<PgPool>,
    State(config): State<Arc<Config>>,
    State(cleanup): State<CleanupQueue>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, ApiError> {
    let (owner_id, old_image) = db::get_owner_and_image(&pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;

    if owner_id != user.user_id {
        return Err(ApiError::forbidden("You do not own this recipe."));
    }

    let form = parse_recipe_form(multipart).await?;
    let (dish, ingredients, steps) = require_core_fields(&form)?;

    let new_image = match &form.image {
        Some((content_type, data)) => Some(
            store_image(&config.upload_dir, RECIPE_IMAGE_DIR, content_type, data)
                .await?
                .relative_path,
        ),
        None => None,
    };

    let image_path = new_image.clone().or_else(|| old_image.clone());

    let fields = RecipeFields {
        dish,
        description: form.description.clone(),
        ingredients,
        steps,
        prep_time: form.prep_time.clone(),
        difficulty: form.difficulty.clone(),
        cost: form.cost.clone(),
        servings: form.servings.clone(),
        cook_time: form.cook_time.clone(),
        image_path,
    };

    match db::update_recipe(&pool, recipe_id, &fields, &form.tags).await {
        Ok(()) => {
            // Replaced image becomes stale only once the update committed.
            if new_image.is_some() {
                if let Some(old) = old_image {
                    cleanup.schedule(old);
                }
            }
        }
        Err(e) => {
            if let Some(path) = new_image {
                cleanup.schedule(path);
            }
            return Err(e.into());
        }
    }

    tracing::info!(recipe_id, user_id = user.user_id, "recipe updated");

    Ok(Json(MessageResponse::new("Recipe updated!")))
}

/// DELETE /recipes/{id}
pub async fn delete_recipe(
    State(pool): State<PgPool>,
    State(cleanup): State<CleanupQueue>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (owner_id, image_path) = db::get_owner_and_image(&pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;

    if owner_id != user.user_id {
        return Err(ApiError::forbidden("You do not own this recipe."));
    }

    db::delete_recipe(&pool, recipe_id).await?;

    if let Some(path) = image_path {
        cleanup.schedule(path);
    }

    tracing::info!(recipe_id, user_id = user.user_id, "recipe deleted");

    Ok(Json(MessageResponse::new("Recipe deleted!")))
}

/// POST /recipes/{id}/like
pub async fn toggle_like(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    if !db::recipe_exists(&pool, recipe_id).await? {
        return Err(ApiError::not_found("Recipe not found."));
    }

    let (liked, total_likes) = db::toggle_like(&pool, user.user_id, recipe_id).await?;

    Ok(Json(LikeResponse { liked, total_likes }))
}

fn require_core_fields(form: &RecipeForm) -> Result<(String, String, String), ApiError> {
    let dish = form.dish.as_deref().unwrap_or("").trim().to_string();
    let ingredients = form.ingredients.as_deref().unwrap_or("").trim().to_string();
    let steps = form.steps.as_deref().unwrap_or("").trim().to_string();

    if dish.is_empty() || ingredients.is_empty() || steps.is_empty() {
        return Err(ApiError::validation("Required fields missing."));
    }

    Ok((dish, ingredients, steps))
}

/// Collect the multipart create/update form into a `RecipeForm`.
async fn parse_recipe_form(mut multipart: Multipart) -> Result<RecipeForm, ApiError> {
    let mut form = RecipeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart form: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::validation("Image field has no content type."))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image: {e}")))?;
                form.image = Some((content_type, data.to_vec()));
            }
            "tags" => {
                let raw = read_text_field(field).await?;
                if !raw.trim().is_empty() {
                    form.tags = serde_json::from_str(&raw).map_err(|_| {
                        ApiError::validation("Tags must be a JSON array of tag ids.")
                    })?;
                }
            }
            "dish" => form.dish = Some(read_text_field(field).await?),
            "description" => form.description = some_nonempty(read_text_field(field).await?),
            "ingredients" => form.ingredients = Some(read_text_field(field).await?),
            "steps" => form.steps = Some(read_text_field(field).await?),
            "prep_time" => form.prep_time = some_nonempty(read_text_field(field).await?),
            "difficulty" => form.difficulty = some_nonempty(read_text_field(field).await?),
            "cost" => form.cost = some_nonempty(read_text_field(field).await?),
            "servings" => form.servings = some_nonempty(read_text_field(field).await?),
            "cook_time" => form.cook_time = some_nonempty(read_text_field(field).await?),
            other => {
                tracing::debug!(field = other, "ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart form: {e}")))
}

fn some_nonempty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
