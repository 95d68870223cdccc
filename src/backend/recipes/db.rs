//! Recipe queries and transactions.
//!
//! Feed/detail rows fold their engagement counts in as correlated
//! subqueries; tags are hydrated with a follow-up query per recipe. Create
//! and update wrap the recipe row and its tag associations in one
//! transaction, so a failure never leaves a recipe with half its tags.

use sqlx::PgPool;

use crate::backend::recipes::types::{
    FeedRecipe, RecipeDetail, RecipeFields, SearchHit, TagRef,
};

/// Feed page size.
pub const PAGE_SIZE: i64 = 20;

const FEED_COLUMNS: &str = "r.id, r.user_id, r.dish, r.description, r.image_path, r.posted_at, \
     u.username, u.avatar_path, \
     (SELECT COUNT(*) FROM likes l WHERE l.recipe_id = r.id) AS total_likes, \
     EXISTS(SELECT 1 FROM likes l WHERE l.recipe_id = r.id AND l.user_id = $1) AS liked_by_me, \
     (SELECT ROUND(AVG(a.score)::numeric, 1)::float8 FROM ratings a WHERE a.recipe_id = r.id) AS avg_rating, \
     (SELECT COUNT(*) FROM ratings a WHERE a.recipe_id = r.id) AS total_ratings";

/// One page of the feed, newest first. Fetches one row beyond the page to
/// compute `has_more` without a second count query.
pub async fn list_feed(
    pool: &PgPool,
    viewer_id: i64,
    page: i64,
) -> Result<(Vec<FeedRecipe>, bool), sqlx::Error> {
    let offset = (page - 1) * PAGE_SIZE;

    let mut recipes = sqlx::query_as::<_, FeedRecipe>(&format!(
        "SELECT {FEED_COLUMNS} \
         FROM recipes r \
         JOIN users u ON u.id = r.user_id \
         ORDER BY r.posted_at DESC, r.id DESC \
         LIMIT $2 OFFSET $3"
    ))
    .bind(viewer_id)
    .bind(PAGE_SIZE + 1)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let has_more = recipes.len() as i64 > PAGE_SIZE;
    recipes.truncate(PAGE_SIZE as usize);

    attach_tags(pool, &mut recipes).await?;
    Ok((recipes, has_more))
}

/// Recipes posted by one user, newest first. Used for the viewer's own
/// listing and for other users' pages.
pub async fn list_by_user(
    pool: &PgPool,
    viewer_id: i64,
    user_id: i64,
) -> Result<Vec<FeedRecipe>, sqlx::Error> {
    let mut recipes = sqlx::query_as::<_, FeedRecipe>(&format!(
        "SELECT {FEED_COLUMNS} \
         FROM recipes r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.user_id = $2 \
         ORDER BY r.posted_at DESC, r.id DESC"
    ))
    .bind(viewer_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    attach_tags(pool, &mut recipes).await?;
    Ok(recipes)
}

/// Recipes the viewer has liked, most recently liked first.
pub async fn list_liked(pool: &PgPool, viewer_id: i64) -> Result<Vec<FeedRecipe>, sqlx::Error> {
    let mut recipes = sqlx::query_as::<_, FeedRecipe>(&format!(
        "SELECT {FEED_COLUMNS} \
         FROM recipes r \
         JOIN likes c ON c.recipe_id = r.id AND c.user_id = $1 \
         JOIN users u ON u.id = r.user_id \
         ORDER BY c.liked_at DESC"
    ))
    .bind(viewer_id)
    .fetch_all(pool)
    .await?;

    attach_tags(pool, &mut recipes).await?;
    Ok(recipes)
}

/// Substring search over dish, description and ingredients. Capped at 20
/// rows; an empty query returns nothing (handled by the caller).
pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<SearchHit>, sqlx::Error> {
    let like = format!("%{query}%");

    sqlx::query_as::<_, SearchHit>(
        "SELECT r.id, r.user_id, r.dish, r.description, r.image_path, u.username \
         FROM recipes r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.dish ILIKE $1 OR r.description ILIKE $1 OR r.ingredients ILIKE $1 \
         ORDER BY r.posted_at DESC \
         LIMIT 20",
    )
    .bind(like)
    .fetch_all(pool)
    .await
}

/// Full detail row, or `None` when the recipe does not exist.
pub async fn get_detail(
    pool: &PgPool,
    viewer_id: i64,
    recipe_id: i64,
) -> Result<Option<RecipeDetail>, sqlx::Error> {
    let detail = sqlx::query_as::<_, RecipeDetail>(
        "SELECT r.id, r.user_id, r.dish, r.description, r.ingredients, r.steps, \
                r.prep_time, r.difficulty, r.cost, r.servings, r.cook_time, \
                r.image_path, r.posted_at, \
                u.username, u.avatar_path, \
                (SELECT COUNT(*) FROM likes l WHERE l.recipe_id = r.id) AS total_likes, \
                EXISTS(SELECT 1 FROM likes l WHERE l.recipe_id = r.id AND l.user_id = $1) AS liked_by_me, \
                (SELECT AVG(a.score)::float8 FROM ratings a WHERE a.recipe_id = r.id) AS avg_rating, \
                (SELECT COUNT(*) FROM ratings a WHERE a.recipe_id = r.id) AS total_ratings \
         FROM recipes r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.id = $2",
    )
    .bind(viewer_id)
    .bind(recipe_id)
    .fetch_optional(pool)
    .await?;

    let Some(mut detail) = detail else {
        return Ok(None);
    };

    detail.tags = tags_for_recipe(pool, detail.id).await?;
    Ok(Some(detail))
}

pub async fn tags_for_recipe(pool: &PgPool, recipe_id: i64) -> Result<Vec<TagRef>, sqlx::Error> {
    sqlx::query_as::<_, TagRef>(
        "SELECT t.id, t.name \
         FROM recipe_tags rt \
         JOIN tags t ON t.id = rt.tag_id \
         WHERE rt.recipe_id = $1 \
         ORDER BY t.name ASC",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await
}

async fn attach_tags(pool: &PgPool, recipes: &mut [FeedRecipe]) -> Result<(), sqlx::Error> {
    for recipe in recipes.iter_mut() {
        recipe.tags = tags_for_recipe(pool, recipe.id).await?;
    }
    Ok(())
}

/// Insert a recipe and its tag associations in one transaction. Returns the
/// new recipe id.
pub async fn create_recipe(
    pool: &PgPool,
    owner_id: i64,
    fields: &RecipeFields,
    tag_ids: &[i64],
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let recipe_id: i64 = sqlx::query_scalar(
        "INSERT INTO recipes (user_id, dish, description, ingredients, steps, \
                              prep_time, difficulty, cost, servings, cook_time, image_path) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id",
    )
    .bind(owner_id)
    .bind(&fields.dish)
    .bind(&fields.description)
    .bind(&fields.ingredients)
    .bind(&fields.steps)
    .bind(&fields.prep_time)
    .bind(&fields.difficulty)
    .bind(&fields.cost)
    .bind(&fields.servings)
    .bind(&fields.cook_time)
    .bind(&fields.image_path)
    .fetch_one(&mut *tx)
    .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(recipe_id)
}

/// Update a recipe and replace its tag set in one transaction. The tag
/// replacement is a full delete + re-insert, not a diff.
pub async fn update_recipe(
    pool: &PgPool,
    recipe_id: i64,
    fields: &RecipeFields,
    tag_ids: &[i64],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE recipes SET dish = $1, description = $2, ingredients = $3, steps = $4, \
                prep_time = $5, difficulty = $6, cost = $7, servings = $8, cook_time = $9, \
                image_path = $10 \
         WHERE id = $11",
    )
    .bind(&fields.dish)
    .bind(&fields.description)
    .bind(&fields.ingredients)
    .bind(&fields.steps)
    .bind(&fields.prep_time)
    .bind(&fields.difficulty)
    .bind(&fields.cost)
    .bind(&fields.servings)
    .bind(&fields.cook_time)
    .bind(&fields.image_path)
    .bind(recipe_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    for tag_id in tag_ids {
        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES ($1, $2)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Owner id and stored image path, for ownership checks before mutation.
pub async fn get_owner_and_image(
    pool: &PgPool,
    recipe_id: i64,
) -> Result<Option<(i64, Option<String>)>, sqlx::Error> {
    let row: Option<(i64, Option<String>)> =
        sqlx::query_as("SELECT user_id, image_path FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;
    Ok(row)
}

/// Delete the recipe row. Likes, ratings (with their reactions and replies)
/// and tag associations cascade at the store.
pub async fn delete_recipe(pool: &PgPool, recipe_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn recipe_exists(pool: &PgPool, recipe_id: i64) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1)")
        .bind(recipe_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn count_likes(pool: &PgPool, recipe_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE recipe_id = $1")
        .bind(recipe_id)
        .fetch_one(pool)
        .await
}

/// Strict like flip for (user, recipe): liked becomes unliked and vice
/// versa. Returns the resulting state and a fresh total.
pub async fn toggle_like(
    pool: &PgPool,
    user_id: i64,
    recipe_id: i64,
) -> Result<(bool, i64), sqlx::Error> {
    let already_liked: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM likes WHERE user_id = $1 AND recipe_id = $2)",
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_one(pool)
    .await?;

    let liked = if already_liked {
        sqlx::query("DELETE FROM likes WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        false
    } else {
        sqlx::query("INSERT INTO likes (user_id, recipe_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;
        true
    };

    let total = count_likes(pool, recipe_id).await?;
    Ok((liked, total))
}
