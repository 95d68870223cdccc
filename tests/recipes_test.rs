//! Integration tests for recipes: feed aggregation, CRUD, like toggle, tag
//! replacement, ownership checks.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use common::auth_helpers::register_and_login;
use common::{create_recipe, TestContext};

#[tokio::test]
#[serial]
async fn feed_row_carries_aggregates_and_tags() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "gina").await;

    create_recipe(&ctx.server, &user.token, "Feijoada", "[1,2]").await;

    let response = ctx
        .server
        .get("/recipes/feed")
        .authorization_bearer(&user.token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["page"].as_i64().unwrap(), 1);
    assert_eq!(body["hasMore"].as_bool().unwrap(), false);

    let recipes = body["recipes"].as_array().unwrap();
    assert_eq!(recipes.len(), 1);

    let row = &recipes[0];
    assert_eq!(row["dish"], "Feijoada");
    assert_eq!(row["username"], "gina");
    assert_eq!(row["totalLikes"].as_i64().unwrap(), 0);
    assert_eq!(row["likedByMe"].as_bool().unwrap(), false);
    // No ratings yet: the average must be null, never 0.
    assert!(row["avgRating"].is_null());
    assert_eq!(row["totalRatings"].as_i64().unwrap(), 0);
    assert_eq!(row["tags"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[serial]
async fn single_rating_of_three_averages_to_three() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "hugo").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Moqueca", "[]").await;

    let response = ctx
        .server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 3 }))
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get("/recipes/feed")
        .authorization_bearer(&user.token)
        .await;
    let body: Value = response.json();
    let row = &body["recipes"].as_array().unwrap()[0];

    assert_eq!(row["avgRating"].as_f64().unwrap(), 3.0);
    assert_eq!(row["totalRatings"].as_i64().unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn like_toggle_twice_returns_to_original_state() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "iris").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Pão de queijo", "[]").await;

    let first = ctx
        .server
        .post(&format!("/recipes/{recipe_id}/like"))
        .authorization_bearer(&user.token)
        .await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["liked"].as_bool().unwrap(), true);
    assert_eq!(body["totalLikes"].as_i64().unwrap(), 1);

    let second = ctx
        .server
        .post(&format!("/recipes/{recipe_id}/like"))
        .authorization_bearer(&user.token)
        .await;
    second.assert_status_ok();
    let body: Value = second.json();
    assert_eq!(body["liked"].as_bool().unwrap(), false);
    assert_eq!(body["totalLikes"].as_i64().unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn like_on_missing_recipe_is_not_found() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "jose").await;

    let response = ctx
        .server
        .post("/recipes/999999/like")
        .authorization_bearer(&user.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn update_replaces_tag_set_completely() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "kaya").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Brigadeiro", "[1,2]").await;

    let form = MultipartForm::new()
        .add_text("dish", "Brigadeiro")
        .add_text("ingredients", "condensed milk, cocoa")
        .add_text("steps", "stir over low heat")
        .add_text("tags", "[3]");

    let response = ctx
        .server
        .put(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&user.token)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();

    let tags = body["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["id"].as_i64().unwrap(), 3);

    // Nothing left of the old associations in the store either.
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM recipe_tags WHERE recipe_id = $1 AND tag_id IN (1, 2)")
            .bind(recipe_id)
            .fetch_one(ctx.db.pool())
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[serial]
async fn delete_checks_existence_before_ownership() {
    let ctx = TestContext::new().await;
    let owner = register_and_login(&ctx.server, "lia").await;
    let intruder = register_and_login(&ctx.server, "mallory").await;
    let recipe_id = create_recipe(&ctx.server, &owner.token, "Vatapá", "[]").await;

    // Someone else's recipe: forbidden, row untouched.
    let response = ctx
        .server
        .delete(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&intruder.token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM recipes WHERE id = $1)")
        .bind(recipe_id)
        .fetch_one(ctx.db.pool())
        .await
        .unwrap();
    assert!(exists);

    // Missing recipe: not found, not forbidden.
    let response = ctx
        .server
        .delete("/recipes/999999")
        .authorization_bearer(&intruder.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    // The owner can delete, after which the detail view is gone.
    let response = ctx
        .server
        .delete(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status_ok();

    let response = ctx
        .server
        .get(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&owner.token)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn update_by_non_owner_is_forbidden() {
    let ctx = TestContext::new().await;
    let owner = register_and_login(&ctx.server, "nora").await;
    let intruder = register_and_login(&ctx.server, "oscar").await;
    let recipe_id = create_recipe(&ctx.server, &owner.token, "Acarajé", "[]").await;

    let form = MultipartForm::new()
        .add_text("dish", "Hijacked")
        .add_text("ingredients", "x")
        .add_text("steps", "y");

    let response = ctx
        .server
        .put(&format!("/recipes/{recipe_id}"))
        .authorization_bearer(&intruder.token)
        .multipart(form)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn create_requires_core_fields() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "pilar").await;

    let form = MultipartForm::new()
        .add_text("dish", "No steps")
        .add_text("ingredients", "something");

    let response = ctx
        .server
        .post("/recipes")
        .authorization_bearer(&user.token)
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn feed_paginates_newest_first() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "quinn").await;

    for i in 0..21 {
        create_recipe(&ctx.server, &user.token, &format!("Dish {i:02}"), "[]").await;
    }

    let response = ctx
        .server
        .get("/recipes/feed")
        .authorization_bearer(&user.token)
        .await;
    let body: Value = response.json();

    assert_eq!(body["page"].as_i64().unwrap(), 1);
    assert_eq!(body["hasMore"].as_bool().unwrap(), true);
    let first_page = body["recipes"].as_array().unwrap();
    assert_eq!(first_page.len(), 20);
    // Newest first.
    assert_eq!(first_page[0]["dish"], "Dish 20");

    let response = ctx
        .server
        .get("/recipes/feed")
        .add_query_param("page", 2)
        .authorization_bearer(&user.token)
        .await;
    let body: Value = response.json();

    assert_eq!(body["page"].as_i64().unwrap(), 2);
    assert_eq!(body["hasMore"].as_bool().unwrap(), false);
    let second_page = body["recipes"].as_array().unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0]["dish"], "Dish 00");
}

#[tokio::test]
#[serial]
async fn search_matches_dish_and_ignores_blank_query() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "rosa").await;
    create_recipe(&ctx.server, &user.token, "Tapioca crepe", "[]").await;
    create_recipe(&ctx.server, &user.token, "Caldo verde", "[]").await;

    let response = ctx
        .server
        .get("/recipes/search")
        .add_query_param("q", "tapioca")
        .authorization_bearer(&user.token)
        .await;
    response.assert_status_ok();
    let hits: Value = response.json();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["dish"], "Tapioca crepe");

    let response = ctx
        .server
        .get("/recipes/search")
        .add_query_param("q", "   ")
        .authorization_bearer(&user.token)
        .await;
    response.assert_status_ok();
    let hits: Value = response.json();
    assert!(hits.as_array().unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn my_recipes_and_user_listing_are_scoped() {
    let ctx = TestContext::new().await;
    let sara = register_and_login(&ctx.server, "sara").await;
    let tom = register_and_login(&ctx.server, "tom").await;

    create_recipe(&ctx.server, &sara.token, "Bolo de fubá", "[]").await;
    create_recipe(&ctx.server, &tom.token, "Canjica", "[]").await;

    let response = ctx
        .server
        .get("/recipes/my-recipes")
        .authorization_bearer(&sara.token)
        .await;
    let mine: Value = response.json();
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["dish"], "Bolo de fubá");

    let response = ctx
        .server
        .get(&format!("/recipes/user/{}", tom.id))
        .authorization_bearer(&sara.token)
        .await;
    let theirs: Value = response.json();
    let theirs = theirs.as_array().unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0]["dish"], "Canjica");
}

#[tokio::test]
#[serial]
async fn liked_listing_follows_the_toggle() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "uma").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Cuscuz", "[]").await;

    let response = ctx
        .server
        .get("/recipes/liked")
        .authorization_bearer(&user.token)
        .await;
    let liked: Value = response.json();
    assert!(liked.as_array().unwrap().is_empty());

    ctx.server
        .post(&format!("/recipes/{recipe_id}/like"))
        .authorization_bearer(&user.token)
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .get("/recipes/liked")
        .authorization_bearer(&user.token)
        .await;
    let liked: Value = response.json();
    let liked = liked.as_array().unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0]["likedByMe"].as_bool().unwrap(), true);
}
