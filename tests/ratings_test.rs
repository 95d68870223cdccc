//! Integration tests for ratings, reactions and replies.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use serial_test::serial;

use common::auth_helpers::register_and_login;
use common::{create_recipe, TestContext};

async fn rating_list(ctx: &TestContext, token: &str, recipe_id: i64) -> Value {
    let response = ctx
        .server
        .get(&format!("/recipes/{recipe_id}/avaliacoes"))
        .authorization_bearer(token)
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
#[serial]
async fn upsert_keeps_comment_when_new_one_is_blank() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "vera").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Pudim", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 4, "comment": "good" }))
        .await
        .assert_status_ok();

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 5, "comment": "" }))
        .await
        .assert_status_ok();

    let body = rating_list(&ctx, &user.token, recipe_id).await;
    let ratings = body["ratings"].as_array().unwrap();

    // Still a single rating: score overwritten, comment preserved.
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["score"].as_i64().unwrap(), 5);
    assert_eq!(ratings[0]["comment"], "good");
    assert_eq!(body["stats"]["totalRatings"].as_i64().unwrap(), 1);
    assert_eq!(body["stats"]["avgScore"].as_f64().unwrap(), 5.0);
}

#[tokio::test]
#[serial]
async fn upsert_overwrites_comment_when_new_one_is_present() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "wanda").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Quindim", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 2, "comment": "meh" }))
        .await
        .assert_status_ok();

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 4, "comment": "actually great" }))
        .await
        .assert_status_ok();

    let body = rating_list(&ctx, &user.token, recipe_id).await;
    let ratings = body["ratings"].as_array().unwrap();
    assert_eq!(ratings[0]["comment"], "actually great");
}

#[tokio::test]
#[serial]
async fn rating_validation() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "xavi").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Escondidinho", "[]").await;

    // Missing score.
    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "comment": "no score" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Out-of-range score.
    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 6 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Missing recipe.
    ctx.server
        .post("/recipes/999999/avaliar")
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 4 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

async fn single_rating_id(ctx: &TestContext, token: &str, recipe_id: i64) -> i64 {
    let body = rating_list(ctx, token, recipe_id).await;
    body["ratings"].as_array().unwrap()[0]["id"].as_i64().unwrap()
}

#[tokio::test]
#[serial]
async fn reacting_like_twice_removes_the_reaction() {
    let ctx = TestContext::new().await;
    let author = register_and_login(&ctx.server, "yara").await;
    let reactor = register_and_login(&ctx.server, "zeca").await;
    let recipe_id = create_recipe(&ctx.server, &author.token, "Coxinha", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&author.token)
        .json(&json!({ "score": 5, "comment": "self five" }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &author.token, recipe_id).await;

    let first = ctx
        .server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&reactor.token)
        .json(&json!({ "kind": "like" }))
        .await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["liked"].as_bool().unwrap(), true);
    assert_eq!(body["disliked"].as_bool().unwrap(), false);
    assert_eq!(body["likes"].as_i64().unwrap(), 1);
    assert_eq!(body["dislikes"].as_i64().unwrap(), 0);

    let second = ctx
        .server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&reactor.token)
        .json(&json!({ "kind": "like" }))
        .await;
    second.assert_status_ok();
    let body: Value = second.json();
    assert_eq!(body["liked"].as_bool().unwrap(), false);
    assert_eq!(body["disliked"].as_bool().unwrap(), false);
    assert_eq!(body["likes"].as_i64().unwrap(), 0);
    assert_eq!(body["dislikes"].as_i64().unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn reacting_with_the_other_kind_switches() {
    let ctx = TestContext::new().await;
    let author = register_and_login(&ctx.server, "alba").await;
    let reactor = register_and_login(&ctx.server, "bento").await;
    let recipe_id = create_recipe(&ctx.server, &author.token, "Pastel", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&author.token)
        .json(&json!({ "score": 3 }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &author.token, recipe_id).await;

    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&reactor.token)
        .json(&json!({ "kind": "like" }))
        .await
        .assert_status_ok();

    let switched = ctx
        .server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&reactor.token)
        .json(&json!({ "kind": "dislike" }))
        .await;
    switched.assert_status_ok();
    let body: Value = switched.json();
    assert_eq!(body["liked"].as_bool().unwrap(), false);
    assert_eq!(body["disliked"].as_bool().unwrap(), true);
    assert_eq!(body["likes"].as_i64().unwrap(), 0);
    assert_eq!(body["dislikes"].as_i64().unwrap(), 1);

    // The viewer's own reaction shows up in the listing.
    let body = rating_list(&ctx, &reactor.token, recipe_id).await;
    assert_eq!(body["ratings"][0]["myReaction"], "dislike");
}

#[tokio::test]
#[serial]
async fn invalid_reaction_kind_is_rejected() {
    let ctx = TestContext::new().await;
    let user = register_and_login(&ctx.server, "cris").await;
    let recipe_id = create_recipe(&ctx.server, &user.token, "Empada", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&user.token)
        .json(&json!({ "score": 4 }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &user.token, recipe_id).await;

    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&user.token)
        .json(&json!({ "kind": "love" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn replies_are_listed_oldest_first_with_authors() {
    let ctx = TestContext::new().await;
    let author = register_and_login(&ctx.server, "dora").await;
    let replier = register_and_login(&ctx.server, "enzo").await;
    let recipe_id = create_recipe(&ctx.server, &author.token, "Farofa", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&author.token)
        .json(&json!({ "score": 4, "comment": "nice" }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &author.token, recipe_id).await;

    let first = ctx
        .server
        .post(&format!("/recipes/rating/{rating_id}/responder"))
        .authorization_bearer(&replier.token)
        .json(&json!({ "text": "first reply" }))
        .await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["newReply"]["body"], "first reply");
    assert_eq!(body["newReply"]["username"], "enzo");

    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/responder"))
        .authorization_bearer(&author.token)
        .json(&json!({ "text": "second reply" }))
        .await
        .assert_status_ok();

    // Blank replies are rejected.
    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/responder"))
        .authorization_bearer(&author.token)
        .json(&json!({ "text": "   " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let body = rating_list(&ctx, &author.token, recipe_id).await;
    let replies = body["ratings"][0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["body"], "first reply");
    assert_eq!(replies[1]["body"], "second reply");
}

#[tokio::test]
#[serial]
async fn reply_deletion_is_owner_only() {
    let ctx = TestContext::new().await;
    let author = register_and_login(&ctx.server, "fabi").await;
    let replier = register_and_login(&ctx.server, "gael").await;
    let recipe_id = create_recipe(&ctx.server, &author.token, "Polenta", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&author.token)
        .json(&json!({ "score": 3 }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &author.token, recipe_id).await;

    let response = ctx
        .server
        .post(&format!("/recipes/rating/{rating_id}/responder"))
        .authorization_bearer(&replier.token)
        .json(&json!({ "text": "a reply" }))
        .await;
    let reply_id = response.json::<Value>()["newReply"]["id"].as_i64().unwrap();

    ctx.server
        .delete(&format!("/recipes/rating/reply/{reply_id}"))
        .authorization_bearer(&author.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    ctx.server
        .delete(&format!("/recipes/rating/reply/{reply_id}"))
        .authorization_bearer(&replier.token)
        .await
        .assert_status_ok();

    ctx.server
        .delete(&format!("/recipes/rating/reply/{reply_id}"))
        .authorization_bearer(&replier.token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn rating_deletion_cascades_and_is_owner_only() {
    let ctx = TestContext::new().await;
    let rater = register_and_login(&ctx.server, "hana").await;
    let other = register_and_login(&ctx.server, "ivan").await;
    let recipe_id = create_recipe(&ctx.server, &rater.token, "Torresmo", "[]").await;

    ctx.server
        .post(&format!("/recipes/{recipe_id}/avaliar"))
        .authorization_bearer(&rater.token)
        .json(&json!({ "score": 5, "comment": "crunchy" }))
        .await
        .assert_status_ok();
    let rating_id = single_rating_id(&ctx, &rater.token, recipe_id).await;

    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/react"))
        .authorization_bearer(&other.token)
        .json(&json!({ "kind": "like" }))
        .await
        .assert_status_ok();
    ctx.server
        .post(&format!("/recipes/rating/{rating_id}/responder"))
        .authorization_bearer(&other.token)
        .json(&json!({ "text": "agreed" }))
        .await
        .assert_status_ok();

    // Not the rating's owner.
    ctx.server
        .delete(&format!("/recipes/{recipe_id}/avaliacoes/{rating_id}"))
        .authorization_bearer(&other.token)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    ctx.server
        .delete(&format!("/recipes/{recipe_id}/avaliacoes/{rating_id}"))
        .authorization_bearer(&rater.token)
        .await
        .assert_status_ok();

    let body = rating_list(&ctx, &rater.token, recipe_id).await;
    assert!(body["ratings"].as_array().unwrap().is_empty());
    assert!(body["stats"]["avgScore"].is_null());
    assert_eq!(body["stats"]["totalRatings"].as_i64().unwrap(), 0);

    let reactions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rating_reactions WHERE rating_id = $1")
        .bind(rating_id)
        .fetch_one(ctx.db.pool())
        .await
        .unwrap();
    let replies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rating_replies WHERE rating_id = $1")
        .bind(rating_id)
        .fetch_one(ctx.db.pool())
        .await
        .unwrap();
    assert_eq!((reactions, replies), (0, 0));
}
