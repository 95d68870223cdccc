//! Helpers for registering and authenticating test users.

use axum_test::TestServer;
use serde_json::{json, Value};

/// A registered, logged-in test user.
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

/// Register `username` and log in, returning the bearer token.
pub async fn register_and_login(server: &TestServer, username: &str) -> TestUser {
    let email = format!("{username}@example.com");

    let response = server
        .post("/auth/register")
        .json(&json!({
            "username": username,
            "email": email,
            "password": "password123",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/auth/login")
        .json(&json!({
            "email": email,
            "password": "password123",
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    TestUser {
        id: body["id"].as_i64().expect("login response carries id"),
        username: username.to_string(),
        token: body["token"].as_str().expect("login response carries token").to_string(),
    }
}
