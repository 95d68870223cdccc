//! Shared test fixtures.
//!
//! Compiled into every integration test target; not every target uses every
//! helper.
#![allow(dead_code)]

pub mod auth_helpers;
pub mod database;

use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;

use forkfeed::backend::server::config::Config;
use forkfeed::backend::server::state::AppState;
use forkfeed::backend::routes::router::create_router;
use forkfeed::backend::uploads::cleanup::spawn_cleanup_worker;

use database::TestDatabase;

/// A running test application: real router, migrated database, temp upload
/// directory. Each test suite runs serially against the shared test
/// database; `new` truncates user data first.
pub struct TestContext {
    pub server: TestServer,
    pub db: TestDatabase,
    /// Keeps the upload directory alive for the test's duration.
    #[allow(dead_code)]
    pub upload_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDatabase::new().await;
        db.cleanup().await.expect("failed to clean test database");

        let upload_dir = tempfile::tempdir().expect("failed to create temp upload dir");

        let config = Config {
            database_url: database::test_database_url(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            upload_dir: upload_dir.path().to_path_buf(),
            smtp: None,
        };

        let state = AppState {
            pool: db.pool().clone(),
            config: Arc::new(config),
            mailer: None,
            cleanup: spawn_cleanup_worker(upload_dir.path().to_path_buf()),
        };

        let server = TestServer::new(create_router(state)).expect("failed to start test server");

        Self {
            server,
            db,
            upload_dir,
        }
    }
}

/// Create a recipe through the real multipart endpoint; returns its id.
pub async fn create_recipe(server: &TestServer, token: &str, dish: &str, tags: &str) -> i64 {
    use axum_test::multipart::MultipartForm;

    let form = MultipartForm::new()
        .add_text("dish", dish.to_string())
        .add_text("ingredients", "beans, salt")
        .add_text("steps", "cook everything")
        .add_text("description", format!("{dish} description"))
        .add_text("tags", tags.to_string());

    let response = server
        .post("/recipes")
        .authorization_bearer(token)
        .multipart(form)
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["recipeId"].as_i64().expect("create response carries recipeId")
}
