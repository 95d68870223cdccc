//! Integration tests for the tag catalog.

mod common;

use pretty_assertions::assert_eq;
use serde_json::Value;
use serial_test::serial;

use common::TestContext;

#[tokio::test]
#[serial]
async fn catalog_is_public_and_sorted_by_name() {
    let ctx = TestContext::new().await;

    // No token needed.
    let response = ctx.server.get("/tags").await;
    response.assert_status_ok();

    let tags: Value = response.json();
    let tags = tags.as_array().unwrap();
    assert!(!tags.is_empty());

    let names: Vec<&str> = tags.iter().map(|t| t["name"].as_str().unwrap()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    // Seeded catalog carries the exclusivity flag and a display color.
    let vegetarian = tags.iter().find(|t| t["name"] == "Vegetarian").unwrap();
    assert_eq!(vegetarian["exclusive"].as_bool().unwrap(), true);
    assert!(vegetarian["color"].as_str().unwrap().starts_with('#'));
}
