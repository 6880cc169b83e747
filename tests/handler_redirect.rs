mod common;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{Value, json};

use tiny_url::domain::repositories::UrlRepository;

use common::{ALICE_AUTH, TestApp};

async fn shorten(app: &TestApp, original: &str, duration_seconds: i64) -> String {
    let response = app
        .server
        .post("/api/urls")
        .add_header("Authorization", ALICE_AUTH)
        .json(&json!({ "original": original, "duration_seconds": duration_seconds }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["alias"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app().await;
    let alias = shorten(&app, "https://example.com/target", 3600).await;

    let response = app.server.get(&format!("/{alias}")).await;

    assert_eq!(response.status_code(), 301);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_fills_cache() {
    let app = common::spawn_app().await;
    let alias = shorten(&app, "https://example.com/target", 3600).await;
    assert!(app.cache.is_empty());

    app.server
        .get(&format!("/{alias}"))
        .await
        .assert_status(StatusCode::MOVED_PERMANENTLY);

    let cache = app.cache.clone();
    common::wait_until(|| cache.len() == 1).await;

    // Served from the cache even once the store no longer has it.
    assert!(app.store.delete(&alias).await.unwrap());
    let response = app.server.get(&format!("/{alias}")).await;
    assert_eq!(response.status_code(), 301);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app().await;

    let response = app.server.get("/nonexistent").await;

    response.assert_status_not_found();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_expired_then_removed() {
    let app = common::spawn_app().await;
    let alias = shorten(&app, "https://example.com/target", 60).await;

    app.clock.advance(Duration::seconds(60));

    let response = app.server.get(&format!("/{alias}")).await;
    response.assert_status(StatusCode::GONE);

    let store = app.store.clone();
    common::wait_until(|| store.is_empty()).await;

    app.server
        .get(&format!("/{alias}"))
        .await
        .assert_status_not_found();
}
