mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use shorturl::state::AppState;

#[tokio::test]
async fn test_shorten_returns_short_url() {
    let state = common::create_test_state().await;
    let server = common::create_test_server(state.clone());

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": "https://example.com/some/page" }))
        .await;

    response.assert_status_ok();

    let short_url = response.text();
    assert!(short_url.starts_with("http://sho.rt/api/v1/urls/"));

    let code = common::code_of(&short_url);
    assert_eq!(code.len(), 12);

    let (urls, _) = state.database.repositories();
    let stored = urls.find_by_short_url(code).await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://example.com/some/page");
    assert_eq!(stored.access_count, 0);
    assert!(!stored.deleted);
    assert!(stored.alias.is_none());
}

#[tokio::test]
async fn test_shorten_same_url_twice_creates_two_records() {
    let server = common::create_test_server(common::create_test_state().await);

    let first = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .text();
    let second = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .text();

    assert_ne!(first, second);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let server = common::create_test_server(common::create_test_state().await);

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": "not a url" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "Invalid URL.");
}

#[tokio::test]
async fn test_shorten_rejects_unsupported_scheme() {
    let server = common::create_test_server(common::create_test_state().await);

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": "ftp://example.com/file" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_missing_field() {
    let server = common::create_test_server(common::create_test_state().await);

    let response = server.post("/api/v1/urls").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shorten_wrong_field_type_uses_error_envelope() {
    let server = common::create_test_server(common::create_test_state().await);

    let response = server
        .post("/api/v1/urls")
        .json(&json!({ "originalUrl": 5 }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(body["error"]["message"].is_string());
    assert_eq!(body["error"]["details"]["rejected_status"], 422);
}

#[tokio::test]
async fn test_shorten_without_json_content_type() {
    let server = common::create_test_server(common::create_test_state().await);

    let response = server
        .post("/api/v1/urls")
        .text(r#"{"originalUrl":"https://example.com"}"#)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["rejected_status"], 415);
}

#[tokio::test]
async fn test_shorten_uses_host_header_without_public_base_url() {
    let state = common::create_test_state().await;
    let state = AppState {
        public_base_url: None,
        ..state
    };
    let server = common::create_test_server(state);

    let response = server
        .post("/api/v1/urls")
        .add_header("Host", "links.example.org")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert!(
        response
            .text()
            .starts_with("http://links.example.org/api/v1/urls/")
    );
}
