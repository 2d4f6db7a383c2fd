mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use shorturl::api::middleware::rate_limit::ThrottleSettings;
use shorturl::routes::build_router;

#[tokio::test]
async fn test_url_api_is_throttled_per_ip() {
    let state = common::create_test_state().await;
    let options = common::router_options(Some(ThrottleSettings {
        per_second: 1,
        burst: 2,
    }));
    let app = build_router(state, &options).layer(common::MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    server.get("/api/v1/urls").await.assert_status_ok();
    server.get("/api/v1/urls").await.assert_status_ok();

    let response = server.get("/api/v1/urls").await;
    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_is_not_throttled() {
    let state = common::create_test_state().await;
    let options = common::router_options(Some(ThrottleSettings {
        per_second: 1,
        burst: 1,
    }));
    let app = build_router(state, &options).layer(common::MockConnectInfoLayer);
    let server = TestServer::new(app).unwrap();

    for _ in 0..3 {
        server.get("/health").await.assert_status_ok();
    }
}
