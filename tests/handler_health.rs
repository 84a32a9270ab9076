mod common;

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

/// The test state carries a lazy pool pointed at nothing, so the database
/// check fails while cache and click queue stay healthy. Exactly the shape
/// of a partial outage.
#[tokio::test]
async fn test_health_reports_degraded_components() {
    let repo = Arc::new(common::InMemoryRepository::new());
    let cache = Arc::new(common::InMemoryCache::new());
    let state = common::create_test_state(repo, cache);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 503);

    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["database"]["status"], "error");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
    assert_eq!(body["checks"]["clickQueue"]["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let repo = Arc::new(common::InMemoryRepository::new());
    let cache = Arc::new(common::InMemoryCache::new());
    let state = common::create_test_state(repo, cache);
    let server = TestServer::new(common::create_test_app(state)).unwrap();

    let response = server
        .get("/api/nope")
        .add_header("Authorization", "Bearer alice")
        .await;

    response.assert_status_not_found();
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}
