mod common;

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};

fn make_server() -> (TestServer, Arc<common::InMemoryRepository>, Arc<common::InMemoryCache>) {
    let repo = Arc::new(common::InMemoryRepository::new());
    let cache = Arc::new(common::InMemoryCache::new());
    let state = common::create_test_state(repo.clone(), cache.clone());
    let server = TestServer::new(common::create_test_app(state)).unwrap();
    (server, repo, cache)
}

// ─── POST /api/links ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_success() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .post("/api/links")
        .add_header("Authorization", "Bearer alice")
        .json(&json!({ "longUrl": "https://example.com/page" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["longUrl"], "https://example.com/page");
    assert_eq!(body["data"]["ownerId"], "alice");
    assert_eq!(body["data"]["isActive"], true);
    assert_eq!(body["data"]["totalClicks"], 0);

    let code = body["data"]["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert_eq!(
        body["data"]["shortUrl"],
        format!("{}/{}", common::BASE_URL, code)
    );
}

#[tokio::test]
async fn test_create_link_empty_url_rejected() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .post("/api/links")
        .add_header("Authorization", "Bearer alice")
        .json(&json!({ "longUrl": "" }))
        .await;

    response.assert_status_bad_request();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_link_without_auth_rejected() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .post("/api/links")
        .json(&json!({ "longUrl": "https://example.com" }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_frontend_origin_allowed_cross_origin() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .get("/api/links")
        .add_header("Origin", common::BASE_URL)
        .add_header("Authorization", "Bearer alice")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        common::BASE_URL
    );
    assert_eq!(response.header("access-control-allow-credentials"), "true");
}

#[tokio::test]
async fn test_foreign_origin_not_allowed() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .get("/api/links")
        .add_header("Origin", "https://evil.example")
        .add_header("Authorization", "Bearer alice")
        .await;

    // The request itself is served; the browser gate is the absent header.
    response.assert_status_ok();
    assert!(
        response
            .maybe_header("access-control-allow-origin")
            .is_none()
    );
}

// ─── GET /api/links ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_scoped_to_owner_newest_first() {
    let (server, _repo, _cache) = make_server();

    for url in [
        "https://example.com/first",
        "https://example.com/second",
        "https://example.com/third",
    ] {
        server
            .post("/api/links")
            .add_header("Authorization", "Bearer alice")
            .json(&json!({ "longUrl": url }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
    server
        .post("/api/links")
        .add_header("Authorization", "Bearer bob")
        .json(&json!({ "longUrl": "https://example.com/bobs" }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .get("/api/links")
        .add_header("Authorization", "Bearer alice")
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["longUrl"], "https://example.com/third");
    assert_eq!(data[2]["longUrl"], "https://example.com/first");
    assert!(data.iter().all(|l| l["ownerId"] == "alice"));
}

#[tokio::test]
async fn test_list_links_empty_for_new_owner() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .get("/api/links")
        .add_header("Authorization", "Bearer nobody")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

// ─── PATCH /api/links/{id} ───────────────────────────────────────────────────

#[tokio::test]
async fn test_update_link_success() {
    let (server, repo, _cache) = make_server();
    let id = repo.seed("upd1234", "https://example.com/old", "alice", true);

    let response = server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", "Bearer alice")
        .json(&json!({ "longUrl": "https://example.com/new" }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "URL updated");

    let link = repo.get_by_code("upd1234").unwrap();
    assert_eq!(link.long_url, "https://example.com/new");
}

#[tokio::test]
async fn test_deactivation_takes_effect_immediately() {
    let (server, repo, cache) = make_server();
    let id = repo.seed("off1234", "https://example.com/live", "alice", true);

    // Warm the cache through a real redirect.
    let response = server.get("/off1234").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(response.header("location"), "https://example.com/live");
    for _ in 0..100 {
        if cache.get("off1234").is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", "Bearer alice")
        .json(&json!({ "isActive": false }))
        .await
        .assert_status_ok();

    // The cached entry is gone, so the very next redirect misses.
    let response = server.get("/off1234").await;
    assert_eq!(response.status_code(), 302);
    assert_eq!(
        response.header("location"),
        format!("{}/?notfound=off1234", common::BASE_URL)
    );
}

#[tokio::test]
async fn test_update_link_of_another_owner_looks_missing() {
    let (server, repo, _cache) = make_server();
    let id = repo.seed("own1234", "https://example.com", "alice", true);

    let response = server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", "Bearer mallory")
        .json(&json!({ "isActive": false }))
        .await;

    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"]["message"], "URL not found or access denied");
    // And the link is untouched.
    assert!(repo.get_by_code("own1234").unwrap().is_active);
}

#[tokio::test]
async fn test_update_unknown_id_not_found() {
    let (server, _repo, _cache) = make_server();

    let response = server
        .patch("/api/links/424242")
        .add_header("Authorization", "Bearer alice")
        .json(&json!({ "isActive": false }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_update_with_empty_patch_rejected() {
    let (server, repo, _cache) = make_server();
    let id = repo.seed("nop1234", "https://example.com", "alice", true);

    let response = server
        .patch(&format!("/api/links/{id}"))
        .add_header("Authorization", "Bearer alice")
        .json(&json!({}))
        .await;

    response.assert_status_bad_request();
}
