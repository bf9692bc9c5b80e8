//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use file_cache::{api::create_router, AppState, Config};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(temp_dir: &TempDir, max_files: usize) -> Router {
    let state = AppState::new(Config {
        cache_dir: temp_dir.path().join("cache"),
        max_files,
        ..Config::default()
    });
    create_router(state)
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Body) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap()
}

// == Entry Endpoint Tests ==

#[tokio::test]
async fn test_put_then_get_entry() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    let response = send(&app, "PUT", "/cache/pages/page-42", Body::from("rendered-html")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["size"], 13);
    assert!(json["message"].as_str().unwrap().contains("pages/page-42"));

    let response = send(&app, "GET", "/cache/pages/page-42", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"rendered-html");
}

#[tokio::test]
async fn test_get_missing_entry() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    let response = send(&app, "GET", "/cache/pages/missing", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("pages/missing"));
}

#[tokio::test]
async fn test_exists_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    let response = send(&app, "GET", "/cache/pages/home/exists", Body::empty()).await;
    assert_eq!(body_to_json(response.into_body()).await["exists"], false);

    send(&app, "PUT", "/cache/pages/home", Body::from("x")).await;

    let response = send(&app, "GET", "/cache/pages/home/exists", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["exists"], true);
}

#[tokio::test]
async fn test_traversal_variant_is_confined() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    let response = send(&app, "PUT", "/cache/pages/..%2F..%2Fetc", Body::from("x")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(temp_dir.path().join("cache/pages/______etc.cache").is_file());
}

// == Capacity Tests ==

#[tokio::test]
async fn test_capacity_exceeded_status() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 1);

    let response = send(&app, "PUT", "/cache/pages/a", Body::from("a")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "PUT", "/cache/pages/b", Body::from("b")).await;
    assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);

    // Overwrite of an existing entry is not refused
    let response = send(&app, "PUT", "/cache/pages/a", Body::from("a2")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// == Expiration Tests ==

#[tokio::test]
async fn test_expire_endpoint_invalidates_entries() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    send(&app, "PUT", "/cache/pages/home?ttl=0", Body::from("old")).await;

    // Keep the entry's mtime strictly before the watermark
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let response = send(&app, "POST", "/expire/pages", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("expired_at").is_some());

    let response = send(&app, "GET", "/cache/pages/home?ttl=0", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Removal Tests ==

#[tokio::test]
async fn test_remove_category_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    send(&app, "PUT", "/cache/pages/a", Body::from("a")).await;
    send(&app, "PUT", "/cache/pages/b", Body::from("b")).await;

    let response = send(&app, "DELETE", "/cache/pages", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["files_removed"], 2);
    assert_eq!(json["dir_removed"], true);
}

#[tokio::test]
async fn test_purge_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    send(&app, "PUT", "/cache/pages/a", Body::from("a")).await;
    send(&app, "PUT", "/cache/feeds/b", Body::from("b")).await;
    send(&app, "POST", "/expire/pages", Body::empty()).await;

    let response = send(&app, "DELETE", "/cache", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);

    // 2 entries + watermark + 2 category dirs, root kept
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 5);
    assert!(temp_dir.path().join("cache").is_dir());
}

// == Health Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_test_app(&temp_dir, 999);

    let response = send(&app, "GET", "/health", Body::empty()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
