//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    exists_handler, expire_handler, get_entry_handler, health_handler, purge_handler,
    put_entry_handler, remove_category_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cache/:category/:variant` - Read an entry (raw bytes)
/// - `PUT /cache/:category/:variant` - Write an entry from the request body
/// - `GET /cache/:category/:variant/exists` - Check whether an entry file exists
/// - `DELETE /cache/:category` - Remove a category and its entries
/// - `POST /expire/:category` - Expire everything cached so far
/// - `DELETE /cache` - Clear the whole cache root
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/cache", delete(purge_handler))
        .route("/cache/:category", delete(remove_category_handler))
        .route(
            "/cache/:category/:variant",
            get(get_entry_handler).put(put_entry_handler),
        )
        .route("/cache/:category/:variant/exists", get(exists_handler))
        .route("/expire/:category", post(expire_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn create_test_app(temp_dir: &TempDir) -> Router {
        let state = AppState::new(Config {
            cache_dir: temp_dir.path().join("cache"),
            ..Config::default()
        });
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let app = create_test_app(&temp_dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_put_endpoint() {
        let temp_dir = TempDir::new().unwrap();
        let app = create_test_app(&temp_dir);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/cache/pages/home")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(temp_dir.path().join("cache/pages/home.cache").is_file());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let app = create_test_app(&temp_dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/cache/pages/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expire_requires_post() {
        let temp_dir = TempDir::new().unwrap();
        let app = create_test_app(&temp_dir);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/expire/pages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
