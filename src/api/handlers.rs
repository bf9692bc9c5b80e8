//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.
//!
//! Every request opens its own `CacheStore`, so a watermark written by one
//! request is seen by the next. Filesystem work runs on the blocking pool.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use crate::cache::{CacheStore, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_identifier, ExistsResponse, ExpireResponse, HealthResponse, PurgeQuery,
    PurgeResponse, RemoveResponse, SaveResponse, TtlQuery,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration, including the cache root
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.clone())
    }
}

// == Helpers ==
/// Runs filesystem work on the blocking thread pool.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| CacheError::Internal(format!("Blocking task failed: {}", e)))?
}

/// Opens the store for `category` with the server's options.
fn open_store(config: &Config, category: &str, ttl: u64) -> Result<CacheStore> {
    CacheStore::open_with(
        &config.cache_dir,
        category,
        ttl,
        config.store_options(),
        Arc::new(SystemClock),
    )
}

fn validate(kind: &str, id: &str) -> Result<()> {
    match validate_identifier(kind, id) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for GET /cache/:category/:variant
///
/// Returns the raw entry payload, or 404 on a miss.
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path((category, variant)): Path<(String, String)>,
    Query(query): Query<TtlQuery>,
) -> Result<Vec<u8>> {
    validate("Category", &category)?;
    validate("Variant", &variant)?;

    let config = state.config.clone();
    let ttl = query.ttl.unwrap_or(config.default_ttl);

    run_blocking(move || {
        let mut store = open_store(&config, &category, ttl)?;
        store.set_variant(&variant);
        store.get().ok_or_else(|| {
            debug!("Miss for {}/{}", category, variant);
            CacheError::NotFound(format!("{}/{}", category, variant))
        })
    })
    .await
}

/// Handler for PUT /cache/:category/:variant
///
/// Stores the request body as the entry payload.
pub async fn put_entry_handler(
    State(state): State<AppState>,
    Path((category, variant)): Path<(String, String)>,
    Query(query): Query<TtlQuery>,
    body: Bytes,
) -> Result<Json<SaveResponse>> {
    validate("Category", &category)?;
    validate("Variant", &variant)?;

    let config = state.config.clone();
    let ttl = query.ttl.unwrap_or(config.default_ttl);

    run_blocking(move || {
        let mut store = open_store(&config, &category, ttl)?;
        store.set_variant(&variant);
        store.save(&body)?;
        Ok(Json(SaveResponse::new(category, variant, body.len())))
    })
    .await
}

/// Handler for GET /cache/:category/:variant/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path((category, variant)): Path<(String, String)>,
) -> Result<Json<ExistsResponse>> {
    validate("Category", &category)?;
    validate("Variant", &variant)?;

    let config = state.config.clone();

    run_blocking(move || {
        let mut store = open_store(&config, &category, config.default_ttl)?;
        store.set_variant(&variant);
        let exists = store.exists();
        Ok(Json(ExistsResponse {
            category,
            variant,
            exists,
        }))
    })
    .await
}

/// Handler for DELETE /cache/:category
///
/// Removes every entry of the category and its directory.
pub async fn remove_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<RemoveResponse>> {
    validate("Category", &category)?;

    let config = state.config.clone();

    run_blocking(move || {
        let store = open_store(&config, &category, config.default_ttl)?;
        let removal = store.remove()?;
        Ok(Json(RemoveResponse::new(category, removal)))
    })
    .await
}

/// Handler for POST /expire/:category
///
/// Writes the watermark, expiring everything cached so far.
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<ExpireResponse>> {
    validate("Category", &category)?;

    let config = state.config.clone();

    run_blocking(move || {
        let mut store = open_store(&config, &category, config.default_ttl)?;
        store.expire_all()?;
        Ok(Json(ExpireResponse::new(category)))
    })
    .await
}

/// Handler for DELETE /cache
///
/// Recursively clears the whole cache root.
pub async fn purge_handler(
    State(state): State<AppState>,
    Query(query): Query<PurgeQuery>,
) -> Result<Json<PurgeResponse>> {
    let config = state.config.clone();

    run_blocking(move || {
        let removed = CacheStore::remove_all(&config.cache_dir, query.remove_root)?;
        Ok(Json(PurgeResponse { removed }))
    })
    .await
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
