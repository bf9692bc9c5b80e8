//! Error types for the file cache
//!
//! Provides unified error handling using thiserror. A cache miss is not an
//! error: the store reports it as `Ok(None)`.

use std::io;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the file cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Base or category directory could not be created
    #[error("Unable to create path {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Write refused because the category directory is at its file ceiling
    #[error("Cache directory {} holds {count} files (limit {limit})", .dir.display())]
    CapacityExceeded {
        dir: PathBuf,
        count: usize,
        limit: usize,
    },

    /// Filesystem write, delete or listing failed
    #[error("Filesystem operation failed on {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Entry not found (HTTP layer)
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::CapacityExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            CacheError::StorageUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::WriteFailure { .. } | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the file cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let capacity = CacheError::CapacityExceeded {
            dir: PathBuf::from("/tmp/c"),
            count: 999,
            limit: 999,
        };
        assert_eq!(
            capacity.into_response().status(),
            StatusCode::INSUFFICIENT_STORAGE
        );

        let missing = CacheError::NotFound("pages/x".to_string());
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let unavailable = CacheError::StorageUnavailable {
            path: PathBuf::from("/nope"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_capacity_message() {
        let err = CacheError::CapacityExceeded {
            dir: PathBuf::from("/tmp/c"),
            count: 3,
            limit: 3,
        };
        assert_eq!(
            err.to_string(),
            "Cache directory /tmp/c holds 3 files (limit 3)"
        );
    }
}
