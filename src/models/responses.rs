//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing JSON response bodies. Entry payloads
//! are returned as raw bytes, not through these types.

use serde::Serialize;

use crate::cache::Removal;

/// Response body for PUT /cache/:category/:variant
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    /// Success message
    pub message: String,
    pub category: String,
    pub variant: String,
    /// Bytes written
    pub size: usize,
}

impl SaveResponse {
    /// Creates a new SaveResponse
    pub fn new(category: impl Into<String>, variant: impl Into<String>, size: usize) -> Self {
        let category = category.into();
        let variant = variant.into();
        Self {
            message: format!("Entry '{}/{}' saved successfully", category, variant),
            category,
            variant,
            size,
        }
    }
}

/// Response body for GET /cache/:category/:variant/exists
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub category: String,
    pub variant: String,
    pub exists: bool,
}

/// Response body for DELETE /cache/:category
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    pub category: String,
    /// Cache files deleted
    pub files_removed: usize,
    /// Whether the category directory was removed too
    pub dir_removed: bool,
}

impl RemoveResponse {
    /// Creates a new RemoveResponse from a store removal
    pub fn new(category: impl Into<String>, removal: Removal) -> Self {
        Self {
            category: category.into(),
            files_removed: removal.files_removed,
            dir_removed: removal.dir_removed,
        }
    }
}

/// Response body for POST /expire/:category
#[derive(Debug, Clone, Serialize)]
pub struct ExpireResponse {
    /// Success message
    pub message: String,
    pub category: String,
    /// When the watermark was written, ISO 8601
    pub expired_at: String,
}

impl ExpireResponse {
    /// Creates a new ExpireResponse stamped with the current time
    pub fn new(category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            message: format!("All entries of '{}' expired", category),
            category,
            expired_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Files and directories removed
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_response_serialize() {
        let resp = SaveResponse::new("pages", "page-42", 13);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("pages/page-42"));
        assert!(json.contains("\"size\":13"));
    }

    #[test]
    fn test_remove_response_from_removal() {
        let resp = RemoveResponse::new(
            "pages",
            Removal {
                files_removed: 3,
                dir_removed: true,
            },
        );
        assert_eq!(resp.files_removed, 3);
        assert!(resp.dir_removed);
    }

    #[test]
    fn test_expire_response_serialize() {
        let resp = ExpireResponse::new("pages");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("expired_at"));
        assert!(json.contains("pages"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
