//! Request DTOs for the cache server API
//!
//! Defines query parameters and path validation for incoming requests.

use serde::Deserialize;

/// Longest category or variant id accepted in a request path.
pub const MAX_IDENTIFIER_LENGTH: usize = 200;

/// Query string for entry operations (`?ttl=`)
///
/// The TTL belongs to the category, so readers and writers of the same
/// category should pass the same value. Omitted = server default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TtlQuery {
    /// TTL in seconds, 0 = expire by watermark only
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Query string for the bulk purge (`?remove_root=`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurgeQuery {
    /// Also remove the cache root directory itself
    #[serde(default)]
    pub remove_root: bool,
}

/// Validates a category or variant id taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_identifier(kind: &str, id: &str) -> Option<String> {
    if id.is_empty() {
        return Some(format!("{} cannot be empty", kind));
    }
    if id.len() > MAX_IDENTIFIER_LENGTH {
        return Some(format!(
            "{} exceeds maximum length of {} characters",
            kind, MAX_IDENTIFIER_LENGTH
        ));
    }
    None
}
