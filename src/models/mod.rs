//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{validate_identifier, PurgeQuery, TtlQuery, MAX_IDENTIFIER_LENGTH};
pub use responses::{
    ErrorResponse, ExistsResponse, ExpireResponse, HealthResponse, PurgeResponse, RemoveResponse,
    SaveResponse,
};
