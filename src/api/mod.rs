//! API Module
//!
//! HTTP handlers and routing exposing the file cache over REST.
//!
//! # Endpoints
//! - `GET|PUT /cache/:category/:variant` - Read or write an entry
//! - `GET /cache/:category/:variant/exists` - Entry existence
//! - `DELETE /cache/:category` - Remove a category
//! - `POST /expire/:category` - Expire a cache root by watermark
//! - `DELETE /cache` - Clear the whole cache root
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
