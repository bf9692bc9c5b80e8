//! File Cache - A filesystem-backed cache engine
//!
//! Stores computed data as files with per-category TTL, named variants,
//! a per-directory file ceiling and O(1) watermark invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::CacheStore;
pub use config::Config;
pub use error::{CacheError, Result};
