//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{
    parse_mode, StoreOptions, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DEFAULT_MAX_FILES,
};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding every cache category
    pub cache_dir: PathBuf,
    /// Default TTL in seconds for categories without an explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum cache files per category directory
    pub max_files: usize,
    /// Mode applied to entry files
    pub file_mode: u32,
    /// Mode applied to created directories
    pub dir_mode: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Cache root directory (default: ./cache)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_CACHE_FILES` - File ceiling per category (default: 999)
    /// - `CACHE_FILE_MODE` - Octal file mode (default: 666)
    /// - `CACHE_DIR_MODE` - Octal directory mode (default: 777)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            default_ttl: env::var("DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_ttl),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            max_files: env::var("MAX_CACHE_FILES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_files),
            file_mode: env::var("CACHE_FILE_MODE")
                .ok()
                .and_then(|v| parse_mode(&v))
                .unwrap_or(defaults.file_mode),
            dir_mode: env::var("CACHE_DIR_MODE")
                .ok()
                .and_then(|v| parse_mode(&v))
                .unwrap_or(defaults.dir_mode),
        }
    }

    /// Options handed to every `CacheStore` the server opens.
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            file_mode: Some(self.file_mode),
            dir_mode: Some(self.dir_mode),
            max_files: self.max_files,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./cache"),
            default_ttl: 3600,
            server_port: 3000,
            max_files: DEFAULT_MAX_FILES,
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}
