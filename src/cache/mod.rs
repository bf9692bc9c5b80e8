//! Cache Module
//!
//! Provides a filesystem-backed cache with TTL expiration, per-category
//! watermark invalidation and a per-directory file ceiling.

mod clock;
mod expiry;
mod naming;
mod options;
mod store;
mod sweep;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use expiry::{load_watermark, write_watermark, ExpiryPolicy};
pub use naming::{
    entry_file_name, entry_path, has_cache_suffix, is_cache_file, is_temp_file, is_watermark_file,
    sanitize_identifier, temp_file_name, CACHE_FILE_EXTENSION, PRIMARY_FALLBACK_ID,
    TEMP_FILE_EXTENSION, WATERMARK_FILENAME,
};
pub use options::{
    apply_mode, parse_mode, StoreOptions, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DEFAULT_MAX_FILES,
};
pub use store::{CacheStore, Removal};
pub use sweep::{list_cache_files, remove_all, sweep_expired, TEMP_FILE_GRACE};
