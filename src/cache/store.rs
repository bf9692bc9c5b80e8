//! Cache Store Module
//!
//! Main cache engine: one handle per (base directory, category) pair, with
//! entries stored as `.cache` files and expired by TTL or watermark.

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::expiry::{load_watermark, modified_time, write_watermark, ExpiryPolicy};
use crate::cache::naming::{
    entry_path, is_cache_file, sanitize_identifier, temp_file_name, PRIMARY_FALLBACK_ID,
    WATERMARK_FILENAME,
};
use crate::cache::options::{apply_mode, StoreOptions};
use crate::cache::sweep;
use crate::error::{CacheError, Result};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// == Removal ==
/// Outcome of `CacheStore::remove`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removal {
    /// Cache files deleted from the category directory
    pub files_removed: usize,
    /// Whether the category directory itself was removed
    pub dir_removed: bool,
}

// == Cache Store ==
/// Handle on one cache category.
///
/// The watermark is read once when the handle is opened. A watermark
/// written afterwards by another handle is only observed after
/// `refresh_watermark` or by reopening.
#[derive(Debug)]
pub struct CacheStore {
    /// Root shared by all categories, holds the watermark file
    base_dir: PathBuf,
    /// Directory holding this category's entries
    category_dir: PathBuf,
    /// Path of the watermark file
    watermark_path: PathBuf,
    /// Entry name used when no variant is set
    primary_id: String,
    /// Active variant, already sanitized
    variant: Option<String>,
    /// TTL and watermark in effect for this handle
    policy: ExpiryPolicy,
    options: StoreOptions,
    /// Whether opening this handle created `base_dir`
    created_base: bool,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Opens (creating if needed) the category `category` under `base_dir`
    /// with default options and the system clock.
    ///
    /// An empty `category` yields an administrative handle whose category
    /// directory is `base_dir` itself.
    ///
    /// # Arguments
    /// * `base_dir` - Root directory of the cache
    /// * `category` - Category identifier, sanitized before use
    /// * `ttl_secs` - Entry lifetime in seconds, 0 = expire by watermark only
    pub fn open(base_dir: impl AsRef<Path>, category: &str, ttl_secs: u64) -> Result<Self> {
        Self::open_with(
            base_dir,
            category,
            ttl_secs,
            StoreOptions::default(),
            Arc::new(SystemClock),
        )
    }

    /// Opens a category with explicit options and clock.
    ///
    /// Fails with `StorageUnavailable` if the base or category directory
    /// cannot be created.
    pub fn open_with(
        base_dir: impl AsRef<Path>,
        category: &str,
        ttl_secs: u64,
        options: StoreOptions,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let category = sanitize_identifier(category);

        let (category_dir, primary_id) = if category.is_empty() {
            (base_dir.clone(), PRIMARY_FALLBACK_ID.to_string())
        } else {
            (base_dir.join(&category), category)
        };

        let created_base = ensure_dir(&base_dir, options.dir_mode)?;
        ensure_dir(&category_dir, options.dir_mode)?;

        let watermark_path = base_dir.join(WATERMARK_FILENAME);
        let watermark = load_watermark(&watermark_path);

        Ok(Self {
            base_dir,
            category_dir,
            watermark_path,
            primary_id,
            variant: None,
            policy: ExpiryPolicy::new(ttl_secs, watermark),
            options,
            created_base,
            clock,
        })
    }

    // == Variant ==
    /// Selects the variant used by subsequent operations.
    ///
    /// Characters outside `[A-Za-z0-9_+-]` are replaced with `_`. An empty
    /// id falls back to the category's primary entry.
    pub fn set_variant(&mut self, id: &str) {
        let id = sanitize_identifier(id);
        self.variant = if id.is_empty() { None } else { Some(id) };
    }

    /// Returns to the category's primary entry.
    pub fn clear_variant(&mut self) {
        self.variant = None;
    }

    /// Returns the active variant, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Returns the path of the entry for the active variant.
    pub fn entry_path(&self) -> PathBuf {
        let id = self.variant.as_deref().unwrap_or(&self.primary_id);
        entry_path(&self.category_dir, id)
    }

    // == Exists ==
    /// Checks whether the entry file exists, expired or not.
    pub fn exists(&self) -> bool {
        self.entry_path().is_file()
    }

    // == Get ==
    /// Reads the entry for the active variant.
    ///
    /// Returns `None` on a miss: absent, expired or unreadable. An expired
    /// entry is deleted as a side effect.
    pub fn get(&self) -> Option<Vec<u8>> {
        let path = self.entry_path();

        if is_cache_file(&path) && self.is_expired(&path) {
            debug!("Expired entry {}", path.display());
            remove_quietly(&path);
            return None;
        }

        match fs::read(&path) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!("Cache miss {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Reads the entry as UTF-8 text. Non-UTF-8 payloads count as a miss.
    pub fn get_string(&self) -> Option<String> {
        self.get().and_then(|data| String::from_utf8(data).ok())
    }

    // == Is Expired ==
    /// Checks whether the file at `path` is stale under this handle's policy.
    pub fn is_expired(&self, path: &Path) -> bool {
        self.policy.is_expired(modified_time(path), self.clock.now())
    }

    // == Save ==
    /// Writes `data` as the entry for the active variant, replacing any
    /// previous content.
    ///
    /// Creating a new entry is refused with `CapacityExceeded` once the
    /// category directory holds `max_files` cache files. Each refusal also
    /// deletes the directory's expired entries so later writes can succeed.
    pub fn save(&self, data: impl AsRef<[u8]>) -> Result<()> {
        let path = self.entry_path();

        if !path.is_file() {
            let count = sweep::list_cache_files(&self.category_dir)?.len();
            if count >= self.options.max_files {
                warn!(
                    "Refusing write to {}: {} files (limit {})",
                    path.display(),
                    count,
                    self.options.max_files
                );
                sweep::sweep_expired(&self.category_dir, &self.policy, self.clock.now());
                return Err(CacheError::CapacityExceeded {
                    dir: self.category_dir.clone(),
                    count,
                    limit: self.options.max_files,
                });
            }
        }

        self.write_entry(&path, data.as_ref())
            .map_err(|source| CacheError::WriteFailure {
                path: path.clone(),
                source,
            })?;

        if let Some(mode) = self.options.file_mode {
            if let Err(e) = apply_mode(&path, mode) {
                debug!("Could not set mode on {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    /// Writes through a sibling temp file so readers never see a partial entry.
    fn write_entry(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tag = format!(
            "{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let temp_path = path.with_file_name(temp_file_name(&file_name, &tag));

        let result = (|| -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.set_modified(self.clock.now())?;
            drop(file);
            fs::rename(&temp_path, path)
        })();

        if result.is_err() {
            remove_quietly(&temp_path);
        }
        result
    }

    // == Remove ==
    /// Deletes every cache file in the category directory, then the
    /// directory itself.
    ///
    /// Subdirectories are not descended into. Failing to remove the
    /// directory (foreign files left behind) is reported in the returned
    /// `Removal`, not as an error.
    pub fn remove(&self) -> Result<Removal> {
        let files_removed = if self.category_dir.is_dir() {
            sweep::remove_cache_files(&self.category_dir)?
        } else {
            0
        };

        let dir_removed = match fs::remove_dir(&self.category_dir) {
            Ok(()) => true,
            Err(e) => {
                debug!("Category dir {} kept: {}", self.category_dir.display(), e);
                false
            }
        };

        info!(
            "Removed {} entries from {}",
            files_removed,
            self.category_dir.display()
        );
        Ok(Removal {
            files_removed,
            dir_removed,
        })
    }

    // == Expire All ==
    /// Expires every entry written before now, in every category sharing
    /// this base directory, by rewriting the watermark file.
    ///
    /// This handle adopts the new watermark immediately; other open
    /// handles see it after `refresh_watermark`.
    pub fn expire_all(&mut self) -> Result<()> {
        let now = self.clock.now();
        write_watermark(&self.watermark_path, now).map_err(|source| CacheError::WriteFailure {
            path: self.watermark_path.clone(),
            source,
        })?;
        self.policy.watermark = Some(now);
        Ok(())
    }

    /// Re-reads the watermark file.
    pub fn refresh_watermark(&mut self) {
        self.policy.watermark = load_watermark(&self.watermark_path);
    }

    // == Remove All ==
    /// Recursively removes cache files, watermark files and emptied
    /// directories under `path`. See [`sweep::remove_all`].
    pub fn remove_all(path: impl AsRef<Path>, also_remove_dir: bool) -> Result<usize> {
        sweep::remove_all(path.as_ref(), also_remove_dir)
    }

    // == Modes ==
    /// Sets the mode applied to entry files on each write.
    pub fn set_file_mode(&mut self, mode: Option<u32>) {
        self.options.file_mode = mode;
    }

    /// Sets the directory mode and applies it right away to the category
    /// directory, and to the base directory if this handle created it.
    pub fn set_dir_mode(&mut self, mode: Option<u32>) {
        self.options.dir_mode = mode;
        let Some(mode) = mode else {
            return;
        };

        let mut dirs = vec![self.category_dir.as_path()];
        if self.created_base && self.base_dir != self.category_dir {
            dirs.push(self.base_dir.as_path());
        }
        for dir in dirs {
            if let Err(e) = apply_mode(dir, mode) {
                debug!("Could not set mode on {}: {}", dir.display(), e);
            }
        }
    }

    // == Accessors ==
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn category_dir(&self) -> &Path {
        &self.category_dir
    }

    pub fn ttl(&self) -> u64 {
        self.policy.ttl_secs
    }

    pub fn watermark(&self) -> Option<SystemTime> {
        self.policy.watermark
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }
}

impl fmt::Display for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry_path().display())
    }
}

// == Helpers ==
/// Creates `dir` if missing and applies `mode` to it. Returns whether the
/// directory had to be created.
fn ensure_dir(dir: &Path, mode: Option<u32>) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }

    fs::create_dir_all(dir).map_err(|source| CacheError::StorageUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;
    info!("Created cache directory {}", dir.display());

    if let Some(mode) = mode {
        if let Err(e) = apply_mode(dir, mode) {
            debug!("Could not set mode on {}: {}", dir.display(), e);
        }
    }
    Ok(true)
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!("Could not remove {}: {}", path.display(), e);
    }
}
