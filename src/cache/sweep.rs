//! Sweep Module
//!
//! Directory-scoped scans: counting entries, reclaiming expired ones and
//! bulk removal of a whole cache root.
//!
//! Staging files left behind by an interrupted write are cleaned up here
//! as well, so they never pin a directory or pile up past the file limit.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::cache::expiry::{modified_time, ExpiryPolicy};
use crate::cache::naming::{has_cache_suffix, is_temp_file, is_watermark_file};
use crate::error::{CacheError, Result};

/// Age after which a staging file is assumed abandoned by its writer.
pub const TEMP_FILE_GRACE: Duration = Duration::from_secs(300);

// == List Cache Files ==
/// Lists the cache files directly inside `dir`. Subdirectories are not
/// descended into.
pub fn list_cache_files(dir: &Path) -> Result<Vec<PathBuf>> {
    list_files(dir, has_cache_suffix)
}

fn list_files(dir: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| CacheError::WriteFailure {
        path: dir.to_path_buf(),
        source,
    })?;

    let files = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();

    Ok(files)
}

// == Remove Temp Files ==
/// Deletes staging files directly inside `dir`.
///
/// With a `cutoff`, only files last modified at or before it are removed;
/// younger ones may still belong to a writer in flight. Best-effort.
fn remove_temp_files(dir: &Path, cutoff: Option<SystemTime>) -> usize {
    let files = match list_files(dir, is_temp_file) {
        Ok(files) => files,
        Err(e) => {
            debug!("Temp cleanup skipped: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for file in files {
        if let Some(cutoff) = cutoff {
            match modified_time(&file) {
                Some(mtime) if mtime <= cutoff => {}
                _ => continue,
            }
        }
        match fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => debug!("Could not remove temp file {}: {}", file.display(), e),
        }
    }

    if removed > 0 {
        debug!("Removed {} abandoned temp files from {}", removed, dir.display());
    }
    removed
}

// == Sweep Expired ==
/// Deletes every cache file in `dir` that `policy` considers expired at `now`,
/// plus staging files older than [`TEMP_FILE_GRACE`].
///
/// Best-effort: listing and deletion failures are logged and skipped.
/// Returns the number of files removed.
pub fn sweep_expired(dir: &Path, policy: &ExpiryPolicy, now: SystemTime) -> usize {
    let files = match list_cache_files(dir) {
        Ok(files) => files,
        Err(e) => {
            debug!("Sweep skipped: {}", e);
            return 0;
        }
    };

    let mut removed = 0;
    for file in files {
        if !policy.is_expired(modified_time(&file), now) {
            continue;
        }
        match fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => debug!("Could not remove expired {}: {}", file.display(), e),
        }
    }

    if removed > 0 {
        info!("Sweep: removed {} expired entries from {}", removed, dir.display());
    }

    if let Some(cutoff) = now.checked_sub(TEMP_FILE_GRACE) {
        removed += remove_temp_files(dir, Some(cutoff));
    }
    removed
}

// == Remove Cache Files ==
/// Deletes every cache file directly inside `dir`, along with any staging
/// files. Other files and subdirectories are left alone.
///
/// Returns the number of cache files removed.
pub fn remove_cache_files(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for file in list_cache_files(dir)? {
        match fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => debug!("Could not remove {}: {}", file.display(), e),
        }
    }
    remove_temp_files(dir, None);
    Ok(removed)
}

// == Remove All ==
/// Recursively clears a cache root.
///
/// Cache files, staging files and watermark files are deleted wherever
/// they appear; any other file is kept. Every subdirectory is removed once emptied, and
/// `path` itself is removed too when `also_remove_dir` is set. Directories
/// still holding foreign files stay in place.
///
/// Returns the number of files and directories removed.
pub fn remove_all(path: &Path, also_remove_dir: bool) -> Result<usize> {
    if let Err(source) = fs::read_dir(path) {
        return Err(CacheError::WriteFailure {
            path: path.to_path_buf(),
            source,
        });
    }

    let mut removed = 0;
    for entry in WalkDir::new(path).follow_links(false).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if entry.depth() == 0 && !also_remove_dir {
                continue;
            }
            match fs::remove_dir(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Directory {} kept: {}", entry.path().display(), e),
            }
        } else if file_type.is_file()
            && (has_cache_suffix(entry.path())
                || is_temp_file(entry.path())
                || is_watermark_file(entry.path()))
        {
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Could not remove {}: {}", entry.path().display(), e),
            }
        }
    }

    info!("Removed {} cache entries under {}", removed, path.display());
    Ok(removed)
}
