//! Expiry Module
//!
//! TTL and watermark expiration policy for cache entries.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use tracing::{debug, info};

// == Expiry Policy ==
/// Decides whether an entry is stale from its modification time.
///
/// Holds the category TTL and the watermark instant captured when the
/// owning store was opened. A watermark written later is only seen after
/// `CacheStore::refresh_watermark` or by a newly opened store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Time-based lifetime in seconds, 0 = no time-based expiration
    pub ttl_secs: u64,
    /// Everything modified strictly before this instant is stale
    pub watermark: Option<SystemTime>,
}

impl ExpiryPolicy {
    // == Constructor ==
    pub fn new(ttl_secs: u64, watermark: Option<SystemTime>) -> Self {
        Self {
            ttl_secs,
            watermark,
        }
    }

    // == Is Expired ==
    /// Checks whether an entry modified at `mtime` is stale at `now`.
    ///
    /// - `None` mtime (file vanished) is never expired; the caller's next
    ///   read misses on its own.
    /// - With a TTL, the entry expires once `now >= mtime + ttl`. The deadline
    ///   itself counts as expired, so an entry is served for at most `ttl`
    ///   seconds; a strict `mtime + ttl < now` test would serve it one
    ///   instant longer.
    /// - With a watermark, the entry expires if `mtime < watermark`,
    ///   whatever the TTL.
    pub fn is_expired(&self, mtime: Option<SystemTime>, now: SystemTime) -> bool {
        let Some(mtime) = mtime else {
            return false;
        };

        if self.ttl_secs > 0 {
            if let Some(deadline) = mtime.checked_add(Duration::from_secs(self.ttl_secs)) {
                if now >= deadline {
                    return true;
                }
            }
        }

        matches!(self.watermark, Some(watermark) if mtime < watermark)
    }
}

// == Watermark ==
/// Reads the watermark file's modification time.
///
/// Returns `None` when the file is absent, unreadable or stamped at the
/// Unix epoch.
pub fn load_watermark(path: &Path) -> Option<SystemTime> {
    if !path.is_file() {
        return None;
    }
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .filter(|mtime| *mtime > UNIX_EPOCH)
}

/// Writes the watermark file with a human-readable note and stamps its
/// modification time to `now`.
///
/// The content is informational only; nothing ever parses it back.
pub fn write_watermark(path: &Path, now: SystemTime) -> std::io::Result<()> {
    let stamp: DateTime<Local> = now.into();
    let note = format!(
        "The modification time of this file represents the time of the last usable cache file. \
         Cache files older than this file are considered expired. {}",
        stamp.format("%m/%d/%y %H:%M:%S")
    );

    let mut file = File::create(path)?;
    file.write_all(note.as_bytes())?;
    file.set_modified(now)?;

    info!("Watermark written at {}", path.display());
    Ok(())
}

/// Returns the modification time of `path`, or `None` if it cannot be read.
pub fn modified_time(path: &Path) -> Option<SystemTime> {
    match fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(mtime) => Some(mtime),
        Err(e) => {
            debug!("No mtime for {}: {}", path.display(), e);
            None
        }
    }
}
