//! Store Options Module
//!
//! Permission modes and the per-directory file ceiling.

use std::io;
use std::path::Path;

/// Default mode applied to entry files.
pub const DEFAULT_FILE_MODE: u32 = 0o666;

/// Default mode applied to directories the store creates.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// Default maximum number of cache files per category directory.
pub const DEFAULT_MAX_FILES: usize = 999;

// == Store Options ==
/// Tunables shared by every operation of a `CacheStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Mode applied to entry files after each write, `None` = leave as created
    pub file_mode: Option<u32>,
    /// Mode applied to directories after creation, `None` = leave as created
    pub dir_mode: Option<u32>,
    /// Writes of new entries are refused once this many cache files exist
    pub max_files: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            file_mode: Some(DEFAULT_FILE_MODE),
            dir_mode: Some(DEFAULT_DIR_MODE),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Parses an octal mode string such as `"0666"` or `"755"`.
pub fn parse_mode(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    u32::from_str_radix(digits, 8).ok().filter(|mode| *mode <= 0o7777)
}

// == Apply Mode ==
/// Applies `mode` to `path`. A no-op off Unix.
#[cfg(unix)]
pub fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
