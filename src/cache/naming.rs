//! Naming Module
//!
//! Pure functions mapping category and variant identifiers to cache file paths.

use std::path::{Path, PathBuf};

// == Constants ==
/// Suffix carried by every cache entry file.
pub const CACHE_FILE_EXTENSION: &str = ".cache";

/// Name of the per-root watermark file whose mtime marks global expiration.
pub const WATERMARK_FILENAME: &str = "lastgood";

/// Entry name used when the category id is empty and no variant is set.
pub const PRIMARY_FALLBACK_ID: &str = "primaryID";

/// Suffix of the sibling file an entry is written to before being renamed.
pub const TEMP_FILE_EXTENSION: &str = ".tmp";

// == Sanitize Identifier ==
/// Replaces every character outside `[A-Za-z0-9_+-]` with `_`.
///
/// The output never contains a path separator or `.`, so it can always be
/// joined to a directory without escaping it.
pub fn sanitize_identifier(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '+' | '-' => c,
            _ => '_',
        })
        .collect()
}

// == Entry File Name ==
/// Builds the file name for an entry, e.g. `page-42.cache`.
pub fn entry_file_name(id: &str) -> String {
    format!("{}{}", id, CACHE_FILE_EXTENSION)
}

// == Entry Path ==
/// Derives the path of an entry inside `category_dir`.
///
/// Deterministic: external code can predict the path without holding the
/// `CacheStore` that wrote it. `id` must already be sanitized.
pub fn entry_path(category_dir: &Path, id: &str) -> PathBuf {
    category_dir.join(entry_file_name(id))
}

// == Is Cache File ==
/// Returns true if `path` names a cache entry: its file name carries the
/// `.cache` suffix. Does not touch the filesystem.
pub fn has_cache_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(CACHE_FILE_EXTENSION))
        .unwrap_or(false)
}

/// Returns true if `path` is an existing regular file with the `.cache` suffix.
pub fn is_cache_file(path: &Path) -> bool {
    has_cache_suffix(path) && path.is_file()
}

// == Temp Files ==
/// Builds the name of the temp file an entry is staged in, e.g.
/// `.page-42.cache.1234-0.tmp`. `tag` distinguishes concurrent writers.
pub fn temp_file_name(entry_file_name: &str, tag: &str) -> String {
    format!(".{}.{}{}", entry_file_name, tag, TEMP_FILE_EXTENSION)
}

/// Returns true if `path` names a staging file left by an entry write:
/// hidden, ending in `.tmp`, and wrapping a `.cache` entry name.
pub fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix('.'))
        .and_then(|name| name.strip_suffix(TEMP_FILE_EXTENSION))
        .and_then(|name| name.rsplit_once('.'))
        .map(|(entry, _tag)| entry.ends_with(CACHE_FILE_EXTENSION))
        .unwrap_or(false)
}

/// Returns true if `path` names the watermark file.
pub fn is_watermark_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name == WATERMARK_FILENAME)
        .unwrap_or(false)
}
