//! Cache manager for quote snapshots.
//!
//! Handles the SQLite snapshot cache with a platform-specific default
//! location.

use folio_data::cache::SnapshotCache;
use folio_data::error::DataError;
use std::path::PathBuf;

/// Get the default cache directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/folio/`
/// - macOS: `~/Library/Caches/folio/`
/// - Windows: `%LOCALAPPDATA%\folio\cache\`
pub(crate) fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
}

/// Get the default cache database path.
pub(crate) fn cache_path() -> PathBuf {
    default_cache_dir().join("folio.db")
}

/// Open the cache, creating the directory if needed.
pub(crate) fn open_cache() -> Result<SnapshotCache, DataError> {
    let path = cache_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    SnapshotCache::new(&path)
}
