//! Caching layer for quote snapshots.

pub mod sqlite;

pub use sqlite::{CacheStats, SnapshotCache, snapshot_fingerprint};
