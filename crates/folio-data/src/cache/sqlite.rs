//! SQLite caching layer for quote snapshots.
//!
//! A snapshot is the full [`QuoteMap`] of one batch fetch, stored under a
//! content fingerprint of the symbol set it covers. The cache is owned by
//! the caller and passed around explicitly; the metrics engine never sees
//! it. Invalidation is explicit, plus an age check for callers that want a
//! freshness policy.

use crate::error::{DataError, Result};
use chrono::{DateTime, Duration, Utc};
use folio_engine::{Quote, QuoteMap};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::Path;

/// Content fingerprint of a symbol set: the sorted symbols joined.
///
/// Kept human-readable on purpose so cache contents stay inspectable.
pub fn snapshot_fingerprint(symbols: &BTreeSet<String>) -> String {
    symbols
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// SQLite cache for quote snapshots.
#[derive(Debug)]
pub struct SnapshotCache {
    conn: Connection,
}

impl SnapshotCache {
    /// Create a new snapshot cache.
    ///
    /// # Arguments
    /// * `path` - Path to the SQLite database file
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.initialize_schema()?;
        Ok(cache)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS quote_snapshots (
                fingerprint TEXT NOT NULL,
                symbol TEXT NOT NULL,
                current_price REAL,
                previous_close REAL,
                analyst_target REAL,
                sector TEXT,
                industry TEXT,
                cached_at TEXT NOT NULL,
                PRIMARY KEY (fingerprint, symbol)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_snapshots_fingerprint
             ON quote_snapshots(fingerprint)",
            [],
        )?;

        Ok(())
    }

    /// Store a quote mapping under a fingerprint, replacing any prior snapshot.
    pub fn put_snapshot(&self, fingerprint: &str, quotes: &QuoteMap) -> Result<()> {
        let cached_at = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM quote_snapshots WHERE fingerprint = ?1",
            params![fingerprint],
        )?;

        for (symbol, quote) in quotes {
            tx.execute(
                "INSERT OR REPLACE INTO quote_snapshots
                 (fingerprint, symbol, current_price, previous_close, analyst_target,
                  sector, industry, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    fingerprint,
                    symbol,
                    quote.current_price,
                    quote.previous_close,
                    quote.analyst_target,
                    quote.sector,
                    quote.industry,
                    cached_at
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Load the snapshot stored under a fingerprint, if any.
    pub fn get_snapshot(&self, fingerprint: &str) -> Result<Option<QuoteMap>> {
        let mut stmt = self.conn.prepare(
            "SELECT symbol, current_price, previous_close, analyst_target, sector, industry
             FROM quote_snapshots
             WHERE fingerprint = ?1",
        )?;

        let rows = stmt.query_map(params![fingerprint], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Quote {
                    current_price: row.get(1)?,
                    previous_close: row.get(2)?,
                    analyst_target: row.get(3)?,
                    sector: row.get(4)?,
                    industry: row.get(5)?,
                },
            ))
        })?;

        let mut quotes = QuoteMap::new();
        for row in rows {
            let (symbol, quote) = row?;
            quotes.insert(symbol, quote);
        }

        if quotes.is_empty() {
            return Ok(None);
        }
        Ok(Some(quotes))
    }

    /// Whether the snapshot under a fingerprint exists and is younger than `max_age`.
    pub fn is_fresh(&self, fingerprint: &str, max_age: Duration) -> Result<bool> {
        let cached_at: Option<String> = self
            .conn
            .query_row(
                "SELECT MAX(cached_at) FROM quote_snapshots WHERE fingerprint = ?1",
                params![fingerprint],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        let Some(cached_at) = cached_at else {
            return Ok(false);
        };

        let cached_at = DateTime::parse_from_rfc3339(&cached_at)
            .map_err(|e| DataError::Cache(format!("bad cached_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Utc::now() - cached_at <= max_age)
    }

    /// Remove the snapshot stored under a fingerprint.
    pub fn invalidate(&self, fingerprint: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM quote_snapshots WHERE fingerprint = ?1",
            params![fingerprint],
        )?;
        Ok(())
    }

    /// Clear all cached snapshots.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM quote_snapshots", [])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn stats(&self) -> Result<CacheStats> {
        let snapshots: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT fingerprint) FROM quote_snapshots",
            [],
            |row| row.get(0),
        )?;

        let quotes: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM quote_snapshots", [], |row| row.get(0))?;

        Ok(CacheStats {
            snapshots: snapshots as usize,
            quotes: quotes as usize,
        })
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of distinct snapshots
    pub snapshots: usize,
    /// Total number of cached quote rows
    pub quotes: usize,
}
