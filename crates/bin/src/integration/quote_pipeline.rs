//! Quote retrieval orchestration with caching and progress reporting.
//!
//! Serves a run's quote mapping from the snapshot cache when a fresh
//! snapshot exists for the same symbol set, otherwise fans out to Yahoo
//! Finance and stores the result.

use super::cache_manager;
use chrono::Duration;
use folio_data::cache::snapshot_fingerprint;
use folio_data::source::{DEFAULT_CONCURRENCY, FetchConfig, fetch_quote_map};
use folio_data::yahoo::YahooQuoteProvider;
use folio_engine::QuoteMap;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::time::Duration as StdDuration;
use tracing::debug;

/// Configuration for quote retrieval.
#[derive(Debug, Clone)]
pub(crate) struct QuoteOptions {
    /// Whether to use the snapshot cache.
    pub use_cache: bool,
    /// Whether to force refresh (ignore a fresh snapshot).
    pub force_refresh: bool,
    /// Maximum snapshot age before a refetch.
    pub max_age: Duration,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            force_refresh: false,
            max_age: Duration::hours(24),
        }
    }
}

/// Fetch quotes for a symbol set, consulting the snapshot cache first.
pub(crate) async fn fetch_quotes(symbols: &BTreeSet<String>, options: &QuoteOptions) -> QuoteMap {
    let fingerprint = snapshot_fingerprint(symbols);

    let cache = if options.use_cache {
        cache_manager::open_cache().ok()
    } else {
        None
    };

    if let Some(cache) = &cache
        && !options.force_refresh
        && cache.is_fresh(&fingerprint, options.max_age).unwrap_or(false)
        && let Ok(Some(snapshot)) = cache.get_snapshot(&fingerprint)
    {
        debug!(symbols = symbols.len(), "serving quotes from snapshot cache");
        return snapshot;
    }

    let provider = YahooQuoteProvider::new();
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("valid progress template"),
    );
    progress.set_message(format!(
        "Fetching {} symbols ({} concurrent)...",
        symbols.len(),
        DEFAULT_CONCURRENCY
    ));
    progress.enable_steady_tick(StdDuration::from_millis(100));

    let quotes = fetch_quote_map(&provider, symbols, &FetchConfig::default()).await;
    progress.finish_and_clear();

    if quotes.len() < symbols.len() {
        eprintln!(
            "Warning: no quote data for {} of {} symbols",
            symbols.len() - quotes.len(),
            symbols.len()
        );
    }

    if let Some(cache) = &cache
        && !quotes.is_empty()
        && let Err(e) = cache.put_snapshot(&fingerprint, &quotes)
    {
        eprintln!("Warning: failed to cache quote snapshot: {}", e);
    }

    quotes
}
