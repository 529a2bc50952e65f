//! Quote source abstraction and concurrent batch fetching.

use crate::error::{DataError, Result};
use folio_engine::{Quote, QuoteMap};
use futures::stream::{self, StreamExt};
use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default number of concurrent quote lookups.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Default time box for a single quote lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for batch quote fetching.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Maximum number of lookups in flight at once.
    pub concurrency: usize,
    /// Time box for a single lookup; `None` waits indefinitely.
    pub per_symbol_timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            per_symbol_timeout: Some(DEFAULT_LOOKUP_TIMEOUT),
        }
    }
}

/// A source of snapshot quotes.
///
/// The metrics engine never talks to a source directly; it only consumes
/// the [`QuoteMap`] a source produces, so implementations can be swapped
/// out or mocked freely.
pub trait QuoteSource {
    /// Fetch the quote for a single symbol.
    fn fetch(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send;
}

/// Fetch quotes for a deduplicated symbol set concurrently.
///
/// Lookups are independent: a failure (or timeout) is logged and its symbol
/// omitted from the result, so the returned map may be a strict subset of
/// the input set. An empty map is a legal outcome.
pub async fn fetch_quote_map<S>(
    source: &S,
    symbols: &BTreeSet<String>,
    config: &FetchConfig,
) -> QuoteMap
where
    S: QuoteSource + Sync,
{
    let outcomes: Vec<(String, Result<Quote>)> = stream::iter(symbols.iter().cloned())
        .map(|symbol| async move {
            let lookup = source.fetch(&symbol);
            let outcome = match config.per_symbol_timeout {
                Some(limit) => match tokio::time::timeout(limit, lookup).await {
                    Ok(resolved) => resolved,
                    Err(_) => Err(DataError::Timeout {
                        symbol: symbol.clone(),
                        timeout_ms: limit.as_millis() as u64,
                    }),
                },
                None => lookup.await,
            };
            (symbol, outcome)
        })
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;

    let mut quotes = QuoteMap::new();
    for (symbol, outcome) in outcomes {
        match outcome {
            Ok(quote) => {
                quotes.insert(symbol, quote);
            }
            Err(e) => warn!(%symbol, error = %e, "quote lookup failed; continuing without it"),
        }
    }
    quotes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that fails for a configured set of symbols.
    struct FlakySource {
        failing: Vec<String>,
        delay: Option<Duration>,
    }

    impl QuoteSource for FlakySource {
        fn fetch(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send {
            let fail = self.failing.iter().any(|s| s == symbol);
            let delay = self.delay;
            let symbol = symbol.to_string();
            async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                if fail {
                    Err(DataError::QuoteLookup {
                        symbol,
                        reason: "synthetic failure".to_string(),
                    })
                } else {
                    Ok(Quote::with_prices(100.0, 99.0))
                }
            }
        }
    }

    fn symbols(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_batch() {
        let source = FlakySource {
            failing: vec!["BAD".to_string()],
            delay: None,
        };

        let quotes = fetch_quote_map(
            &source,
            &symbols(&["AAPL", "BAD", "MSFT"]),
            &FetchConfig::default(),
        )
        .await;

        assert_eq!(quotes.len(), 2);
        assert!(quotes.contains_key("AAPL"));
        assert!(quotes.contains_key("MSFT"));
        assert!(!quotes.contains_key("BAD"));
    }

    #[tokio::test]
    async fn test_all_failing_yields_empty_map() {
        let source = FlakySource {
            failing: vec!["A".to_string(), "B".to_string()],
            delay: None,
        };

        let quotes = fetch_quote_map(&source, &symbols(&["A", "B"]), &FetchConfig::default()).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_recovered_per_symbol() {
        let source = FlakySource {
            failing: vec![],
            delay: Some(Duration::from_millis(50)),
        };
        let config = FetchConfig {
            concurrency: 2,
            per_symbol_timeout: Some(Duration::from_millis(5)),
        };

        let quotes = fetch_quote_map(&source, &symbols(&["SLOW"]), &config).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_empty_symbol_set() {
        let source = FlakySource {
            failing: vec![],
            delay: None,
        };
        let quotes = fetch_quote_map(&source, &BTreeSet::new(), &FetchConfig::default()).await;
        assert!(quotes.is_empty());
    }
}
