//! Snapshot quote fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::source::QuoteSource;
use crate::yahoo::profile::ProfileClient;
use folio_engine::Quote;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
///
/// A snapshot combines the last two daily bars (current price and previous
/// close) with the company profile (sector, industry, analyst target). The
/// profile half is best-effort: its failure degrades the quote to prices
/// only instead of failing the symbol.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    profile: ProfileClient,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a new Yahoo Finance quote provider with default rate limiting (1 req/sec).
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a new Yahoo Finance quote provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Self {
        Self {
            provider: yahoo::YahooConnector::new().expect("Failed to create Yahoo connector"),
            profile: ProfileClient::new(),
            rate_limit_delay,
        }
    }

    /// Fetch the snapshot quote for a single symbol.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<Quote> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        // A few days of daily bars cover the current price and the previous
        // close even across weekends and holidays.
        let response = self.provider.get_quote_range(symbol, "1d", "5d").await?;
        let bars = response
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        if bars.is_empty() {
            return Err(DataError::QuoteLookup {
                symbol: symbol.to_string(),
                reason: "no recent price bars returned".to_string(),
            });
        }

        let current_price = bars.last().map(|bar| bar.close);
        let previous_close = if bars.len() >= 2 {
            Some(bars[bars.len() - 2].close)
        } else {
            None
        };

        let profile = match self.profile.fetch(symbol).await {
            Ok(profile) => profile,
            Err(e) => {
                debug!(%symbol, error = %e, "profile lookup failed; quote degrades to prices only");
                Default::default()
            }
        };

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(Quote {
            current_price,
            previous_close,
            analyst_target: profile.analyst_target,
            sector: profile.sector,
            industry: profile.industry,
        })
    }
}

impl QuoteSource for YahooQuoteProvider {
    fn fetch(&self, symbol: &str) -> impl Future<Output = Result<Quote>> + Send {
        self.fetch_snapshot(symbol)
    }
}

impl Default for YahooQuoteProvider {
    fn default() -> Self {
        Self::new()
    }
}
