//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
///
/// Only [`DataError::Schema`] is fatal to a run; quote-side failures are
/// recovered per symbol inside the batch fetch.
#[derive(Debug, Error)]
pub enum DataError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance API error: {0}")]
    YahooApi(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Required column missing from the holdings table
    #[error("holdings table is missing required column {column:?}")]
    Schema {
        /// Name of the absent column
        column: String,
    },

    /// Quote lookup failed for a single symbol
    #[error("quote lookup failed for {symbol}: {reason}")]
    QuoteLookup {
        /// Symbol that was queried
        symbol: String,
        /// Reason the lookup failed
        reason: String,
    },

    /// Quote lookup exceeded its time box
    #[error("quote lookup for {symbol} timed out after {timeout_ms}ms")]
    Timeout {
        /// Symbol that was queried
        symbol: String,
        /// The time box, in milliseconds
        timeout_ms: u64,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}
