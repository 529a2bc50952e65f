//! Error types for metrics computation.

use thiserror::Error;

/// Result type for metrics computation.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors that can occur while computing portfolio metrics.
///
/// Quote-side problems are deliberately not represented here: a missing or
/// partial quote degrades to missing derived values, never to an error.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// A holding violates an input invariant.
    #[error("invalid holding {symbol}: {reason}")]
    InvalidHolding {
        /// Symbol of the offending holding.
        symbol: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// A grouping key name could not be parsed.
    #[error("unknown grouping key: {0}")]
    UnknownGroupKey(String),
}
