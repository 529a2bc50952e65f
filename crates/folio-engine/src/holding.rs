//! Portfolio holding records.

use crate::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum holding period, in years, used for annualization.
///
/// Very short holds would otherwise blow up the `1 / hold_time` exponent.
pub const HOLD_TIME_FLOOR: f64 = 0.25;

/// One purchase lot of a security.
///
/// Field renames pin the external column names of the holdings table; the
/// same names are required at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Investment account this lot belongs to.
    #[serde(rename = "Folio")]
    pub folio: String,

    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,

    /// Sector classification from the input table, if present.
    #[serde(rename = "Sector")]
    pub sector: Option<String>,

    /// Industry classification from the input table, if present.
    #[serde(rename = "Industry")]
    pub industry: Option<String>,

    /// Number of units held (may be fractional).
    #[serde(rename = "Quantity")]
    pub quantity: f64,

    /// Purchase price per unit.
    #[serde(rename = "Purchase Price")]
    pub purchase_price: f64,

    /// Years this lot has been held, as a decimal.
    #[serde(rename = "Hold Time")]
    pub hold_time: f64,
}

impl Holding {
    /// Amount originally invested in this lot.
    ///
    /// Always computable from the input table alone, independent of quote
    /// availability.
    pub fn investment(&self) -> f64 {
        self.quantity * self.purchase_price
    }

    /// Holding period with the annualization floor applied.
    pub fn floored_hold_time(&self) -> f64 {
        self.hold_time.max(HOLD_TIME_FLOOR)
    }

    /// Check the input invariants.
    ///
    /// Quantity and purchase price must be finite and non-negative, and the
    /// holding period must be a finite, non-negative number of years.
    pub fn validate(&self) -> Result<()> {
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(self.invalid("quantity must be a non-negative number"));
        }
        if !self.purchase_price.is_finite() || self.purchase_price < 0.0 {
            return Err(self.invalid("purchase price must be a non-negative number"));
        }
        if !self.hold_time.is_finite() || self.hold_time < 0.0 {
            return Err(self.invalid("hold time must be a non-negative number of years"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> MetricsError {
        MetricsError::InvalidHolding {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        }
    }
}

/// Deduplicated set of symbols across a holdings table.
///
/// This is the input to the quote enrichment adapter; the sorted order makes
/// it usable as a cache fingerprint.
pub fn unique_symbols(holdings: &[Holding]) -> BTreeSet<String> {
    holdings.iter().map(|h| h.symbol.clone()).collect()
}
