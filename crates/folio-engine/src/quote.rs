//! Market quote records supplied by an external source.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from ticker symbol to its latest quote snapshot.
///
/// The map may cover only a subset of the symbols a caller asked for; the
/// engine treats an absent entry as a holding with no market data.
pub type QuoteMap = HashMap<String, Quote>;

/// Snapshot quote attributes for a single symbol.
///
/// Every field is optional: a lookup that partially fails still yields a
/// usable quote, and absent values propagate as missing derived metrics
/// rather than aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Latest traded price.
    pub current_price: Option<f64>,

    /// Previous session close.
    pub previous_close: Option<f64>,

    /// Mean analyst price target.
    pub analyst_target: Option<f64>,

    /// Sector classification.
    pub sector: Option<String>,

    /// Industry classification.
    pub industry: Option<String>,
}

impl Quote {
    /// A quote carrying prices only, without classification data.
    pub const fn with_prices(current_price: f64, previous_close: f64) -> Self {
        Self {
            current_price: Some(current_price),
            previous_close: Some(previous_close),
            analyst_target: None,
            sector: None,
            industry: None,
        }
    }
}
