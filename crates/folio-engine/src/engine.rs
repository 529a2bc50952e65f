//! The portfolio metrics engine.
//!
//! One run is a pure batch transform: holdings plus a quote mapping in, an
//! enriched per-holding table plus a grouped summary out. Nothing is cached
//! or mutated across runs; callers wanting memoization key it on the input
//! content externally.

use crate::enrich::EnrichedHolding;
use crate::error::Result;
use crate::group::{GroupKey, GroupRow, summarize};
use crate::holding::Holding;
use crate::quote::QuoteMap;
use serde::{Deserialize, Serialize};

/// Portfolio-wide totals across every enriched holding of a run.
///
/// These back the summary cards of the presentation layer; missing derived
/// values contribute zero, matching the group-sum convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Number of holdings in the run.
    pub holdings: usize,

    /// Number of groups produced by the chosen grouping key.
    pub groups: usize,

    /// Total amount invested.
    pub investment: f64,

    /// Total tax-adjusted present value.
    pub net_present_value: f64,

    /// Total change since the previous session close.
    pub daily_change: f64,

    /// Total tax-adjusted gain/loss.
    pub net_gain_loss: f64,
}

impl PortfolioTotals {
    fn from_rows(rows: &[EnrichedHolding], groups: usize) -> Self {
        let mut totals = Self {
            holdings: rows.len(),
            groups,
            investment: 0.0,
            net_present_value: 0.0,
            daily_change: 0.0,
            net_gain_loss: 0.0,
        };
        for row in rows {
            totals.investment += row.investment;
            totals.net_present_value += row.net_present_value.unwrap_or(0.0);
            totals.daily_change += row.daily_change.unwrap_or(0.0);
            totals.net_gain_loss += row.net_gain_loss.unwrap_or(0.0);
        }
        totals
    }
}

/// The full output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Grouping dimension the summary was computed along.
    pub group_key: GroupKey,

    /// The enriched per-holding table, in input order.
    pub enriched: Vec<EnrichedHolding>,

    /// The grouped summary, sorted descending by investment.
    pub groups: Vec<GroupRow>,

    /// Portfolio-wide totals.
    pub totals: PortfolioTotals,
}

/// Run the metrics pipeline over a holdings table and a quote mapping.
///
/// Holdings are validated first; a violated input invariant aborts the run.
/// After that nothing is fatal: holdings without a quote flow through with
/// missing derived values and still contribute their investment to every
/// aggregate. An empty quote mapping is legal and yields a report in which
/// every quote-dependent column is missing.
pub fn compute(
    holdings: &[Holding],
    quotes: &QuoteMap,
    group_key: GroupKey,
) -> Result<AnalysisReport> {
    for holding in holdings {
        holding.validate()?;
    }

    let enriched: Vec<EnrichedHolding> = holdings
        .iter()
        .map(|holding| EnrichedHolding::from_parts(holding, quotes.get(&holding.symbol)))
        .collect();

    let groups = summarize(&enriched, group_key);
    let totals = PortfolioTotals::from_rows(&enriched, groups.len());

    Ok(AnalysisReport {
        group_key,
        enriched,
        groups,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use crate::quote::Quote;
    use approx::assert_relative_eq;

    fn holding(folio: &str, symbol: &str, quantity: f64, price: f64, hold_time: f64) -> Holding {
        Holding {
            folio: folio.to_string(),
            symbol: symbol.to_string(),
            sector: None,
            industry: None,
            quantity,
            purchase_price: price,
            hold_time,
        }
    }

    #[test]
    fn test_compute_empty_quote_map() {
        let holdings = vec![
            holding("Core", "AAPL", 10.0, 100.0, 0.5),
            holding("Core", "MSFT", 5.0, 200.0, 2.0),
        ];

        let report = compute(&holdings, &QuoteMap::new(), GroupKey::Folio).unwrap();

        assert_eq!(report.enriched.len(), 2);
        assert!(report.enriched.iter().all(|r| r.present_value.is_none()));
        assert_relative_eq!(report.totals.investment, 2000.0);
        assert_relative_eq!(report.totals.net_gain_loss, 0.0);
        assert_eq!(report.groups.len(), 1);
        assert_relative_eq!(report.groups[0].investment, 2000.0);
    }

    #[test]
    fn test_compute_rejects_invalid_holding() {
        let holdings = vec![holding("Core", "AAPL", -10.0, 100.0, 0.5)];
        let result = compute(&holdings, &QuoteMap::new(), GroupKey::Folio);
        assert!(matches!(result, Err(MetricsError::InvalidHolding { .. })));
    }

    #[test]
    fn test_compute_totals_match_enriched_rows() {
        let mut quotes = QuoteMap::new();
        quotes.insert("AAPL".to_string(), Quote::with_prices(120.0, 115.0));

        let holdings = vec![
            holding("Core", "AAPL", 10.0, 100.0, 0.5),
            holding("Growth", "GONE", 5.0, 200.0, 1.0),
        ];

        let report = compute(&holdings, &quotes, GroupKey::Folio).unwrap();

        assert_eq!(report.totals.holdings, 2);
        assert_eq!(report.totals.groups, 2);
        assert_relative_eq!(report.totals.investment, 2000.0);
        assert_relative_eq!(report.totals.net_present_value, 1150.0);
        assert_relative_eq!(report.totals.daily_change, 50.0);
        assert_relative_eq!(report.totals.net_gain_loss, 150.0);
    }
}
