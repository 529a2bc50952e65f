//! Grouping keys and summary aggregation.

use crate::enrich::{EnrichedHolding, annualized_net_return, round_to};
use crate::error::MetricsError;
use crate::holding::Holding;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Bucket label for holdings with no classification under the chosen key.
///
/// Keeping such holdings in a named bucket (rather than dropping them) is
/// what keeps group totals equal to the portfolio totals.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Dimension along which enriched holdings are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKey {
    /// Group by investment account.
    Folio,
    /// Group by ticker symbol.
    Symbol,
    /// Group by (floored) holding period.
    HoldTime,
    /// Group by sector classification.
    Sector,
    /// Group by industry classification.
    Industry,
}

impl GroupKey {
    /// Display name of the grouping dimension.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Folio => "Folio",
            Self::Symbol => "Symbol",
            Self::HoldTime => "Hold Time",
            Self::Sector => "Sector",
            Self::Industry => "Industry",
        }
    }

    /// The grouping dimensions available for a folio selection.
    ///
    /// The all-folio view groups across accounts; a single-folio view swaps
    /// the account dimension for the symbol dimension.
    pub const fn choices(selection: &FolioSelection) -> [Self; 4] {
        match selection {
            FolioSelection::All => [Self::Folio, Self::HoldTime, Self::Sector, Self::Industry],
            FolioSelection::Folio(_) => {
                [Self::Symbol, Self::HoldTime, Self::Sector, Self::Industry]
            }
        }
    }

    /// The partition key value for one enriched holding.
    fn value_of(&self, row: &EnrichedHolding) -> String {
        match self {
            Self::Folio => row.folio.clone(),
            Self::Symbol => row.symbol.clone(),
            Self::HoldTime => format_years(row.hold_time),
            Self::Sector => row
                .sector
                .clone()
                .unwrap_or_else(|| UNCLASSIFIED.to_string()),
            Self::Industry => row
                .industry
                .clone()
                .unwrap_or_else(|| UNCLASSIFIED.to_string()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GroupKey {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folio" => Ok(Self::Folio),
            "symbol" => Ok(Self::Symbol),
            "hold-time" | "hold_time" | "holdtime" => Ok(Self::HoldTime),
            "sector" => Ok(Self::Sector),
            "industry" => Ok(Self::Industry),
            other => Err(MetricsError::UnknownGroupKey(other.to_string())),
        }
    }
}

/// Which folios a run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolioSelection {
    /// Every folio in the input table.
    All,
    /// A single named folio.
    Folio(String),
}

impl FolioSelection {
    /// Whether a holding from the given folio is part of this selection.
    pub fn matches(&self, folio: &str) -> bool {
        match self {
            Self::All => true,
            Self::Folio(name) => name == folio,
        }
    }
}

impl fmt::Display for FolioSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All folios"),
            Self::Folio(name) => write!(f, "Folio {}", name),
        }
    }
}

/// Restrict a holdings table to the selected folio(s).
pub fn filter_folio(holdings: &[Holding], selection: &FolioSelection) -> Vec<Holding> {
    holdings
        .iter()
        .filter(|h| selection.matches(&h.folio))
        .cloned()
        .collect()
}

/// Aggregated metrics for one distinct value of the grouping key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// The grouping key value this row aggregates.
    #[serde(rename = "Group")]
    pub key: String,

    /// Sum of member investments, rounded to whole currency units.
    #[serde(rename = "Investment")]
    pub investment: f64,

    /// Sum of member net present values, rounded to whole currency units.
    #[serde(rename = "Net_Present_Value")]
    pub net_present_value: f64,

    /// Sum of member net gains/losses, rounded to whole currency units.
    #[serde(rename = "Net_Gain_Loss")]
    pub net_gain_loss: f64,

    /// Sum of member expected gains, rounded to whole currency units.
    #[serde(rename = "Expect_Gain")]
    pub expect_gain: f64,

    /// Sum of member daily changes, rounded to whole currency units.
    #[serde(rename = "Daily_Change")]
    pub daily_change: f64,

    /// Investment-weighted average holding period, rounded to two decimals.
    ///
    /// Undefined when the group's total investment is zero.
    #[serde(rename = "Avg_Hold_Time")]
    pub avg_hold_time: Option<f64>,

    /// Annualized net growth rate recomputed on the group totals.
    #[serde(rename = "Net_CAGR")]
    pub net_cagr: Option<f64>,
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    investment: f64,
    net_present_value: f64,
    net_gain_loss: f64,
    expect_gain: f64,
    daily_change: f64,
    // Sum of hold_time * investment, for the weighted average.
    weighted_hold_time: f64,
}

impl GroupAccumulator {
    fn add(&mut self, row: &EnrichedHolding) {
        // Missing derived values contribute zero to the sums; the row-level
        // field itself stays missing in the enriched table.
        self.investment += row.investment;
        self.net_present_value += row.net_present_value.unwrap_or(0.0);
        self.net_gain_loss += row.net_gain_loss.unwrap_or(0.0);
        self.expect_gain += row.expect_gain.unwrap_or(0.0);
        self.daily_change += row.daily_change.unwrap_or(0.0);
        self.weighted_hold_time += row.hold_time * row.investment;
    }
}

/// Partition enriched holdings by a grouping key and aggregate each group.
///
/// Rows come back sorted descending by investment; groups tying on
/// investment keep their first-encounter order.
pub fn summarize(rows: &[EnrichedHolding], key: GroupKey) -> Vec<GroupRow> {
    let mut order: Vec<String> = Vec::new();
    let mut partitions: HashMap<String, GroupAccumulator> = HashMap::new();

    for row in rows {
        let value = key.value_of(row);
        if !partitions.contains_key(&value) {
            order.push(value.clone());
        }
        partitions.entry(value).or_default().add(row);
    }

    let mut summary: Vec<GroupRow> = order
        .into_iter()
        .map(|value| {
            let acc = &partitions[&value];
            let avg_hold_time = if acc.investment > 0.0 {
                Some(round_to(acc.weighted_hold_time / acc.investment, 2))
            } else {
                warn!(
                    group = %value,
                    "group has zero total investment; weighted hold time and CAGR are undefined"
                );
                None
            };
            let investment = acc.investment.round();
            let net_present_value = acc.net_present_value.round();
            let net_cagr = avg_hold_time
                .and_then(|avg| annualized_net_return(net_present_value, investment, avg));
            GroupRow {
                key: value,
                investment,
                net_present_value,
                net_gain_loss: acc.net_gain_loss.round(),
                expect_gain: acc.expect_gain.round(),
                daily_change: acc.daily_change.round(),
                avg_hold_time,
                net_cagr,
            }
        })
        .collect();

    // Stable sort keeps first-encounter order on ties.
    summary.sort_by(|a, b| {
        b.investment
            .partial_cmp(&a.investment)
            .unwrap_or(Ordering::Equal)
    });

    summary
}

/// Format a holding period for use as a grouping key value.
fn format_years(years: f64) -> String {
    let text = format!("{:.2}", years);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Quote;
    use approx::assert_relative_eq;
    use rstest::rstest;

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

    fn enriched(h: &Holding, quote: Option<&Quote>) -> EnrichedHolding {
        EnrichedHolding::from_parts(h, quote)
    }

    #[rstest]
    #[case("folio", GroupKey::Folio)]
    #[case("Symbol", GroupKey::Symbol)]
    #[case("hold-time", GroupKey::HoldTime)]
    #[case("hold_time", GroupKey::HoldTime)]
    #[case("SECTOR", GroupKey::Sector)]
    #[case("industry", GroupKey::Industry)]
    fn test_group_key_from_str(#[case] input: &str, #[case] expected: GroupKey) {
        assert_eq!(input.parse::<GroupKey>().unwrap(), expected);
    }

    #[test]
    fn test_group_key_from_str_rejects_unknown() {
        assert!(matches!(
            "rating".parse::<GroupKey>(),
            Err(MetricsError::UnknownGroupKey(_))
        ));
    }

    #[test]
    fn test_choices_depend_on_selection() {
        let all = GroupKey::choices(&FolioSelection::All);
        assert!(all.contains(&GroupKey::Folio));
        assert!(!all.contains(&GroupKey::Symbol));

        let single = GroupKey::choices(&FolioSelection::Folio("Core".to_string()));
        assert!(single.contains(&GroupKey::Symbol));
        assert!(!single.contains(&GroupKey::Folio));
    }

    #[test]
    fn test_filter_folio() {
        let holdings = vec![
            holding("Core", "AAPL", 1.0, 1.0, 1.0),
            holding("Growth", "NVDA", 1.0, 1.0, 1.0),
            holding("Core", "MSFT", 1.0, 1.0, 1.0),
        ];

        let all = filter_folio(&holdings, &FolioSelection::All);
        assert_eq!(all.len(), 3);

        let core = filter_folio(&holdings, &FolioSelection::Folio("Core".to_string()));
        assert_eq!(core.len(), 2);
        assert!(core.iter().all(|h| h.folio == "Core"));
    }

    #[test]
    fn test_summarize_sums_and_weighted_hold_time() {
        let q = Quote::with_prices(120.0, 115.0);
        let rows = vec![
            enriched(&holding("Core", "AAPL", 10.0, 100.0, 0.5), Some(&q)),
            enriched(&holding("Core", "MSFT", 10.0, 300.0, 2.0), Some(&q)),
        ];

        let summary = summarize(&rows, GroupKey::Folio);
        assert_eq!(summary.len(), 1);
        let row = &summary[0];

        assert_relative_eq!(row.investment, 4000.0);
        // AAPL: pv 1200, gl 200, ngl 150, npv 1150, dc 50
        // MSFT: pv 1200, gl -1800, ngl -1530, npv 1470, dc 50
        assert_relative_eq!(row.net_present_value, 2620.0);
        assert_relative_eq!(row.net_gain_loss, -1380.0);
        assert_relative_eq!(row.daily_change, 100.0);
        // (0.5 * 1000 + 2.0 * 3000) / 4000 = 1.625 -> 1.63 rounded
        assert_relative_eq!(row.avg_hold_time.unwrap(), 1.63);
    }

    #[test]
    fn test_summarize_includes_investment_of_unquoted_holdings() {
        let q = Quote::with_prices(120.0, 115.0);
        let rows = vec![
            enriched(&holding("Core", "AAPL", 10.0, 100.0, 0.5), Some(&q)),
            enriched(&holding("Core", "GONE", 5.0, 200.0, 1.0), None),
        ];

        let summary = summarize(&rows, GroupKey::Folio);
        let row = &summary[0];

        // Both investments count; only the quoted holding moves the rest.
        assert_relative_eq!(row.investment, 2000.0);
        assert_relative_eq!(row.net_gain_loss, 150.0);
        assert_relative_eq!(row.daily_change, 50.0);
    }

    #[test]
    fn test_summarize_zero_investment_group_is_reported_missing() {
        let q = Quote::with_prices(10.0, 9.0);
        let rows = vec![enriched(&holding("Core", "FREE", 0.0, 0.0, 1.0), Some(&q))];

        let summary = summarize(&rows, GroupKey::Folio);
        let row = &summary[0];
        assert_eq!(row.investment, 0.0);
        assert!(row.avg_hold_time.is_none());
        assert!(row.net_cagr.is_none());
    }

    #[test]
    fn test_summarize_sorts_descending_by_investment() {
        let q = Quote::with_prices(1.0, 1.0);
        let rows = vec![
            enriched(&holding("Small", "A", 1.0, 100.0, 1.0), Some(&q)),
            enriched(&holding("Big", "B", 1.0, 900.0, 1.0), Some(&q)),
            enriched(&holding("Mid", "C", 1.0, 500.0, 1.0), Some(&q)),
        ];

        let summary = summarize(&rows, GroupKey::Folio);
        let keys: Vec<&str> = summary.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Big", "Mid", "Small"]);
    }

    #[test]
    fn test_summarize_ties_keep_first_encounter_order() {
        let q = Quote::with_prices(1.0, 1.0);
        let rows = vec![
            enriched(&holding("First", "A", 1.0, 100.0, 1.0), Some(&q)),
            enriched(&holding("Second", "B", 1.0, 100.0, 1.0), Some(&q)),
        ];

        let summary = summarize(&rows, GroupKey::Folio);
        let keys: Vec<&str> = summary.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["First", "Second"]);
    }

    #[test]
    fn test_missing_sector_buckets_as_unclassified() {
        let rows = vec![enriched(&holding("Core", "AAPL", 1.0, 100.0, 1.0), None)];

        let summary = summarize(&rows, GroupKey::Sector);
        assert_eq!(summary[0].key, UNCLASSIFIED);
        assert_relative_eq!(summary[0].investment, 100.0);
    }

    #[rstest]
    #[case(0.25, "0.25")]
    #[case(1.5, "1.5")]
    #[case(2.0, "2")]
    #[case(0.1, "0.1")]
    fn test_format_years(#[case] years: f64, #[case] expected: &str) {
        assert_eq!(format_years(years), expected);
    }
}
