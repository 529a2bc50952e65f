//! Portfolio summary cards.
//!
//! The four headline figures of a run (group count, total investment,
//! total present value with its daily delta, total net gain/loss) in the
//! formats the CLI and reports need.

use folio_engine::{AnalysisReport, FolioSelection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline metrics of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    /// Which folios the run covered.
    pub selection: String,

    /// Grouping dimension of the summary table.
    pub group_key: String,

    /// Number of holdings analyzed.
    pub holdings: usize,

    /// Number of groups in the summary table.
    pub groups: usize,

    /// Total amount invested.
    pub total_investment: f64,

    /// Total tax-adjusted present value.
    pub total_net_present_value: f64,

    /// Total change since the previous session close.
    pub total_daily_change: f64,

    /// Total tax-adjusted gain/loss.
    pub total_net_gain_loss: f64,
}

impl PortfolioSummary {
    /// Build the summary cards from an engine report.
    pub fn from_report(report: &AnalysisReport, selection: &FolioSelection) -> Self {
        Self {
            selection: selection.to_string(),
            group_key: report.group_key.to_string(),
            holdings: report.totals.holdings,
            groups: report.totals.groups,
            total_investment: report.totals.investment,
            total_net_present_value: report.totals.net_present_value,
            total_daily_change: report.totals.daily_change,
            total_net_gain_loss: report.totals.net_gain_loss,
        }
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nPortfolio Summary: {}\n", self.selection));
        output.push_str(&format!("Grouped by: {}\n", self.group_key));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  Holdings:             {:>10}\n",
            self.holdings
        ));
        output.push_str(&format!(
            "  Groups:               {:>10}\n",
            self.groups
        ));
        output.push_str(&format!(
            "  Total Investment:     {:>10}\n",
            format_money(self.total_investment)
        ));
        output.push_str(&format!(
            "  Total Present Value:  {:>10} ({} today)\n",
            format_money(self.total_net_present_value),
            format_signed_money(self.total_daily_change)
        ));
        output.push_str(&format!(
            "  Net Gain/Loss:        {:>10}\n",
            format_signed_money(self.total_net_gain_loss)
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        output
    }

    /// Format as Markdown for documentation.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Portfolio Summary: {}\n\n", self.selection));
        output.push_str(&format!("**Grouped by:** {}\n\n", self.group_key));
        output.push_str(&format!("- **Holdings:** {}\n", self.holdings));
        output.push_str(&format!("- **Groups:** {}\n", self.groups));
        output.push_str(&format!(
            "- **Total Investment:** {}\n",
            format_money(self.total_investment)
        ));
        output.push_str(&format!(
            "- **Total Present Value:** {} ({} today)\n",
            format_money(self.total_net_present_value),
            format_signed_money(self.total_daily_change)
        ));
        output.push_str(&format!(
            "- **Net Gain/Loss:** {}\n",
            format_signed_money(self.total_net_gain_loss)
        ));

        output
    }
}

impl fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Portfolio Summary: {} (grouped by {})",
            self.selection, self.group_key
        )?;
        writeln!(f, "  Holdings: {}", self.holdings)?;
        writeln!(f, "  Groups: {}", self.groups)?;
        writeln!(f, "  Total Investment: {}", format_money(self.total_investment))?;
        writeln!(
            f,
            "  Total Present Value: {}",
            format_money(self.total_net_present_value)
        )?;
        writeln!(
            f,
            "  Net Gain/Loss: {}",
            format_signed_money(self.total_net_gain_loss)
        )?;
        Ok(())
    }
}

/// Format a currency amount rounded to whole units.
pub(crate) fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.0}", -value)
    } else {
        format!("${:.0}", value)
    }
}

/// Format a currency amount with an explicit sign.
pub(crate) fn format_signed_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.0}", -value)
    } else {
        format!("+${:.0}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::{GroupKey, Holding, Quote, QuoteMap, compute};

    fn sample_report() -> AnalysisReport {
        let holdings = vec![Holding {
            folio: "Core".to_string(),
            symbol: "AAPL".to_string(),
            sector: None,
            industry: None,
            quantity: 10.0,
            purchase_price: 100.0,
            hold_time: 0.5,
        }];
        let mut quotes = QuoteMap::new();
        quotes.insert(
            "AAPL".to_string(),
            Quote {
                current_price: Some(120.0),
                previous_close: Some(115.0),
                analyst_target: Some(130.0),
                sector: None,
                industry: None,
            },
        );
        compute(&holdings, &quotes, GroupKey::Folio).unwrap()
    }

    #[test]
    fn test_from_report() {
        let summary = PortfolioSummary::from_report(&sample_report(), &FolioSelection::All);

        assert_eq!(summary.selection, "All folios");
        assert_eq!(summary.group_key, "Folio");
        assert_eq!(summary.holdings, 1);
        assert_eq!(summary.groups, 1);
        assert_eq!(summary.total_investment, 1000.0);
        assert_eq!(summary.total_net_present_value, 1150.0);
        assert_eq!(summary.total_daily_change, 50.0);
        assert_eq!(summary.total_net_gain_loss, 150.0);
    }

    #[test]
    fn test_ascii_table_contains_cards() {
        let summary = PortfolioSummary::from_report(&sample_report(), &FolioSelection::All);
        let table = summary.to_ascii_table();

        assert!(table.contains("All folios"));
        assert!(table.contains("Total Investment"));
        assert!(table.contains("$1000"));
        assert!(table.contains("+$50 today"));
    }

    #[test]
    fn test_markdown_contains_cards() {
        let summary = PortfolioSummary::from_report(&sample_report(), &FolioSelection::All);
        let md = summary.to_markdown();

        assert!(md.contains("# Portfolio Summary"));
        assert!(md.contains("**Total Investment:** $1000"));
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(format_money(1234.4), "$1234");
        assert_eq!(format_money(-25.0), "-$25");
        assert_eq!(format_signed_money(25.0), "+$25");
        assert_eq!(format_signed_money(-25.0), "-$25");
    }
}
