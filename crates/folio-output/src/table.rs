//! ASCII and Markdown rendering of the output tables.

use folio_engine::{EnrichedHolding, GroupRow};

/// Render the group summary as an aligned ASCII table.
///
/// `key_label` names the first column after the grouping dimension
/// (e.g. "Sector").
pub fn render_group_table(rows: &[GroupRow], key_label: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<24} {:>12} {:>14} {:>14} {:>12} {:>12} {:>10} {:>9}\n",
        key_label,
        "Investment",
        "Net Value",
        "Net Gain/Loss",
        "Expect Gain",
        "Daily Chg",
        "Avg Hold",
        "CAGR %"
    ));
    output.push_str(&"-".repeat(112));
    output.push('\n');

    for row in rows {
        output.push_str(&format!(
            "{:<24} {:>12.0} {:>14.0} {:>14.0} {:>12.0} {:>12.0} {:>10} {:>9}\n",
            truncate(&row.key, 24),
            row.investment,
            row.net_present_value,
            row.net_gain_loss,
            row.expect_gain,
            row.daily_change,
            fmt_opt(row.avg_hold_time, 2),
            fmt_opt(row.net_cagr, 1),
        ));
    }

    output
}

/// Render the group summary as a Markdown table.
pub fn render_group_table_markdown(rows: &[GroupRow], key_label: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "| {} | Investment | Net Value | Net Gain/Loss | Expect Gain | Daily Chg | Avg Hold | CAGR % |\n",
        key_label
    ));
    output.push_str("|---|---|---|---|---|---|---|---|\n");

    for row in rows {
        output.push_str(&format!(
            "| {} | {:.0} | {:.0} | {:.0} | {:.0} | {:.0} | {} | {} |\n",
            row.key,
            row.investment,
            row.net_present_value,
            row.net_gain_loss,
            row.expect_gain,
            row.daily_change,
            fmt_opt(row.avg_hold_time, 2),
            fmt_opt(row.net_cagr, 1),
        ));
    }

    output
}

/// Render the enriched holdings as an aligned ASCII table.
pub fn render_holdings_table(rows: &[EnrichedHolding]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<10} {:<8} {:<20} {:>8} {:>10} {:>8} {:>12} {:>13} {:>13} {:>9}\n",
        "Folio",
        "Symbol",
        "Sector",
        "Qty",
        "Buy Price",
        "Held",
        "Investment",
        "Present Value",
        "Net Gain/Loss",
        "CAGR %"
    ));
    output.push_str(&"-".repeat(120));
    output.push('\n');

    for row in rows {
        output.push_str(&format!(
            "{:<10} {:<8} {:<20} {:>8.2} {:>10.2} {:>8.2} {:>12.0} {:>13} {:>13} {:>9}\n",
            truncate(&row.folio, 10),
            truncate(&row.symbol, 8),
            truncate(row.sector.as_deref().unwrap_or("-"), 20),
            row.quantity,
            row.purchase_price,
            row.hold_time,
            row.investment,
            fmt_opt(row.present_value, 0),
            fmt_opt(row.net_gain_loss, 0),
            fmt_opt(row.net_cagr, 1),
        ));
    }

    output
}

/// Format an optional value, showing missing data as "n/a".
fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", decimals, v))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
