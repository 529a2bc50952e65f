//! Demonstrates the metrics pipeline on a hand-built portfolio.
//!
//! Run with: cargo run --example metrics_demo -p folio-engine

use folio_engine::{GroupKey, Holding, Quote, QuoteMap, compute};

fn main() {
    let holdings = vec![
        Holding {
            folio: "Core".to_string(),
            symbol: "AAPL".to_string(),
            sector: None,
            industry: None,
            quantity: 10.0,
            purchase_price: 100.0,
            hold_time: 0.5,
        },
        Holding {
            folio: "Growth".to_string(),
            symbol: "NVDA".to_string(),
            sector: None,
            industry: None,
            quantity: 2.0,
            purchase_price: 500.0,
            hold_time: 1.5,
        },
    ];

    let mut quotes = QuoteMap::new();
    quotes.insert(
        "AAPL".to_string(),
        Quote {
            current_price: Some(120.0),
            previous_close: Some(115.0),
            analyst_target: Some(130.0),
            sector: Some("Technology".to_string()),
            industry: Some("Consumer Electronics".to_string()),
        },
    );
    quotes.insert(
        "NVDA".to_string(),
        Quote {
            current_price: Some(450.0),
            previous_close: Some(460.0),
            analyst_target: Some(600.0),
            sector: Some("Technology".to_string()),
            industry: Some("Semiconductors".to_string()),
        },
    );

    let report = compute(&holdings, &quotes, GroupKey::Folio).expect("valid holdings");

    println!(
        "{} holdings across {} groups, total investment ${:.0}",
        report.totals.holdings, report.totals.groups, report.totals.investment
    );
    for group in &report.groups {
        println!(
            "{:<10} investment ${:<8.0} net value ${:<8.0} CAGR {}",
            group.key,
            group.investment,
            group.net_present_value,
            group
                .net_cagr
                .map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v)),
        );
    }
}
