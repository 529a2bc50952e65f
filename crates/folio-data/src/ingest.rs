//! Holdings table ingestion.
//!
//! The holdings file is the one input whose problems are fatal: a missing
//! column aborts the run before any computation, per the propagation
//! policy. Everything quote-related degrades gracefully later.

use crate::error::{DataError, Result};
use folio_engine::Holding;
use std::io::Read;
use std::path::Path;

/// Column names the holdings table must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Folio",
    "Symbol",
    "Sector",
    "Industry",
    "Quantity",
    "Purchase Price",
    "Hold Time",
];

/// Load holdings from a CSV file, validating the schema first.
pub fn load_holdings<P: AsRef<Path>>(path: P) -> Result<Vec<Holding>> {
    let file = std::fs::File::open(path)?;
    load_holdings_from_reader(file)
}

/// Load holdings from any reader producing CSV with a header row.
pub fn load_holdings_from_reader<R: Read>(reader: R) -> Result<Vec<Holding>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    validate_headers(csv_reader.headers()?)?;

    let mut holdings = Vec::new();
    for record in csv_reader.deserialize() {
        let holding: Holding = record?;
        holdings.push(holding);
    }
    Ok(holdings)
}

fn validate_headers(headers: &csv::StringRecord) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header.trim() == column) {
            return Err(DataError::Schema {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: &str = "\
Folio,Symbol,Sector,Industry,Quantity,Purchase Price,Hold Time
Core,AAPL,Technology,Consumer Electronics,10,100,0.5
Growth,NVDA,,,2.5,500,1.5
";

    #[test]
    fn test_load_holdings() {
        let holdings = load_holdings_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 2);

        let first = &holdings[0];
        assert_eq!(first.folio, "Core");
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.sector.as_deref(), Some("Technology"));
        assert_eq!(first.quantity, 10.0);
        assert_eq!(first.purchase_price, 100.0);
        assert_eq!(first.hold_time, 0.5);

        // Empty classification cells come through as missing, not "".
        let second = &holdings[1];
        assert!(second.sector.is_none());
        assert!(second.industry.is_none());
        assert_eq!(second.quantity, 2.5);
    }

    #[rstest]
    #[case("Folio,Symbol,Sector,Industry,Quantity,Purchase Price", "Hold Time")]
    #[case("Folio,Symbol,Sector,Industry,Quantity,Hold Time", "Purchase Price")]
    #[case("Symbol,Sector,Industry,Quantity,Purchase Price,Hold Time", "Folio")]
    fn test_missing_column_is_a_schema_error(#[case] header: &str, #[case] missing: &str) {
        let input = format!("{}\n", header);
        let result = load_holdings_from_reader(input.as_bytes());
        match result {
            Err(DataError::Schema { column }) => assert_eq!(column, missing),
            other => panic!("expected schema error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_extra_columns_are_tolerated() {
        let input = "\
Folio,Symbol,Sector,Industry,Quantity,Purchase Price,Hold Time,Notes
Core,AAPL,Technology,Hardware,10,100,0.5,long term pick
";
        let holdings = load_holdings_from_reader(input.as_bytes()).unwrap();
        assert_eq!(holdings.len(), 1);
    }

    #[test]
    fn test_bad_numeric_cell_is_a_csv_error() {
        let input = "\
Folio,Symbol,Sector,Industry,Quantity,Purchase Price,Hold Time
Core,AAPL,Technology,Hardware,ten,100,0.5
";
        let result = load_holdings_from_reader(input.as_bytes());
        assert!(matches!(result, Err(DataError::Csv(_))));
    }

    #[test]
    fn test_empty_table_loads_no_holdings() {
        let input = "Folio,Symbol,Sector,Industry,Quantity,Purchase Price,Hold Time\n";
        let holdings = load_holdings_from_reader(input.as_bytes()).unwrap();
        assert!(holdings.is_empty());
    }
}
