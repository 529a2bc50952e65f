//! Export functionality for the Folio output tables.
//!
//! Both tables carry serde renames that pin their column names, so CSV and
//! JSON exports stay stable for downstream consumers regardless of internal
//! field naming.

use folio_engine::{EnrichedHolding, GroupRow};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Infer a format from a file path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(format!(
                "unsupported export extension: {:?}",
                other
            ))),
        }
    }
}

/// Exporter for the Folio output tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter;

impl Exporter {
    /// Serialize the group summary table to a string.
    pub fn groups_to_string(rows: &[GroupRow], format: ExportFormat) -> Result<String, ExportError> {
        Self::to_string_impl(rows, format)
    }

    /// Serialize the enriched holdings table to a string.
    pub fn holdings_to_string(
        rows: &[EnrichedHolding],
        format: ExportFormat,
    ) -> Result<String, ExportError> {
        Self::to_string_impl(rows, format)
    }

    /// Write the group summary table to a file.
    pub fn export_groups<P: AsRef<Path>>(
        rows: &[GroupRow],
        format: ExportFormat,
        path: P,
    ) -> Result<(), ExportError> {
        let contents = Self::groups_to_string(rows, format)?;
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Write the enriched holdings table to a file.
    pub fn export_holdings<P: AsRef<Path>>(
        rows: &[EnrichedHolding],
        format: ExportFormat,
        path: P,
    ) -> Result<(), ExportError> {
        let contents = Self::holdings_to_string(rows, format)?;
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    fn to_string_impl<T: Serialize>(
        rows: &[T],
        format: ExportFormat,
    ) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for row in rows {
                    writer.serialize(row)?;
                }
                let bytes = writer
                    .into_inner()
                    .map_err(|e| ExportError::InvalidFormat(e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(rows)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(rows)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_engine::{GroupKey, Holding, Quote, QuoteMap, compute};
    use rstest::rstest;

    fn sample() -> (Vec<EnrichedHolding>, Vec<GroupRow>) {
        let holdings = vec![
            Holding {
                folio: "Core".to_string(),
                symbol: "AAPL".to_string(),
                sector: Some("Technology".to_string()),
                industry: Some("Consumer Electronics".to_string()),
                quantity: 10.0,
                purchase_price: 100.0,
                hold_time: 0.5,
            },
            Holding {
                folio: "Core".to_string(),
                symbol: "GONE".to_string(),
                sector: None,
                industry: None,
                quantity: 5.0,
                purchase_price: 20.0,
                hold_time: 2.0,
            },
        ];
        let mut quotes = QuoteMap::new();
        quotes.insert("AAPL".to_string(), Quote::with_prices(120.0, 115.0));
        let report = compute(&holdings, &quotes, GroupKey::Folio).unwrap();
        (report.enriched, report.groups)
    }

    #[rstest]
    #[case(ExportFormat::Csv, "csv")]
    #[case(ExportFormat::Json, "json")]
    #[case(ExportFormat::PrettyJson, "json")]
    fn test_extensions(#[case] format: ExportFormat, #[case] expected: &str) {
        assert_eq!(format.extension(), expected);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ExportFormat::from_path("out/summary.csv").unwrap(),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path("summary.JSON").unwrap(),
            ExportFormat::PrettyJson
        );
        assert!(ExportFormat::from_path("summary.xlsx").is_err());
    }

    #[test]
    fn test_group_csv_has_stable_column_names() {
        let (_, groups) = sample();
        let csv = Exporter::groups_to_string(&groups, ExportFormat::Csv).unwrap();
        let header = csv.lines().next().unwrap();

        assert_eq!(
            header,
            "Group,Investment,Net_Present_Value,Net_Gain_Loss,Expect_Gain,Daily_Change,Avg_Hold_Time,Net_CAGR"
        );
    }

    #[test]
    fn test_holdings_csv_has_stable_column_names() {
        let (enriched, _) = sample();
        let csv = Exporter::holdings_to_string(&enriched, ExportFormat::Csv).unwrap();
        let header = csv.lines().next().unwrap();

        for column in [
            "Folio",
            "Symbol",
            "Sector",
            "Industry",
            "Quantity",
            "Purchase Price",
            "Hold Time",
            "Current_Price",
            "Prev_Close",
            "Analyst_Target",
            "Investment",
            "Present_Value",
            "Gain_Loss",
            "Net_Gain_Loss",
            "Net_Present_Value",
            "Daily_Change",
            "Expect_Gain",
            "Net_CAGR",
        ] {
            assert!(header.contains(column), "missing column {}", column);
        }
    }

    #[test]
    fn test_missing_values_export_as_empty_csv_cells() {
        let (enriched, _) = sample();
        let csv = Exporter::holdings_to_string(&enriched, ExportFormat::Csv).unwrap();
        let gone_line = csv.lines().find(|line| line.contains("GONE")).unwrap();

        // Quote-dependent cells for the unquoted holding are empty, but the
        // investment is present.
        assert!(gone_line.contains(",100.0,"));
        assert!(gone_line.contains(",,"));
    }

    #[test]
    fn test_json_round_trips_group_rows() {
        let (_, groups) = sample();
        let json = Exporter::groups_to_string(&groups, ExportFormat::Json).unwrap();
        let parsed: Vec<GroupRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, groups);
    }

    #[test]
    fn test_export_to_file() {
        let (_, groups) = sample();
        let dir = std::env::temp_dir().join("folio-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("groups.csv");

        Exporter::export_groups(&groups, ExportFormat::Csv, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Group,"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
