//! Run report generation.

use crate::summary::PortfolioSummary;
use chrono::{DateTime, Utc};
use folio_engine::{AnalysisReport, FolioSelection};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A complete report of one analysis run.
///
/// Carries the summary cards plus both output tables, suitable for JSON
/// consumption by a presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Headline metrics of the run.
    pub summary: PortfolioSummary,

    /// The full engine output (enriched table, group table, totals).
    pub analysis: AnalysisReport,
}

impl Report {
    /// Create a new report from an engine run.
    pub fn new(analysis: AnalysisReport, selection: &FolioSelection) -> Self {
        Self {
            generated_at: Utc::now(),
            summary: PortfolioSummary::from_report(&analysis, selection),
            analysis,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    analysis: Option<AnalysisReport>,
    selection: Option<FolioSelection>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine output.
    pub fn analysis(mut self, analysis: AnalysisReport) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Set the folio selection the run covered.
    pub fn selection(mut self, selection: FolioSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Build the report.
    ///
    /// Returns `None` when no analysis was supplied.
    pub fn build(self) -> Option<Report> {
        let analysis = self.analysis?;
        let selection = self.selection.unwrap_or(FolioSelection::All);
        Some(Report::new(analysis, &selection))
    }
}
