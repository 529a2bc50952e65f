#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/foliolab/folio/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;
pub mod table;

pub use export::{ExportError, ExportFormat, Exporter};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::PortfolioSummary;
pub use table::{render_group_table, render_group_table_markdown, render_holdings_table};
