#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/foliolab/folio/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod enrich;
pub mod error;
pub mod group;
pub mod holding;
pub mod quote;

pub use engine::{AnalysisReport, PortfolioTotals, compute};
pub use enrich::EnrichedHolding;
pub use error::{MetricsError, Result};
pub use group::{FolioSelection, GroupKey, GroupRow, filter_folio, summarize};
pub use holding::{HOLD_TIME_FLOOR, Holding, unique_symbols};
pub use quote::{Quote, QuoteMap};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
