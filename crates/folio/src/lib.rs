#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/foliolab/folio/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use folio_data as data;
pub use folio_engine as engine;
pub use folio_output as output;

// Re-export the common working set
pub use folio_engine::{
    AnalysisReport, EnrichedHolding, FolioSelection, GroupKey, GroupRow, Holding, Quote, QuoteMap,
    compute,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
