#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/foliolab/folio/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod ingest;
pub mod source;
pub mod yahoo;

pub use cache::{CacheStats, SnapshotCache, snapshot_fingerprint};
pub use error::{DataError, Result};
pub use ingest::{REQUIRED_COLUMNS, load_holdings};
pub use source::{DEFAULT_CONCURRENCY, FetchConfig, QuoteSource, fetch_quote_map};
pub use yahoo::YahooQuoteProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
