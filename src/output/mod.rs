//! Output module for crawl reporting
//!
//! Page tasks return a `PageReport`; the coordinator folds them into a
//! `CrawlSummary` and logs it at the end of the run.

pub mod stats;

pub use stats::{log_summary, CrawlSummary, PageReport};
