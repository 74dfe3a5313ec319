//! Crawler module for catalog fetching and processing
//!
//! This module contains the crawl-extract-transform-load pipeline:
//! - HTTP fetching
//! - HTML extraction of items, pagination and breadcrumbs
//! - Pagination discovery
//! - Category resolution from detail pages
//! - The bounded page worker pool
//! - Overall crawl coordination

mod category;
mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod pool;

pub use category::{resolve_category, CategoryResolution};
pub use coordinator::{run_crawl, Coordinator};
pub use discovery::discover_pages;
pub use fetcher::{build_http_client, fetch_page};
pub use parser::{extract_category, extract_listings, extract_next_page, ExtractedListings};
pub use pool::{process_page, PageWorkerPool};

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CatalogError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Create the catalog table if needed
/// 2. Follow pagination to find every catalog page
/// 3. Process the pages on a bounded worker pool
/// 4. Log and return the run summary
pub async fn crawl(config: Config) -> Result<CrawlSummary, CatalogError> {
    run_crawl(config).await
}
