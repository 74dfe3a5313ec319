//! Crawler coordinator - one full crawl-and-load pass
//!
//! The pass runs in two phases:
//! 1. Bootstrap the store schema and discover every catalog page (sequential)
//! 2. Fan the pages out to the `PageWorkerPool` and summarize the results

use crate::config::Config;
use crate::crawler::discovery::discover_pages;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pool::PageWorkerPool;
use crate::output::{log_summary, CrawlSummary};
use crate::storage::{StoreConnector, TABLE_NAME};
use crate::CatalogError;
use reqwest::Client;
use std::time::Instant;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    client: Client,
    connector: StoreConnector,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// Builds the shared HTTP client and the store connector; nothing touches
    /// the network or the database yet.
    pub fn new(config: Config) -> Result<Self, CatalogError> {
        let client = build_http_client(&config.crawler)?;
        let connector = StoreConnector::from_config(&config.store);

        Ok(Self {
            config,
            client,
            connector,
        })
    }

    pub fn connector(&self) -> &StoreConnector {
        &self.connector
    }

    /// Runs the crawl
    ///
    /// Schema bootstrap and discovery failures are returned as errors. Page
    /// failures are not: they show up in the summary.
    pub async fn run(&self) -> Result<CrawlSummary, CatalogError> {
        tracing::info!(
            "Preparing table {} on {}",
            TABLE_NAME,
            self.connector.describe()
        );
        self.connector.bootstrap().await?;
        tracing::info!("Table created or verified");

        let discovery_start = Instant::now();
        let pages = discover_pages(&self.client, &self.config.crawler.start_url).await?;
        let discovery_elapsed = discovery_start.elapsed();
        let pages_discovered = pages.len();

        let pool = PageWorkerPool::new(
            self.client.clone(),
            self.connector.clone(),
            self.config.crawler.workers,
        );
        tracing::info!(
            "Processing {} pages with {} workers",
            pages_discovered,
            pool.workers()
        );

        let processing_start = Instant::now();
        let reports = pool.run_all(pages).await;
        let processing_elapsed = processing_start.elapsed();

        let summary = CrawlSummary::from_reports(
            pages_discovered,
            &reports,
            discovery_elapsed,
            processing_elapsed,
        );
        log_summary(&summary);

        Ok(summary)
    }
}

/// Runs one full crawl-and-load pass
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::load_config;
/// use catalog_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config()?;
/// let summary = run_crawl(config).await?;
/// println!("{} new rows", summary.rows_inserted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CatalogError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
