//! Page worker pool
//!
//! One task per catalog page, at most `workers` running at once. Each task
//! runs fetch → extract → resolve categories → transform → write on its own
//! and turns any failure into its `PageReport`; nothing a task does can
//! cancel or fail a sibling.

use crate::catalog::transform;
use crate::crawler::category::resolve_category;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::extract_listings;
use crate::output::PageReport;
use crate::state::{PageTaskState, StateTracker};
use crate::storage::{write_records, StoreConnector, WriteOutcome};
use crate::CatalogError;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Bounded pool of page tasks
pub struct PageWorkerPool {
    client: Client,
    connector: StoreConnector,
    workers: usize,
}

impl PageWorkerPool {
    /// Creates a pool running at most `workers` pages at once (minimum 1)
    pub fn new(client: Client, connector: StoreConnector, workers: usize) -> Self {
        Self {
            client,
            connector,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Processes every page and waits for all of them to finish
    ///
    /// Returns one report per input URL, in input order.
    pub async fn run_all(&self, page_urls: Vec<String>) -> Vec<PageReport> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(page_urls.len());

        for url in page_urls {
            let semaphore = Arc::clone(&semaphore);
            let client = self.client.clone();
            let connector = self.connector.clone();
            let task_url = url.clone();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return PageReport::crashed(task_url, e.to_string()),
                };
                process_page(&client, &connector, &task_url).await
            });
            handles.push((url, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!("Worker for {} crashed: {}", url, e);
                    reports.push(PageReport::crashed(url, e.to_string()));
                }
            }
        }

        reports
    }
}

/// Runs the full pipeline for one catalog page
///
/// Never returns an error: failures are logged with the page URL and
/// recorded in the report's state.
pub async fn process_page(client: &Client, connector: &StoreConnector, url: &str) -> PageReport {
    let mut tracker = StateTracker::new();
    let mut report = PageReport::new(url);

    if let Err(e) = run_stages(client, connector, url, &mut tracker, &mut report).await {
        tracker.fail();
        let stage = tracker.failed_in().unwrap_or(PageTaskState::Pending);
        tracing::error!("Error processing {} while {}: {}", url, stage, e);
        report.error = Some(e.to_string());
    }

    report.state = tracker.current();
    report.failed_in = tracker.failed_in();
    report
}

async fn run_stages(
    client: &Client,
    connector: &StoreConnector,
    url: &str,
    tracker: &mut StateTracker,
    report: &mut PageReport,
) -> Result<(), CatalogError> {
    tracker.advance(PageTaskState::Fetching)?;
    let page_url = Url::parse(url)?;
    let body = fetch_page(client, url).await?;

    tracker.advance(PageTaskState::Extracting)?;
    let extracted = extract_listings(&body, &page_url);
    report.items_extracted = extracted.listings.len();
    report.items_skipped = extracted.skipped;
    tracing::info!("{} items extracted from {}", extracted.listings.len(), url);

    tracker.advance(PageTaskState::ResolvingCategories)?;
    let mut items = Vec::with_capacity(extracted.listings.len());
    for listing in extracted.listings {
        let resolution = resolve_category(client, &listing.detail_url).await;
        if !resolution.is_resolved() {
            report.categories_unknown += 1;
        }
        items.push(listing.with_category(resolution.into_label()));
    }

    tracker.advance(PageTaskState::Transforming)?;
    let records = transform(&items)?;

    tracker.advance(PageTaskState::Writing)?;
    match write_records(connector, records).await {
        WriteOutcome::Committed { inserted, .. } => report.rows_inserted = inserted,
        WriteOutcome::RolledBack { error, .. } => return Err(error.into()),
    }

    tracker.advance(PageTaskState::Done)?;
    Ok(())
}
