//! Statistics for one crawl pass
//!
//! This module aggregates per-page reports into run totals and logs them.

use crate::state::PageTaskState;
use std::collections::HashMap;
use std::time::Duration;

/// What happened to one catalog page
#[derive(Debug, Clone)]
pub struct PageReport {
    /// The catalog page URL
    pub url: String,

    /// Terminal state of the task (`Done` or `Failed`)
    pub state: PageTaskState,

    /// Stage the task was in when it failed
    pub failed_in: Option<PageTaskState>,

    /// Item summaries extracted from the page
    pub items_extracted: usize,

    /// Item containers skipped as malformed
    pub items_skipped: usize,

    /// Items whose category fell back to the unknown sentinel
    pub categories_unknown: usize,

    /// Rows inserted into the store
    pub rows_inserted: u64,

    /// Error message when the task failed
    pub error: Option<String>,
}

impl PageReport {
    /// Creates an empty report for a page about to be processed
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: PageTaskState::Pending,
            failed_in: None,
            items_extracted: 0,
            items_skipped: 0,
            categories_unknown: 0,
            rows_inserted: 0,
            error: None,
        }
    }

    /// Report for a task that died without producing its own report
    pub fn crashed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            state: PageTaskState::Failed,
            error: Some(error.into()),
            ..Self::new(url)
        }
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }
}

/// Crawl summary for one full pass
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    /// Pages found by pagination discovery
    pub pages_discovered: usize,

    /// Page tasks that reached `Done`
    pub pages_done: usize,

    /// Page tasks that ended in `Failed`
    pub pages_failed: usize,

    /// Failed tasks keyed by the stage they failed in
    pub failures_by_stage: HashMap<PageTaskState, usize>,

    /// Items extracted across all pages
    pub items_extracted: usize,

    /// Malformed items skipped across all pages
    pub items_skipped: usize,

    /// Items stored with the unknown category sentinel
    pub categories_unknown: usize,

    /// Rows inserted across all pages
    pub rows_inserted: u64,

    /// Time spent discovering pages
    pub discovery_elapsed: Duration,

    /// Time spent in the worker pool
    pub processing_elapsed: Duration,
}

impl CrawlSummary {
    /// Folds page reports into run totals
    pub fn from_reports(
        pages_discovered: usize,
        reports: &[PageReport],
        discovery_elapsed: Duration,
        processing_elapsed: Duration,
    ) -> Self {
        let mut summary = CrawlSummary {
            pages_discovered,
            discovery_elapsed,
            processing_elapsed,
            ..Default::default()
        };

        for report in reports {
            if report.is_success() {
                summary.pages_done += 1;
            } else {
                summary.pages_failed += 1;
                let stage = report.failed_in.unwrap_or(report.state);
                *summary.failures_by_stage.entry(stage).or_insert(0) += 1;
            }
            summary.items_extracted += report.items_extracted;
            summary.items_skipped += report.items_skipped;
            summary.categories_unknown += report.categories_unknown;
            summary.rows_inserted += report.rows_inserted;
        }

        summary
    }

    /// Total wall-clock time of the pass
    pub fn total_elapsed(&self) -> Duration {
        self.discovery_elapsed + self.processing_elapsed
    }
}

/// Logs the summary through `tracing`
pub fn log_summary(summary: &CrawlSummary) {
    tracing::info!(
        "Pages: {} discovered, {} done, {} failed",
        summary.pages_discovered,
        summary.pages_done,
        summary.pages_failed
    );

    if !summary.failures_by_stage.is_empty() {
        let mut stages: Vec<_> = summary.failures_by_stage.iter().collect();
        stages.sort_by(|a, b| b.1.cmp(a.1));
        for (stage, count) in stages {
            tracing::warn!("  {} page(s) failed while {}", count, stage);
        }
    }

    tracing::info!(
        "Items: {} extracted, {} skipped, {} without category; {} new rows",
        summary.items_extracted,
        summary.items_skipped,
        summary.categories_unknown,
        summary.rows_inserted
    );

    tracing::info!(
        "Processing finished in {:.2} seconds ({:.2} seconds including discovery)",
        summary.processing_elapsed.as_secs_f64(),
        summary.total_elapsed().as_secs_f64()
    );
}
