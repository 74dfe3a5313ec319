//! Pagination discovery
//!
//! Walks "next" links one page at a time from the start URL. Runs before any
//! page task is dispatched, single-threaded.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::extract_next_page;
use crate::CatalogError;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Discovers every catalog page reachable from `start_url`
///
/// Returns the visited URLs in order, start page first. Any fetch failure
/// aborts discovery: a broken page hides every page after it.
///
/// A next link pointing back at an already visited page ends the walk instead
/// of looping forever.
pub async fn discover_pages(client: &Client, start_url: &str) -> Result<Vec<String>, CatalogError> {
    let mut pages = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(start_url.to_string());

    while let Some(url) = current.take() {
        let page_url = Url::parse(&url)?;
        let body = fetch_page(client, &url).await?;

        tracing::debug!("Discovered catalog page {}", url);
        seen.insert(url.clone());
        pages.push(url);

        match extract_next_page(&body, &page_url) {
            Some(next) if seen.contains(&next) => {
                tracing::warn!("Pagination loops back to {}; stopping discovery", next);
            }
            Some(next) => current = Some(next),
            None => {}
        }
    }

    tracing::info!("{} pages found", pages.len());
    Ok(pages)
}
