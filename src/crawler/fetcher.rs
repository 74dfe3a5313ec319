//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests for catalog and detail pages
//! - Error classification (transport failure vs. non-success status)

use crate::config::CrawlerConfig;
use crate::CatalogError;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// The client is cheap to clone (it is reference counted internally) and is
/// shared by discovery and every page task.
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::CrawlerConfig;
/// use catalog_harvest::crawler::build_http_client;
///
/// let config = CrawlerConfig {
///     start_url: "https://books.toscrape.com/catalogue/page-1.html".to_string(),
///     workers: 8,
///     user_agent: "CatalogHarvest/1.0".to_string(),
///     timeout_secs: 30,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its decoded body
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(body)` |
/// | Other status | `Err(HttpStatus)` |
/// | Connect/timeout/decode failure | `Err(Http)` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, CatalogError> {
    let response = client.get(url).send().await.map_err(|source| {
        if source.is_timeout() {
            tracing::debug!("Request timeout for {}", url);
        } else if source.is_connect() {
            tracing::debug!("Connection failed for {}", url);
        }
        CatalogError::Http {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| CatalogError::Http {
        url: url.to_string(),
        source,
    })
}
