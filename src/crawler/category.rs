//! Category resolution from detail pages

use crate::catalog::UNKNOWN_CATEGORY;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::extract_category;
use reqwest::Client;

/// Outcome of a category lookup
///
/// A lookup never fails outright; callers get either the label or the reason
/// it fell back to `UNKNOWN_CATEGORY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    Resolved(String),
    Unknown { reason: String },
}

impl CategoryResolution {
    /// Label to store for this item
    pub fn label(&self) -> &str {
        match self {
            Self::Resolved(category) => category,
            Self::Unknown { .. } => UNKNOWN_CATEGORY,
        }
    }

    pub fn into_label(self) -> String {
        match self {
            Self::Resolved(category) => category,
            Self::Unknown { .. } => UNKNOWN_CATEGORY.to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Fetches an item's detail page and reads its category from the breadcrumb
pub async fn resolve_category(client: &Client, detail_url: &str) -> CategoryResolution {
    let body = match fetch_page(client, detail_url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("Category lookup failed for {}: {}", detail_url, e);
            return CategoryResolution::Unknown {
                reason: e.to_string(),
            };
        }
    };

    match extract_category(&body) {
        Some(category) => CategoryResolution::Resolved(category),
        None => {
            tracing::debug!("No breadcrumb category on {}", detail_url);
            CategoryResolution::Unknown {
                reason: "breadcrumb has no category entry".to_string(),
            }
        }
    }
}
