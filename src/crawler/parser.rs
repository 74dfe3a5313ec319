//! HTML parser for catalog and detail pages
//!
//! This module pulls out:
//! - Item summaries from a catalog page (`article.product_pod`)
//! - The "next page" pagination link
//! - The category entry of a detail page's breadcrumb
//!
//! Everything here is synchronous and returns owned data, so a parsed document
//! never lives across an await point.

use crate::catalog::Listing;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Items extracted from one catalog page
#[derive(Debug, Clone, Default)]
pub struct ExtractedListings {
    /// Well-formed item summaries in page order
    pub listings: Vec<Listing>,

    /// Number of item containers that were skipped as malformed
    pub skipped: usize,
}

/// Extracts item summaries from a catalog page
///
/// # Item Rules
///
/// | Field | Source | Missing |
/// |-------|--------|---------|
/// | title | `h3 a[title]`, else link text | skip item |
/// | detail link | `h3 a[href]`, resolved against `page_url` | skip item |
/// | rating | second class token of `p.star-rating` | `None` |
/// | price | text of `p.price_color` | skip item |
/// | stock | text of `p.instock.availability` | skip item |
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::crawler::extract_listings;
/// use url::Url;
///
/// let html = r#"<article class="product_pod">
///   <p class="star-rating Two"></p>
///   <h3><a href="book_1/index.html" title="Book">Book</a></h3>
///   <p class="price_color">£9.99</p>
///   <p class="instock availability">In stock</p>
/// </article>"#;
/// let page = Url::parse("https://example.com/catalogue/page-1.html").unwrap();
/// let extracted = extract_listings(html, &page);
/// assert_eq!(extracted.listings[0].rating_token.as_deref(), Some("Two"));
/// ```
pub fn extract_listings(html: &str, page_url: &Url) -> ExtractedListings {
    let document = Html::parse_document(html);
    let mut extracted = ExtractedListings::default();

    let Some(item_selector) = selector("article.product_pod") else {
        return extracted;
    };

    for (index, item) in document.select(&item_selector).enumerate() {
        match extract_listing(item, page_url) {
            Ok(listing) => extracted.listings.push(listing),
            Err(reason) => {
                tracing::warn!(
                    "Skipping malformed item #{} on {}: {}",
                    index + 1,
                    page_url,
                    reason
                );
                extracted.skipped += 1;
            }
        }
    }

    extracted
}

/// Extracts one item; the error names the first missing piece
fn extract_listing(item: ElementRef<'_>, page_url: &Url) -> Result<Listing, String> {
    let link = first(item, "h3 a").ok_or("missing title link")?;

    let title = link
        .value()
        .attr("title")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| Some(element_text(link)).filter(|t| !t.is_empty()))
        .ok_or("empty title")?;

    let href = link.value().attr("href").ok_or("title link has no href")?;
    let detail_url = resolve_link(href, page_url).ok_or_else(|| format!("bad href {:?}", href))?;

    let rating_token = first(item, "p.star-rating")
        .and_then(|rating| rating.value().attr("class"))
        .and_then(|class| class.split_whitespace().nth(1))
        .map(str::to_string);

    let price_text = first(item, "p.price_color")
        .map(element_text)
        .filter(|t| !t.is_empty())
        .ok_or("missing price")?;

    let stock_text = first(item, "p.instock.availability")
        .map(element_text)
        .filter(|t| !t.is_empty())
        .ok_or("missing stock status")?;

    Ok(Listing {
        title,
        rating_token,
        price_text,
        stock_text,
        detail_url,
    })
}

/// Finds the absolute URL of the next catalog page, if any
pub fn extract_next_page(html: &str, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let next_selector = selector("li.next a[href]")?;

    document
        .select(&next_selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| resolve_link(href, page_url))
}

/// Reads the category (third breadcrumb entry) from a detail page
pub fn extract_category(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let crumb_selector = selector("ul.breadcrumb a")?;

    document
        .select(&crumb_selector)
        .nth(2)
        .map(element_text)
        .filter(|label| !label.is_empty())
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    scope.select(&sel).next()
}

/// Element text with runs of whitespace collapsed to single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(|chunk| chunk.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves an href against the page it appears on
///
/// Returns None for empty, fragment-only or non-HTTP(S) links.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
