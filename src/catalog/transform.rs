//! Record transformer
//!
//! Pure conversion from `RawItem` to `NormalizedRecord`. No I/O happens here;
//! the only ambient input is the wall clock read once per call.

use crate::catalog::types::{NormalizedRecord, Rating, RawItem};
use crate::CatalogError;
use chrono::{Local, NaiveDateTime, Timelike};

/// Format of `observed_at` when rendered as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Transforms a page's raw items, stamping them with the current local time
///
/// # Returns
///
/// * `Ok(Vec<NormalizedRecord>)` - One record per input item, same order
/// * `Err(CatalogError::InvalidPrice)` - Some item's price text did not parse
pub fn transform(items: &[RawItem]) -> Result<Vec<NormalizedRecord>, CatalogError> {
    let now = Local::now().naive_local();
    let observed_at = now.with_nanosecond(0).unwrap_or(now);
    transform_at(items, observed_at)
}

/// Same as `transform` with an explicit observation time
pub fn transform_at(
    items: &[RawItem],
    observed_at: NaiveDateTime,
) -> Result<Vec<NormalizedRecord>, CatalogError> {
    items
        .iter()
        .map(|item| transform_item(item, observed_at))
        .collect()
}

/// Normalizes a single item
pub fn transform_item(
    item: &RawItem,
    observed_at: NaiveDateTime,
) -> Result<NormalizedRecord, CatalogError> {
    Ok(NormalizedRecord {
        title: item.title.clone(),
        rating_label: Rating::label_for(item.rating_token.as_deref()).to_string(),
        category: item.category.clone(),
        price: parse_price(&item.price_text)?,
        stock_status: item.stock_text.clone(),
        observed_at,
    })
}

/// Parses catalog price text such as `£51.77` or `£5,50`
///
/// The leading currency symbol (and anything else before the first digit) is
/// dropped and a decimal comma becomes a decimal point. Negative, non-finite
/// or otherwise unparseable values are rejected.
pub fn parse_price(text: &str) -> Result<f64, CatalogError> {
    let invalid = || CatalogError::InvalidPrice {
        text: text.to_string(),
    };

    let numeric = text
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.' && c != ',')
        .trim()
        .replace(',', ".");

    let price: f64 = numeric.parse().map_err(|_| invalid())?;
    if !price.is_finite() || price < 0.0 {
        return Err(invalid());
    }

    Ok(price)
}
