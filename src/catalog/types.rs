use chrono::NaiveDateTime;
use std::fmt;

/// Label stored when an item has no recognizable star rating
pub const NO_RATING: &str = "no rating";

/// Category stored when the detail page could not be resolved
pub const UNKNOWN_CATEGORY: &str = "unknown category";

/// Star rating as encoded in the listing's class token (`star-rating Three`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl Rating {
    /// Parses the class token; anything outside `One..=Five` is not a rating
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "One" => Some(Self::One),
            "Two" => Some(Self::Two),
            "Three" => Some(Self::Three),
            "Four" => Some(Self::Four),
            "Five" => Some(Self::Five),
            _ => None,
        }
    }

    /// Display label persisted in the `classificacao` column
    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "1 star",
            Self::Two => "2 stars",
            Self::Three => "3 stars",
            Self::Four => "4 stars",
            Self::Five => "5 stars",
        }
    }

    /// Maps an optional token straight to its label, falling back to `NO_RATING`
    pub fn label_for(token: Option<&str>) -> &'static str {
        token
            .and_then(Self::from_token)
            .map(|rating| rating.label())
            .unwrap_or(NO_RATING)
    }

    /// Returns all ratings
    pub fn all() -> [Rating; 5] {
        [Self::One, Self::Two, Self::Three, Self::Four, Self::Five]
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One item summary as it appears on a catalog page, before enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    /// Second class token of the rating element, if present
    pub rating_token: Option<String>,
    /// Price text including the currency symbol (e.g. `£51.77`)
    pub price_text: String,
    pub stock_text: String,
    /// Absolute URL of the item's detail page
    pub detail_url: String,
}

impl Listing {
    /// Attaches the category resolved from the detail page
    pub fn with_category(self, category: impl Into<String>) -> RawItem {
        RawItem {
            title: self.title,
            rating_token: self.rating_token,
            category: category.into(),
            price_text: self.price_text,
            stock_text: self.stock_text,
            detail_url: self.detail_url,
        }
    }
}

/// A listing enriched with its category; input to the transformer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub title: String,
    pub rating_token: Option<String>,
    pub category: String,
    pub price_text: String,
    pub stock_text: String,
    pub detail_url: String,
}

/// The persisted unit: one observation of one product at one price
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub title: String,
    pub rating_label: String,
    pub category: String,
    /// Always finite and non-negative
    pub price: f64,
    pub stock_status: String,
    /// Second precision, local wall clock
    pub observed_at: NaiveDateTime,
}
