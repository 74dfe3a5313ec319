//! Catalog records and their normalization
//!
//! - `types`: the raw shapes pulled off catalog pages and the normalized record
//!   that gets persisted
//! - `transform`: the pure conversion between the two

mod transform;
mod types;

pub use transform::{parse_price, transform, transform_at, transform_item, TIMESTAMP_FORMAT};
pub use types::{Listing, NormalizedRecord, Rating, RawItem, NO_RATING, UNKNOWN_CATEGORY};
