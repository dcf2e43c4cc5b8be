//! Product records as they move through a crawl
//!
//! A results page yields [`ListingRecord`]s, a detail page yields a
//! [`DetailRecord`], and the two are merged into the [`ProductRecord`] that
//! ranking and output work with.

mod merge;
mod rating;

pub use merge::merge;
pub use rating::{parse_rating, MAX_RATING};

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Placeholder written in place of a missing product link
pub const LINK_NOT_AVAILABLE: &str = "Link not available";

/// One item on a search-results page, fields as raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRecord {
    /// Storefront item id; may be empty
    pub id: String,
    pub title: String,
    pub raw_price: String,
    pub raw_rating: String,
    pub image_url: String,
    /// Absolute detail page URL, absent when the item has no detail page
    pub detail_link: Option<String>,
}

impl ListingRecord {
    /// Returns the detail link when it can be fetched
    pub fn usable_detail_link(&self) -> Option<&str> {
        self.detail_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty() && *link != LINK_NOT_AVAILABLE)
    }
}

/// Fields read from a product detail page, as raw text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailRecord {
    pub title: String,
    pub raw_price: String,
    pub raw_rating: String,
    pub description: String,
    pub image_url: String,
    pub specs: BTreeMap<String, String>,
}

/// A normalized candidate product
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductRecord {
    pub title: String,
    /// Canonical price; absent when the source text did not parse
    pub price: Option<Decimal>,
    /// Star rating in `0..=5`
    pub rating: Option<f64>,
    pub image_url: String,
    pub link: Option<String>,
    pub description: String,
    pub specs: BTreeMap<String, String>,
    /// Query string of the crawl that produced the record
    pub source_query: String,
}

impl ProductRecord {
    /// Link text for display and output, with the placeholder when absent
    pub fn link_or_placeholder(&self) -> &str {
        self.link.as_deref().unwrap_or(LINK_NOT_AVAILABLE)
    }
}
