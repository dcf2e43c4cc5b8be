//! Page parsing for storefront HTML
//!
//! The crawler depends only on the [`PageParser`] trait, so a different
//! storefront layout can be supported by adding another implementation.

mod amazon;
mod text;

pub use amazon::AmazonParser;
pub use text::{clean_text, resolve_link};

use crate::records::{DetailRecord, ListingRecord};
use url::Url;

/// Extracts records from fetched page bodies
///
/// Implementations never fail: anything that cannot be found is left empty.
pub trait PageParser: Send + Sync {
    /// Parses a search-results page into its listing items, in page order
    ///
    /// # Arguments
    ///
    /// * `body` - HTML of the results page
    /// * `base` - Storefront origin used to resolve relative detail links
    fn parse_listings(&self, body: &str, base: &Url) -> Vec<ListingRecord>;

    /// Parses a product detail page
    fn parse_detail(&self, body: &str) -> DetailRecord;
}
