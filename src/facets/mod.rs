//! Search facet extraction
//!
//! Turns preprocessed request tokens (and optionally the raw text) into a
//! fixed-shape [`SearchFacets`] record.

mod extract;
pub mod lexicon;
mod text;
mod types;

pub use extract::{FacetExtractor, SIZE_BUDGET_SPLIT};
pub use text::{extract_features, extract_price_range, RawPriceRange};
pub use types::{Feature, Intent, PriceRange, ProductType, SearchFacets, SearchFacetsBuilder};
