//! Ranking of candidate products against search facets
//!
//! Ranking is pure: the same records and facets always give the same order.

mod filter;
mod score;

pub use filter::{comparable_title, matches_category, passes_filters};
pub use score::score;

use crate::facets::SearchFacets;
use crate::records::ProductRecord;
use serde::Serialize;

/// A product with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub score: f64,
}

/// Filters, scores and orders products
///
/// Records failing the category or budget filter are dropped. The rest are
/// sorted by descending score; equal scores keep their input order. At most
/// `top_n` products are returned.
///
/// # Example
///
/// ```
/// use souq_scout::facets::{ProductType, SearchFacets};
/// use souq_scout::ranking::rank;
/// use souq_scout::records::ProductRecord;
/// use rust_decimal::Decimal;
///
/// let facets = SearchFacets::builder()
///     .product(ProductType::Shoes)
///     .budget(Decimal::from(1500))
///     .build();
/// let records = [1200, 1600, 900].map(|p| ProductRecord {
///     title: "Running shoes".to_string(),
///     price: Some(Decimal::from(p)),
///     ..ProductRecord::default()
/// });
///
/// let ranked = rank(records.to_vec(), &facets, 5);
/// assert_eq!(ranked.len(), 2);
/// ```
pub fn rank(records: Vec<ProductRecord>, facets: &SearchFacets, top_n: usize) -> Vec<ScoredProduct> {
    let total = records.len();

    let mut scored: Vec<ScoredProduct> = records
        .into_iter()
        .filter(|record| passes_filters(record, facets))
        .map(|product| {
            let score = score(&product, facets);
            ScoredProduct { product, score }
        })
        .collect();

    let kept = scored.len();

    // sort_by is stable, so ties keep input order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_n);

    tracing::debug!(
        "Ranked {} of {} candidates, returning {}",
        kept,
        total,
        scored.len()
    );
    scored
}
