//! Heuristic relevance scoring
//!
//! | Term | Condition | Contribution |
//! |------|-----------|--------------|
//! | brand | brand is a substring of the lower-cased title | +30 |
//! | price ceiling | price <= range max | +20 |
//! | price floor | price >= range min | +10 |
//! | around price | `around_price` intent and range max set | max(0, 10 - abs(price - max) / 500) |
//! | cheap | `cheap` intent and price known | max(0, 20 - price / 1000) |
//! | quality | rating known and `quality` intent | rating / 5 * 25 |
//! | rating baseline | rating known, no `quality` intent | rating / 5 * 15 |
//! | features | each feature value found in the title | +5 each |
//!
//! Every term is non-negative, so every score is too.

use super::filter::comparable_title;
use crate::facets::{Intent, SearchFacets};
use crate::records::{ProductRecord, MAX_RATING};
use rust_decimal::prelude::ToPrimitive;

pub const BRAND_WEIGHT: f64 = 30.0;
pub const PRICE_CEILING_WEIGHT: f64 = 20.0;
pub const PRICE_FLOOR_WEIGHT: f64 = 10.0;
pub const AROUND_PRICE_WEIGHT: f64 = 10.0;
pub const AROUND_PRICE_STEP: f64 = 500.0;
pub const CHEAP_WEIGHT: f64 = 20.0;
pub const CHEAP_STEP: f64 = 1000.0;
pub const QUALITY_WEIGHT: f64 = 25.0;
pub const RATING_WEIGHT: f64 = 15.0;
pub const FEATURE_WEIGHT: f64 = 5.0;

/// Scores one record against the facets
pub fn score(record: &ProductRecord, facets: &SearchFacets) -> f64 {
    let title = comparable_title(&record.title);
    let range = facets.price_range();
    let price = record.price;
    let price_f = price.and_then(|p| p.to_f64());
    let mut total = 0.0;

    if let Some(brand) = facets.brand() {
        if title.contains(brand) {
            total += BRAND_WEIGHT;
        }
    }

    if let (Some(price), Some(max)) = (price, range.max()) {
        if price <= max {
            total += PRICE_CEILING_WEIGHT;
        }
    }

    if let (Some(price), Some(min)) = (price, range.min()) {
        if price >= min {
            total += PRICE_FLOOR_WEIGHT;
        }
    }

    if facets.has_intent(Intent::AroundPrice) {
        if let (Some(p), Some(max)) = (price_f, range.max().and_then(|m| m.to_f64())) {
            total += (AROUND_PRICE_WEIGHT - (p - max).abs() / AROUND_PRICE_STEP).max(0.0);
        }
    }

    if facets.has_intent(Intent::Cheap) {
        if let Some(p) = price_f {
            total += (CHEAP_WEIGHT - p / CHEAP_STEP).max(0.0);
        }
    }

    if let Some(rating) = record.rating {
        let weight = if facets.has_intent(Intent::Quality) {
            QUALITY_WEIGHT
        } else {
            RATING_WEIGHT
        };
        total += (rating / MAX_RATING) * weight;
    }

    total += facets
        .features()
        .values()
        .filter(|value| title.contains(value.to_lowercase().as_str()))
        .count() as f64
        * FEATURE_WEIGHT;

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::Feature;
    use rust_decimal::Decimal;

    fn record(title: &str, price: Option<i64>, rating: Option<f64>) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            price: price.map(Decimal::from),
            rating,
            ..ProductRecord::default()
        }
    }

    #[test]
    fn test_empty_facets_score_only_rating() {
        let facets = SearchFacets::default();
        assert_eq!(score(&record("Anything", Some(100), None), &facets), 0.0);
        assert_eq!(score(&record("Anything", None, Some(5.0)), &facets), 15.0);
    }

    #[test]
    fn test_brand_and_feature() {
        let facets = SearchFacets::builder()
            .brand("samsung")
            .feature(Feature::Storage, "128gb")
            .build();
        let s = score(&record("Samsung Galaxy A54 128GB", None, None), &facets);
        assert_eq!(s, 35.0);
    }

    #[test]
    fn test_price_band() {
        let facets = SearchFacets::builder()
            .price_range(Some(Decimal::from(1000)), Some(Decimal::from(2000)))
            .build();
        assert_eq!(score(&record("x", Some(1500), None), &facets), 30.0);
        assert_eq!(score(&record("x", Some(2500), None), &facets), 10.0);
        assert_eq!(score(&record("x", Some(500), None), &facets), 20.0);
        assert_eq!(score(&record("x", None, None), &facets), 0.0);
    }

    #[test]
    fn test_around_price() {
        let facets = SearchFacets::builder()
            .price_range(None, Some(Decimal::from(10000)))
            .intent(Intent::AroundPrice)
            .build();
        // 20 for the ceiling, 10 - 1000/500 = 8 for proximity
        assert_eq!(score(&record("x", Some(9000), None), &facets), 28.0);
        // far above the max: no ceiling, proximity floored at 0
        assert_eq!(score(&record("x", Some(30000), None), &facets), 0.0);
    }

    #[test]
    fn test_cheap_intent() {
        let facets = SearchFacets::builder().intent(Intent::Cheap).build();
        assert_eq!(score(&record("x", Some(5000), None), &facets), 15.0);
        assert_eq!(score(&record("x", Some(50000), None), &facets), 0.0);
    }

    #[test]
    fn test_quality_intent_replaces_baseline() {
        let quality = SearchFacets::builder().intent(Intent::Quality).build();
        assert_eq!(score(&record("x", None, Some(4.0)), &quality), 20.0);
        assert_eq!(score(&record("x", None, Some(4.0)), &SearchFacets::default()), 12.0);
    }
}
