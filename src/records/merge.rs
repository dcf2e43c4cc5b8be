use super::{parse_rating, DetailRecord, ListingRecord, ProductRecord};
use crate::price::PriceNormalizer;

/// Merges a listing with its detail page into a product record
///
/// Detail values win when present and non-empty; otherwise the listing value
/// is kept. The price and rating win only when they actually parse, so a
/// detail page with a garbled price still keeps the listing price. Without a
/// detail record the description and specs stay empty.
///
/// # Arguments
///
/// * `listing` - The results-page item
/// * `detail` - The detail page fields, if one was fetched
/// * `normalizer` - Canonical price normalizer
/// * `query` - Query string stamped on the record
pub fn merge(
    listing: ListingRecord,
    detail: Option<DetailRecord>,
    normalizer: &PriceNormalizer,
    query: &str,
) -> ProductRecord {
    let listing_price = normalizer.normalize(&listing.raw_price);
    let listing_rating = parse_rating(&listing.raw_rating);
    let link = listing.usable_detail_link().map(str::to_string);

    let mut record = ProductRecord {
        title: listing.title,
        price: listing_price,
        rating: listing_rating,
        image_url: listing.image_url,
        link,
        description: String::new(),
        specs: Default::default(),
        source_query: query.to_string(),
    };

    let Some(detail) = detail else {
        return record;
    };

    if !detail.title.trim().is_empty() {
        record.title = detail.title;
    }
    if let Some(price) = normalizer.normalize(&detail.raw_price) {
        record.price = Some(price);
    }
    if let Some(rating) = parse_rating(&detail.raw_rating) {
        record.rating = Some(rating);
    }
    if !detail.image_url.trim().is_empty() {
        record.image_url = detail.image_url;
    }
    record.description = detail.description;
    record.specs = detail.specs;

    record
}
