//! Hard filters applied before scoring

use crate::facets::lexicon::{product_keywords, PHONE_ACCESSORY_EXCLUSIONS, PHONE_TITLE_KEYWORDS};
use crate::facets::{ProductType, SearchFacets};
use crate::query::normalize_arabic;
use crate::records::ProductRecord;

/// Lower-cases a listing title and folds Arabic letter variants
///
/// Keywords and facets use the folded spelling, so `ساعة` in a title meets
/// `ساعه` in the lexicon.
pub fn comparable_title(title: &str) -> String {
    normalize_arabic(&title.to_lowercase())
}

/// Returns true when a comparable title belongs to the category
///
/// Titles are matched by substring against the category keywords. Phone
/// titles also match on model lines ("galaxy", "redmi", ...) and are
/// rejected when they name an accessory. `Unknown` accepts every title.
pub fn matches_category(title: &str, product: ProductType) -> bool {
    if !product.is_known() {
        return true;
    }

    let mut keywords = product_keywords(product).iter();
    let matched = if product == ProductType::Phone {
        keywords
            .chain(PHONE_TITLE_KEYWORDS.iter())
            .any(|k| title.contains(k))
    } else {
        keywords.any(|k| title.contains(k))
    };

    if !matched {
        return false;
    }

    if product == ProductType::Phone {
        return !PHONE_ACCESSORY_EXCLUSIONS
            .iter()
            .any(|k| title.contains(k));
    }

    true
}

/// Returns true when the record survives the category and budget filters
///
/// A record without a price is never removed by the budget.
pub fn passes_filters(record: &ProductRecord, facets: &SearchFacets) -> bool {
    let title = comparable_title(&record.title);
    if !matches_category(&title, facets.product()) {
        return false;
    }

    match (facets.budget(), record.price) {
        (Some(budget), Some(price)) => price <= budget,
        _ => true,
    }
}
