//! Regex extraction over the raw request text
//!
//! These run on the full sentence rather than on tokens, because units and
//! ranges span several words ("8 gb ram", "between 1000 and 2000").

use super::types::Feature;
use crate::price::fold_digits;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static FEATURE_PATTERNS: LazyLock<Vec<(Feature, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Feature::Ram,
            Regex::new(r"([0-9]+)\s*(gb)\s*(ram|رام)").expect("valid regex"),
        ),
        (
            Feature::Storage,
            Regex::new(r"([0-9]+)\s*(gb|جيجا)").expect("valid regex"),
        ),
        (
            Feature::Network,
            Regex::new(r"(5g|4g|lte)").expect("valid regex"),
        ),
        (
            Feature::Display,
            Regex::new(r"(amoled|oled|ips|lcd)").expect("valid regex"),
        ),
    ]
});

static UNDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(تحت|under)\s*([0-9]+)").expect("valid regex"));
static ABOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(فوق|above)\s*([0-9]+)").expect("valid regex"));
static BETWEEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(من|between)\s*([0-9]+).*(لـ|to|and)\s*([0-9]+)").expect("valid regex")
});

/// Bounds written in the request, as digit strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPriceRange {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Extracts the first match of each feature pattern
pub fn extract_features(text: &str) -> BTreeMap<Feature, String> {
    let text = fold_digits(text).to_lowercase();

    FEATURE_PATTERNS
        .iter()
        .filter_map(|(feature, re)| re.find(&text).map(|m| (*feature, m.as_str().to_string())))
        .collect()
}

/// Extracts price bounds from phrases like "under 500" or "من 1000 لـ 2000"
///
/// A between-phrase overrides both bounds.
pub fn extract_price_range(text: &str) -> RawPriceRange {
    let text = fold_digits(text).to_lowercase();
    let mut range = RawPriceRange::default();

    if let Some(caps) = UNDER_RE.captures(&text) {
        range.max = caps.get(2).map(|m| m.as_str().to_string());
    }

    if let Some(caps) = ABOVE_RE.captures(&text) {
        range.min = caps.get(2).map(|m| m.as_str().to_string());
    }

    if let Some(caps) = BETWEEN_RE.captures(&text) {
        range.min = caps.get(2).map(|m| m.as_str().to_string());
        range.max = caps.get(4).map(|m| m.as_str().to_string());
    }

    range
}
