use crate::price::fold_digits;
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").expect("valid regex"));

/// Highest rating a storefront shows
pub const MAX_RATING: f64 = 5.0;

/// Reads a star rating from text such as "4.5 out of 5 stars"
///
/// The first number in the text is the rating. Decimal commas and
/// Arabic-Indic digits are accepted. Values outside `0..=5` are rejected.
///
/// # Returns
///
/// * `Some(f64)` - The rating
/// * `None` - No number, or the number is out of range
pub fn parse_rating(raw: &str) -> Option<f64> {
    let text = fold_digits(raw);
    let found = NUMBER_RE.find(&text)?;
    let value: f64 = found.as_str().replace(',', ".").parse().ok()?;

    if (0.0..=MAX_RATING).contains(&value) {
        Some(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_rating() {
        assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
        assert_eq!(parse_rating("3 out of 5"), Some(3.0));
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(parse_rating("4,2 von 5 Sternen"), Some(4.2));
    }

    #[test]
    fn test_arabic_rating() {
        assert_eq!(parse_rating("٤٫٥ من ٥ نجوم"), Some(4.5));
    }

    #[test]
    fn test_rejects_out_of_range_and_garbage() {
        assert_eq!(parse_rating("12 ratings"), None);
        assert_eq!(parse_rating("no rating"), None);
        assert_eq!(parse_rating(""), None);
    }
}
