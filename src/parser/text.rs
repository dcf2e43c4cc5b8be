use scraper::ElementRef;
use url::Url;

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of an element with its text nodes separated by spaces
///
/// Script and style contents are skipped.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let pieces: Vec<&str> = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if matches!(parent.value().name(), "script" | "style") {
                None
            } else {
                Some(&**text)
            }
        })
        .collect();
    clean_text(&pieces.join(" "))
}

/// Text of an element with its text nodes concatenated as-is
///
/// Used for prices, where `1,299<span>.</span>` must stay `1,299.`.
pub(crate) fn inline_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Strips direction marks and separators around a product detail key or value
pub(crate) fn clean_field(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '\u{200e}' | '\u{200f}' | '\u{202a}'..='\u{202e}'))
        .collect();
    clean_text(&cleaned)
        .trim_end_matches(':')
        .trim()
        .to_string()
}

/// Resolves a link href against the storefront origin
///
/// Returns `None` for empty hrefs, fragment-only links, non-navigational
/// schemes, and anything that does not resolve to http(s).
pub fn resolve_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base.join(href) {
        Ok(absolute) if matches!(absolute.scheme(), "http" | "https") => Some(absolute.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn base() -> Url {
        Url::parse("https://shop.example").unwrap()
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Nike \n  Air\tMax  "), "Nike Air Max");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_element_text_skips_scripts() {
        let html = Html::parse_fragment("<div>Hello<script>var x = 1;</script> <b>world</b></div>");
        let selector = Selector::parse("div").unwrap();
        let div = html.select(&selector).next().unwrap();
        assert_eq!(element_text(div), "Hello world");
    }

    #[test]
    fn test_inline_text_keeps_decimal_point() {
        let html = Html::parse_fragment(
            r#"<span class="w">1,299<span class="d">.</span></span>"#,
        );
        let selector = Selector::parse("span.w").unwrap();
        let span = html.select(&selector).next().unwrap();
        assert_eq!(inline_text(span), "1,299.");
    }

    #[test]
    fn test_clean_field() {
        assert_eq!(clean_field("Brand \u{200f}:\u{200e} "), "Brand");
        assert_eq!(clean_field("  Model Number : "), "Model Number");
    }

    #[test]
    fn test_resolve_relative_link() {
        assert_eq!(
            resolve_link("/dp/B0TEST?ref=sr_1", &base()),
            Some("https://shop.example/dp/B0TEST?ref=sr_1".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_link() {
        assert_eq!(
            resolve_link("https://other.example/item", &base()),
            Some("https://other.example/item".to_string())
        );
    }

    #[test]
    fn test_skip_special_links() {
        assert_eq!(resolve_link("javascript:void(0)", &base()), None);
        assert_eq!(resolve_link("#reviews", &base()), None);
        assert_eq!(resolve_link("   ", &base()), None);
    }
}
