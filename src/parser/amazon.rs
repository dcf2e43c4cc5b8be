//! Parser for Amazon storefront pages
//!
//! Selectors follow the search-results and product-page markup of the
//! regional Amazon storefronts (amazon.eg, amazon.sa, amazon.ae). Missing
//! elements leave the matching field empty.

use super::text::{clean_field, clean_text, element_text, inline_text, resolve_link};
use super::PageParser;
use crate::records::{DetailRecord, ListingRecord};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

const RESULT_ITEM: &str = r#"div[data-component-type="s-search-result"]"#;
const DETAIL_LINK: &str = "h2 a, a.a-link-normal.s-no-outline";

/// Price blocks on a product page, in order of preference
const DETAIL_PRICE_SELECTORS: [&str; 3] = [
    "#priceblock_ourprice",
    "#priceblock_dealprice",
    ".a-price .a-offscreen",
];

/// Description containers, in order of preference
const DESCRIPTION_SELECTORS: [&str; 3] = [
    "#productDescription_feature_div #productDescription",
    "#productDescription",
    "#productDescription_feature_div",
];

const FEATURE_BULLETS: &str = "#feature-bullets ul li, #feature-bullets .a-list-item";
const DETAIL_BULLETS: &str = "#detailBullets_feature_div li, #detailBullets_feature_div .a-list-item";

/// Parser for Amazon search-results and product pages
#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonParser;

impl AmazonParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for AmazonParser {
    fn parse_listings(&self, body: &str, base: &Url) -> Vec<ListingRecord> {
        let document = Html::parse_document(body);
        let Some(item_selector) = selector(RESULT_ITEM) else {
            return Vec::new();
        };

        document
            .select(&item_selector)
            .map(|item| parse_result_item(item, base))
            .collect()
    }

    fn parse_detail(&self, body: &str) -> DetailRecord {
        let document = Html::parse_document(body);

        let title = first_match(&document, "#productTitle, h1 span")
            .map(element_text)
            .unwrap_or_default();

        let raw_price = DETAIL_PRICE_SELECTORS
            .iter()
            .filter_map(|sel| first_match(&document, sel))
            .map(element_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        let raw_rating = first_match(&document, "span.a-icon-alt, #acrPopover .a-icon-alt")
            .map(element_text)
            .unwrap_or_default();

        DetailRecord {
            title,
            raw_price,
            raw_rating,
            description: extract_description(&document),
            image_url: extract_primary_image(&document),
            specs: extract_specs(&document),
        }
    }
}

/// Parses one search result card
fn parse_result_item(item: ElementRef<'_>, base: &Url) -> ListingRecord {
    let id = item.value().attr("data-asin").unwrap_or_default().to_string();

    let title = select_in(item, "h2").map(element_text).unwrap_or_default();

    let raw_price = match select_in(item, "span.a-price-whole") {
        Some(whole) => {
            let fraction = select_in(item, "span.a-price-fraction")
                .map(inline_text)
                .unwrap_or_default();
            let symbol = select_in(item, "span.a-price-symbol")
                .map(inline_text)
                .unwrap_or_default();
            format!("{}{} {}", inline_text(whole), fraction, symbol)
                .trim()
                .to_string()
        }
        None => select_in(item, "span.a-price")
            .map(element_text)
            .unwrap_or_default(),
    };

    let raw_rating = select_in(item, "span.a-icon-alt")
        .map(element_text)
        .unwrap_or_default();

    let image_url = select_in(item, "img.s-image")
        .and_then(|img| first_attr(img, &["src", "data-src"]))
        .unwrap_or_default();

    let detail_link = select_in(item, DETAIL_LINK)
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(href, base));

    ListingRecord {
        id,
        title,
        raw_price,
        raw_rating,
        image_url,
        detail_link,
    }
}

/// Finds the first non-empty description source
///
/// Tries the description block (its list items, else its text), then the
/// feature bullets, then the detail bullets, then the meta description.
fn extract_description(document: &Html) -> String {
    for sel in DESCRIPTION_SELECTORS {
        if let Some(node) = first_match(document, sel) {
            let items = list_texts_in(node, "ul li");
            if !items.is_empty() {
                return items.join(" | ");
            }
            let text = element_text(node);
            if !text.is_empty() {
                return text;
            }
        }
    }

    for sel in [FEATURE_BULLETS, DETAIL_BULLETS] {
        let items = list_texts(document, sel);
        if !items.is_empty() {
            return items.join(" | ");
        }
    }

    first_match(document, r#"meta[name="description"]"#)
        .and_then(|meta| meta.value().attr("content"))
        .map(clean_text)
        .unwrap_or_default()
}

/// Collects product specifications from every known table and bullet layout
///
/// The first value seen for a key wins.
fn extract_specs(document: &Html) -> BTreeMap<String, String> {
    let mut specs = BTreeMap::new();

    for sel in [
        "#productDetails_techSpec_section_1",
        "#productDetails_techSpec_section_2",
    ] {
        if let Some(section) = first_match(document, sel) {
            parse_table(table_of(section).unwrap_or(section), &mut specs);
        }
    }

    for sel in [
        "#productDetails_detailBullets_sections1",
        "#prodDetails, #productDetails_feature_div, #productDetails_techSpec_section_1",
    ] {
        if let Some(section) = first_match(document, sel) {
            match table_of(section) {
                Some(table) => parse_table(table, &mut specs),
                None => parse_rows(section, &mut specs),
            }
        }
    }

    if let Some(bullets) = selector(DETAIL_BULLETS) {
        for li in document.select(&bullets) {
            insert_key_value(&element_text(li), &mut specs);
        }
    }

    specs
}

/// Reads `th`/`td` or `td`/`td` rows
fn parse_table(table: ElementRef<'_>, specs: &mut BTreeMap<String, String>) {
    let (Some(rows), Some(th), Some(td)) = (selector("tr"), selector("th"), selector("td")) else {
        return;
    };

    for row in table.select(&rows) {
        let header = row.select(&th).next();
        let cells: Vec<ElementRef<'_>> = row.select(&td).collect();

        let (key, value) = match (header, cells.as_slice()) {
            (Some(h), [first, ..]) => (element_text(h), element_text(*first)),
            (None, [first, second, ..]) => (element_text(*first), element_text(*second)),
            _ => continue,
        };

        let key = clean_field(&key);
        if !key.is_empty() {
            specs.entry(key).or_insert_with(|| clean_field(&value));
        }
    }
}

/// Reads rows laid out as bold label plus text, or as `key: value` text
fn parse_rows(container: ElementRef<'_>, specs: &mut BTreeMap<String, String>) {
    let (Some(rows), Some(bold)) = (
        selector("li, tr, div"),
        selector("b.a-text-bold, th.a-text-bold, span.a-text-bold"),
    ) else {
        return;
    };

    for row in container.select(&rows) {
        let text = element_text(row);

        if let Some(label) = row.select(&bold).next() {
            let label_text = element_text(label);
            let key = clean_field(&label_text);
            if !key.is_empty() {
                let value = text.strip_prefix(label_text.as_str()).unwrap_or(&text);
                specs.entry(key).or_insert_with(|| clean_field(value));
                continue;
            }
        }

        insert_key_value(&text, specs);
    }
}

fn insert_key_value(text: &str, specs: &mut BTreeMap<String, String>) {
    if let Some((key, value)) = text.split_once(':') {
        let key = clean_field(key);
        if !key.is_empty() {
            specs.entry(key).or_insert_with(|| clean_field(value));
        }
    }
}

/// Picks the main product image URL
fn extract_primary_image(document: &Html) -> String {
    let Some(node) = first_match(
        document,
        r#"img#landingImage, img.a-dynamic-image, meta[property="og:image"]"#,
    ) else {
        return String::new();
    };

    if node.value().name() == "meta" {
        return node.value().attr("content").unwrap_or_default().to_string();
    }

    first_attr(node, &["src", "data-old-hires", "data-a-dynamic-image"]).unwrap_or_default()
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    document.select(&sel).next()
}

fn select_in<'a>(element: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    element.select(&sel).next()
}

/// The element itself when it is a table, else its first descendant table
fn table_of(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if element.value().name() == "table" {
        return Some(element);
    }
    select_in(element, "table")
}

fn first_attr(element: ElementRef<'_>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn list_texts(document: &Html, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    distinct_texts(document.select(&sel))
}

fn list_texts_in(element: ElementRef<'_>, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    distinct_texts(element.select(&sel))
}

/// Non-empty texts of the elements, dropping a text equal to the one before
///
/// List selectors match both an `li` and the `.a-list-item` span inside it.
fn distinct_texts<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> Vec<String> {
    let mut texts: Vec<String> = Vec::new();
    for text in elements.map(element_text) {
        if !text.is_empty() && texts.last() != Some(&text) {
            texts.push(text);
        }
    }
    texts
}
