//! Fixed word lists used by facet extraction and ranking
//!
//! Arabic entries are written in the normalized form produced by the query
//! preprocessor (bare alef, final `ه` for taa marbuta, dotless `ي`).

use super::types::ProductType;

/// Colors recognized in requests, Arabic and English
pub const COLORS: &[&str] = &[
    "اسود", "ابيض", "احمر", "ازرق", "اخضر", "رمادي", "بني", "اصفر", "فضي", "ذهبي", "وردي",
    "black", "white", "red", "blue", "green", "gray", "grey", "brown", "yellow", "silver", "gold",
    "pink",
];

/// Arabic brand names and their canonical Latin ids
pub const AR_BRANDS: &[(&str, &str)] = &[
    ("سامسونج", "samsung"),
    ("شاومي", "xiaomi"),
    ("ايفون", "iphone"),
    ("ابل", "apple"),
    ("هواوي", "huawei"),
    ("انفينكس", "infinix"),
    ("ريلمي", "realme"),
    ("نوكيا", "nokia"),
    ("تكنو", "tecno"),
    ("اوبو", "oppo"),
];

/// Request keywords that identify each category
pub fn product_keywords(product: ProductType) -> &'static [&'static str] {
    match product {
        ProductType::Shoes => &[
            "كوتش", "حذاء", "جزمه", "shoes", "shoe", "sneaker", "sneakers",
        ],
        ProductType::Laptop => &[
            "لاب", "لابتوب", "حاسوب", "كمبيوتر", "notebook", "laptop", "pc",
        ],
        ProductType::Phone => &[
            "موبايل", "جوال", "هاتف", "iphone", "ايفون", "samsung", "سامسونج", "phone",
        ],
        ProductType::Watch => &["ساعه", "watch", "smartwatch"],
        ProductType::Tshirt => &["تيشيرت", "قميص", "tshirt", "t-shirt", "shirt"],
        ProductType::Unknown => &[],
    }
}

/// Phone model lines that mark a listing title as a handset
pub const PHONE_TITLE_KEYWORDS: &[&str] = &[
    "galaxy", "iphone", "redmi", "note", "infinix", "tecno", "vivo", "realme", "poco", "pixel",
    "nokia",
];

/// Accessory words that disqualify a title from the phone category
pub const PHONE_ACCESSORY_EXCLUSIONS: &[&str] = &[
    "buds", "earbuds", "airpods", "headphone", "earphone", "earbud",
];

/// Looks up the canonical Latin id of an Arabic brand name
pub fn arabic_brand(token: &str) -> Option<&'static str> {
    AR_BRANDS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, id)| *id)
}

/// Finds the first category whose keyword list contains `token`
pub fn product_for_token(token: &str) -> Option<ProductType> {
    ProductType::KNOWN
        .into_iter()
        .find(|product| product_keywords(*product).contains(&token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arabic_brand_lookup() {
        assert_eq!(arabic_brand("سامسونج"), Some("samsung"));
        assert_eq!(arabic_brand("samsung"), None);
    }

    #[test]
    fn test_product_for_token() {
        assert_eq!(product_for_token("sneakers"), Some(ProductType::Shoes));
        assert_eq!(product_for_token("كوتش"), Some(ProductType::Shoes));
        assert_eq!(product_for_token("samsung"), Some(ProductType::Phone));
        assert_eq!(product_for_token("table"), None);
    }

    #[test]
    fn test_unknown_has_no_keywords() {
        assert!(product_keywords(ProductType::Unknown).is_empty());
    }
}
