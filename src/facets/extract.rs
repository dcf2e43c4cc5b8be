use super::lexicon::{arabic_brand, product_for_token, COLORS};
use super::text::{extract_features, extract_price_range};
use super::types::{Intent, ProductType, SearchFacets};
use crate::price::{fold_digits, PriceNormalizer};
use crate::query::PreprocessedQuery;
use rust_decimal::Decimal;

/// Numbers up to this value are read as sizes, larger ones as budgets
pub const SIZE_BUDGET_SPLIT: u64 = 70;

/// Turns preprocessed requests into [`SearchFacets`]
///
/// Extraction never fails: whatever cannot be inferred stays absent.
#[derive(Debug, Clone, Default)]
pub struct FacetExtractor {
    normalizer: PriceNormalizer,
}

impl FacetExtractor {
    pub fn new(normalizer: PriceNormalizer) -> Self {
        Self { normalizer }
    }

    /// Extracts facets from tokens alone
    ///
    /// # Rules
    ///
    /// Tokens are scanned in order and the first match wins per field:
    ///
    /// | Field   | Rule |
    /// |---------|------|
    /// | color   | token is in the color lexicon |
    /// | size    | all-digit token with value <= 70 |
    /// | budget  | all-digit token with value > 70 |
    /// | brand   | known Arabic brand (translated), else any token with a Latin letter |
    /// | product | token is a keyword of a category |
    ///
    /// The Latin-letter brand fallback is permissive: in "black shoes" the
    /// brand becomes "black".
    ///
    /// # Example
    ///
    /// ```
    /// use souq_scout::facets::FacetExtractor;
    ///
    /// let facets = FacetExtractor::default().extract(&["70"], "en");
    /// assert_eq!(facets.size(), Some(70));
    /// ```
    pub fn extract<S: AsRef<str>>(&self, tokens: &[S], lang: &str) -> SearchFacets {
        let mut product: Option<ProductType> = None;
        let mut color: Option<String> = None;
        let mut size: Option<u32> = None;
        let mut budget: Option<Decimal> = None;
        let mut brand: Option<String> = None;

        for raw in tokens {
            let token = fold_digits(raw.as_ref().trim()).to_lowercase();
            if token.is_empty() {
                continue;
            }

            if color.is_none() && COLORS.contains(&token.as_str()) {
                color = Some(token.clone());
            }

            if token.chars().all(|c| c.is_ascii_digit()) {
                match token.parse::<u64>() {
                    Ok(n) if n <= SIZE_BUDGET_SPLIT => {
                        if size.is_none() {
                            size = u32::try_from(n).ok();
                        }
                    }
                    Ok(_) => {
                        if budget.is_none() {
                            budget = self.normalizer.normalize(&token);
                        }
                    }
                    // longer than u64; only a budget could be that large
                    Err(_) => {
                        if budget.is_none() {
                            budget = self.normalizer.normalize(&token);
                        }
                    }
                }
            }

            if brand.is_none() {
                if let Some(id) = arabic_brand(&token) {
                    brand = Some(id.to_string());
                } else if token.chars().any(|c| c.is_ascii_alphabetic()) {
                    brand = Some(token.clone());
                }
            }

            if product.is_none() {
                product = product_for_token(&token);
            }
        }

        let mut builder = SearchFacets::builder()
            .lang(lang)
            .product(product.unwrap_or_default());
        if let Some(color) = color {
            builder = builder.color(color);
        }
        if let Some(size) = size {
            builder = builder.size(size);
        }
        if let Some(budget) = budget {
            builder = builder.budget(budget);
        }
        if let Some(brand) = brand {
            builder = builder.brand(brand);
        }

        let facets = builder.build();
        tracing::debug!(
            product = %facets.product(),
            brand = ?facets.brand(),
            budget = ?facets.budget(),
            "Extracted token facets"
        );
        facets
    }

    /// Extracts facets from a full preprocessed request
    ///
    /// Adds the richer path on top of [`FacetExtractor::extract`]: intents
    /// from the preprocessor, and features and the price band from the raw
    /// text.
    pub fn extract_query(&self, query: &PreprocessedQuery) -> SearchFacets {
        let base = self.extract(&query.tokens, &query.lang);

        let range = extract_price_range(&query.raw);
        let min = range.min.as_deref().and_then(|m| self.normalizer.normalize(m));
        let max = range.max.as_deref().and_then(|m| self.normalizer.normalize(m));

        let mut builder = SearchFacets::builder()
            .lang(base.lang())
            .product(base.product())
            .price_range(min, max)
            .intents(query.intents.iter().copied());

        if let Some(color) = base.color() {
            builder = builder.color(color);
        }
        if let Some(size) = base.size() {
            builder = builder.size(size);
        }
        if let Some(budget) = base.budget() {
            builder = builder.budget(budget);
        }
        if let Some(brand) = base.brand() {
            builder = builder.brand(brand);
        }
        for (feature, value) in extract_features(&query.raw) {
            builder = builder.feature(feature, value);
        }

        builder.build()
    }

    /// Extracts facets from tokens plus named intents
    ///
    /// Intent names the crate does not score are ignored.
    pub fn extract_with_intents<S: AsRef<str>>(
        &self,
        tokens: &[S],
        lang: &str,
        intents: &[&str],
    ) -> SearchFacets {
        let query = PreprocessedQuery {
            raw: String::new(),
            tokens: tokens.iter().map(|t| t.as_ref().to_string()).collect(),
            lang: lang.to_string(),
            intents: intents
                .iter()
                .filter_map(|name| match name.parse::<Intent>() {
                    Ok(intent) => Some(intent),
                    Err(e) => {
                        tracing::debug!("{}", e);
                        None
                    }
                })
                .collect(),
        };
        self.extract_query(&query)
    }
}
