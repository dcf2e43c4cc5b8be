use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Closed set of product categories the extractor recognizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Shoes,
    Laptop,
    Phone,
    Watch,
    Tshirt,
    #[default]
    Unknown,
}

impl ProductType {
    /// Every recognized category, in keyword-table order
    pub const KNOWN: [ProductType; 5] = [
        ProductType::Shoes,
        ProductType::Laptop,
        ProductType::Phone,
        ProductType::Watch,
        ProductType::Tshirt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shoes => "shoes",
            Self::Laptop => "laptop",
            Self::Phone => "phone",
            Self::Watch => "watch",
            Self::Tshirt => "tshirt",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for every category except `Unknown`
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product attributes pulled out of free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Ram,
    Storage,
    Network,
    Display,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Network => "network",
            Self::Display => "display",
        }
    }
}

/// Coarse user goals that change scoring weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Cheap,
    Quality,
    AroundPrice,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cheap => "cheap",
            Self::Quality => "quality",
            Self::AroundPrice => "around_price",
        }
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cheap" => Ok(Self::Cheap),
            "quality" => Ok(Self::Quality),
            "around_price" => Ok(Self::AroundPrice),
            other => Err(format!("unknown intent '{}'", other)),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soft price band used for scoring
///
/// An inverted band (`min > max`) is treated as unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl PriceRange {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => {
                tracing::debug!("Ignoring inverted price range {}..{}", lo, hi);
                Self::default()
            }
            _ => Self { min, max },
        }
    }

    pub fn min(&self) -> Option<Decimal> {
        self.min
    }

    pub fn max(&self) -> Option<Decimal> {
        self.max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Structured search facets extracted from one shopping request
///
/// Built once per query through [`SearchFacetsBuilder`] and immutable
/// afterwards. Every field is optional; an empty request yields
/// `SearchFacets::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFacets {
    lang: String,
    product: ProductType,
    color: Option<String>,
    size: Option<u32>,
    budget: Option<Decimal>,
    brand: Option<String>,
    price_range: PriceRange,
    features: BTreeMap<Feature, String>,
    intents: BTreeSet<Intent>,
}

impl SearchFacets {
    pub fn builder() -> SearchFacetsBuilder {
        SearchFacetsBuilder::default()
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn product(&self) -> ProductType {
        self.product
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    /// Hard price ceiling
    pub fn budget(&self) -> Option<Decimal> {
        self.budget
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    pub fn features(&self) -> &BTreeMap<Feature, String> {
        &self.features
    }

    pub fn intents(&self) -> &BTreeSet<Intent> {
        &self.intents
    }

    pub fn has_intent(&self, intent: Intent) -> bool {
        self.intents.contains(&intent)
    }

    /// Builds the storefront search query from the facets
    ///
    /// Brand, product, color and size are joined in that order; a request
    /// with none of them searches for `"best deals"`.
    pub fn crawl_query(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(brand) = &self.brand {
            parts.push(brand.clone());
        }
        if self.product.is_known() {
            parts.push(self.product.as_str().to_string());
        }
        if let Some(color) = &self.color {
            parts.push(color.clone());
        }
        if let Some(size) = self.size {
            parts.push(size.to_string());
        }

        let query = parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if query.is_empty() {
            "best deals".to_string()
        } else {
            query
        }
    }
}

/// Builder for [`SearchFacets`]
#[derive(Debug, Clone, Default)]
pub struct SearchFacetsBuilder {
    inner: SearchFacets,
}

impl SearchFacetsBuilder {
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.inner.lang = lang.into();
        self
    }

    pub fn product(mut self, product: ProductType) -> Self {
        self.inner.product = product;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.inner.color = Some(color.into());
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.inner.size = Some(size);
        self
    }

    pub fn budget(mut self, budget: Decimal) -> Self {
        self.inner.budget = Some(budget);
        self
    }

    /// Brands are matched against lower-cased titles, so they are stored lower-cased
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        let brand = brand.into().trim().to_lowercase();
        self.inner.brand = if brand.is_empty() { None } else { Some(brand) };
        self
    }

    pub fn price_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.inner.price_range = PriceRange::new(min, max);
        self
    }

    pub fn feature(mut self, feature: Feature, value: impl Into<String>) -> Self {
        self.inner.features.insert(feature, value.into());
        self
    }

    pub fn intent(mut self, intent: Intent) -> Self {
        self.inner.intents.insert(intent);
        self
    }

    pub fn intents<I: IntoIterator<Item = Intent>>(mut self, intents: I) -> Self {
        self.inner.intents.extend(intents);
        self
    }

    pub fn build(self) -> SearchFacets {
        self.inner
    }
}
