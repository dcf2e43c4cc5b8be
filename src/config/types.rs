use serde::Deserialize;

/// Browser user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

/// Main configuration structure for Souq-Scout
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub price: PriceConfig,
    pub ranking: RankingConfig,
    pub search: SearchConfig,
}

/// HTTP session configuration shared by every fetch in a crawl
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Browser-like user agent string
    pub user_agent: String,

    /// Value of the Accept-Language header
    pub accept_language: String,

    /// Value of the Accept header
    pub accept: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Total attempts per GET, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry; doubled for each further retry
    pub backoff_base_ms: u64,

    /// HTTP statuses that are worth retrying
    pub retry_statuses: Vec<u16>,

    /// Idle connections kept per host beyond the crawl concurrency
    pub pool_headroom: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            timeout_secs: 20,
            connect_timeout_secs: 10,
            max_attempts: 3,
            backoff_base_ms: 300,
            retry_statuses: vec![429, 500, 502, 503, 504],
            pool_headroom: 5,
        }
    }
}

/// Crawl behavior defaults, overridable per request
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Storefront origin; search pages live under `/s`
    pub base_url: String,

    /// Two-letter language tag passed to the storefront
    pub language: String,

    /// Number of result pages to visit (0 = until an empty page)
    pub pages: u32,

    /// Pause between consecutive result pages (milliseconds)
    pub page_delay_ms: u64,

    /// Visit every product page for description and specs
    pub detailed: bool,

    /// Stop after this many products (0 = no limit)
    pub max_products: usize,

    /// Number of detail pages fetched in parallel
    pub concurrency: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.amazon.eg".to_string(),
            language: "en".to_string(),
            pages: 2,
            page_delay_ms: 500,
            detailed: false,
            max_products: 0,
            concurrency: 15,
        }
    }
}

/// Result file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV result file
    pub path: String,

    /// Append to an existing file instead of overwriting it
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "amazon_products.csv".to_string(),
            append: true,
        }
    }
}

/// Price normalization configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PriceConfig {
    /// Currency words and symbols stripped before parsing
    pub currency_tokens: Vec<String>,

    /// Number of fractional digits in the storefront currency
    pub cents_digits: u32,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            currency_tokens: ["EGP", "ج.م", "جنيه", "LE", "USD", "US$", "$", "£", "€"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
            cents_digits: 2,
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RankingConfig {
    /// Number of ranked products returned
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

/// Limits used by the end-to-end search pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchConfig {
    /// Result pages crawled per search
    pub pages: u32,

    /// Candidates collected per search
    pub max_products: usize,

    /// Enrich candidates from their product pages
    pub detailed: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pages: 1,
            max_products: 30,
            detailed: false,
        }
    }
}
