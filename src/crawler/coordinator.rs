//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that drives a crawl:
//! - Building search URLs for each results page
//! - Fetching and parsing results pages in order
//! - Handing listings to the enrichment pool when details are wanted
//! - Enforcing the page limit, the product cap and the empty-page stop

use super::enrich::{enrich_page, EnrichContext};
use super::request::CrawlRequest;
use crate::config::{Config, FetchConfig};
use crate::fetch::FetchClient;
use crate::parser::PageParser;
use crate::price::PriceNormalizer;
use crate::records::{merge, ProductRecord};
use crate::{ConfigError, Result};
use std::sync::Arc;
use url::Url;

/// Hard ceiling on result pages, applied even when the page limit is 0
pub const MAX_PAGES: u32 = 200;

/// Main crawl coordinator
///
/// Owns the pooled HTTP client for a crawl session. One coordinator can run
/// several crawls one after another; each reuses the same connection pool.
pub struct Coordinator {
    base_url: Url,
    client: FetchClient,
    fetch: FetchConfig,
    parser: Arc<dyn PageParser>,
    normalizer: PriceNormalizer,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `parser` - Storefront page parser
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScoutError)` - Invalid base URL or HTTP client setup failure
    pub fn new(config: &Config, parser: Arc<dyn PageParser>) -> Result<Self> {
        let base_url = Url::parse(&config.crawl.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.crawl.base_url, e)))?;
        let client = FetchClient::new(&config.fetch, config.crawl.concurrency)?;

        Ok(Self {
            base_url,
            client,
            fetch: config.fetch.clone(),
            parser,
            normalizer: PriceNormalizer::new(&config.price),
        })
    }

    pub fn normalizer(&self) -> &PriceNormalizer {
        &self.normalizer
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns a client whose pool covers the request's concurrency
    ///
    /// The shared client is reused unless the request asks for more workers
    /// than it was sized for; then a larger client serves this crawl.
    pub fn client_for(&self, request: &CrawlRequest) -> Result<FetchClient> {
        let needed = request.concurrency.saturating_add(self.fetch.pool_headroom);
        if needed <= self.client.pool_size() {
            return Ok(self.client.clone());
        }

        tracing::debug!(
            "Resizing connection pool from {} to {} for this crawl",
            self.client.pool_size(),
            needed
        );
        FetchClient::new(&self.fetch, request.concurrency)
    }

    /// Builds the URL of one search-results page
    ///
    /// `{base}/s?k={query}&language={language}&page={page}`
    pub fn search_url(&self, query: &str, language: &str, page: u32) -> Result<Url> {
        let mut url = self.base_url.join("/s")?;
        url.query_pairs_mut()
            .append_pair("k", query)
            .append_pair("language", language)
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Runs one crawl and returns its products in arrival order
    ///
    /// # Crawl Flow
    ///
    /// 1. Validate the request (nothing is fetched for an invalid request)
    /// 2. For each page, in order:
    ///    a. Wait the page delay (not before the first page)
    ///    b. Fetch the results page; a failure ends pagination
    ///    c. Parse listings; an empty page ends pagination
    ///    d. Merge listings directly, or enrich them through the worker pool
    ///    e. Stop once the product cap is reached
    /// 3. Stop at the page limit, or at `MAX_PAGES` when unlimited
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ProductRecord>)` - Products collected before pagination ended
    /// * `Err(ScoutError)` - The request failed validation
    pub async fn crawl(&self, request: &CrawlRequest) -> Result<Vec<ProductRecord>> {
        request.validate()?;

        tracing::info!(
            "Starting crawl for '{}' (pages={}, detailed={}, max_products={})",
            request.query,
            request.pages,
            request.detailed,
            request.max_products
        );

        let client = self.client_for(request)?;
        let ctx = EnrichContext {
            client: client.clone(),
            parser: Arc::clone(&self.parser),
            normalizer: self.normalizer.clone(),
            query: Arc::from(request.query.as_str()),
        };

        let mut products: Vec<ProductRecord> = Vec::new();
        let mut page: u32 = 1;

        loop {
            if request.pages > 0 && page > request.pages {
                break;
            }
            if page > MAX_PAGES {
                tracing::warn!("Reached the {} page ceiling; stopping", MAX_PAGES);
                break;
            }

            if page > 1 && !request.page_delay.is_zero() {
                tokio::time::sleep(request.page_delay).await;
            }

            let url = self.search_url(&request.query, &request.language, page)?;
            tracing::info!("[page {}] Fetching search page: {}", page, url);

            let body = match client.fetch_page(url.as_str()).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Failed to retrieve page {}: {}. Stopping.", page, e);
                    break;
                }
            };

            let listings = self.parser.parse_listings(&body, &self.base_url);
            if listings.is_empty() {
                tracing::info!("No items found on page {}. Stopping pagination.", page);
                break;
            }
            tracing::debug!("Parsed {} listings from page {}", listings.len(), page);

            let remaining = request.remaining(products.len());
            let page_products = if request.detailed {
                enrich_page(&ctx, listings, request.concurrency, remaining).await
            } else {
                listings
                    .into_iter()
                    .take(remaining)
                    .map(|listing| merge(listing, None, &self.normalizer, &request.query))
                    .collect()
            };
            products.extend(page_products);

            if request.remaining(products.len()) == 0 {
                tracing::info!("Reached max-products limit; stopping.");
                break;
            }

            page += 1;
        }

        tracing::info!(
            "Crawl for '{}' finished with {} products",
            request.query,
            products.len()
        );
        Ok(products)
    }
}
