use crate::config::{validate_concurrency, validate_language, CrawlConfig};
use crate::{Result, ScoutError};
use std::time::Duration;

/// Parameters of one crawl
///
/// Built from the `[crawl]` section and then overridden per call. Validated
/// before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub query: String,
    pub language: String,
    /// Result pages to visit; 0 means until an empty page
    pub pages: u32,
    pub detailed: bool,
    /// Product cap; 0 means unlimited
    pub max_products: usize,
    pub concurrency: usize,
    pub page_delay: Duration,
}

impl CrawlRequest {
    pub fn new(query: impl Into<String>, config: &CrawlConfig) -> Self {
        Self {
            query: query.into(),
            language: config.language.clone(),
            pages: config.pages,
            detailed: config.detailed,
            max_products: config.max_products,
            concurrency: config.concurrency,
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn max_products(mut self, max_products: usize) -> Self {
        self.max_products = max_products;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Checks the request before any fetch happens
    ///
    /// # Errors
    ///
    /// * `ScoutError::Validation` - The query is blank
    /// * `ScoutError::Config` - Language or concurrency out of range
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(ScoutError::Validation(
                "search query cannot be empty".to_string(),
            ));
        }
        validate_language(&self.language)?;
        validate_concurrency(self.concurrency)?;
        Ok(())
    }

    /// Product cap as an option, `None` when unlimited
    pub fn limit(&self) -> Option<usize> {
        (self.max_products > 0).then_some(self.max_products)
    }

    /// How many more products may be collected after `collected`
    pub(crate) fn remaining(&self, collected: usize) -> usize {
        match self.limit() {
            Some(limit) => limit.saturating_sub(collected),
            None => usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CrawlRequest {
        CrawlRequest::new("laptop", &CrawlConfig::default())
    }

    #[test]
    fn test_defaults_from_config() {
        let request = request();
        assert_eq!(request.language, "en");
        assert_eq!(request.pages, 2);
        assert_eq!(request.concurrency, 15);
        assert_eq!(request.limit(), None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_query_rejected() {
        let request = CrawlRequest::new("   ", &CrawlConfig::default());
        assert!(matches!(request.validate(), Err(ScoutError::Validation(_))));
    }

    #[test]
    fn test_bad_language_rejected() {
        assert!(matches!(
            request().language("english").validate(),
            Err(ScoutError::Config(_))
        ));
    }

    #[test]
    fn test_concurrency_bounds() {
        assert!(request().concurrency(0).validate().is_err());
        assert!(request().concurrency(101).validate().is_err());
        assert!(request().concurrency(1).validate().is_ok());
    }

    #[test]
    fn test_remaining() {
        let capped = request().max_products(10);
        assert_eq!(capped.remaining(4), 6);
        assert_eq!(capped.remaining(12), 0);
        assert_eq!(request().remaining(1_000), usize::MAX);
    }
}
