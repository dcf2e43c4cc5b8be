//! End-to-end search: request text in, ranked products out
//!
//! The pipeline keeps no state between calls. Search history is owned by the
//! caller, passed into [`SearchPipeline::run`] and handed back with the new
//! entry at the front.

use crate::config::{Config, CrawlConfig, SearchConfig};
use crate::crawler::{Coordinator, CrawlRequest};
use crate::facets::{FacetExtractor, SearchFacets};
use crate::query::{QueryPreprocessor, SimplePreprocessor};
use crate::ranking::{rank, ScoredProduct};
use crate::records::ProductRecord;
use crate::{Result, ScoutError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// One past search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    /// The request text as typed
    pub query: String,
    pub facets: SearchFacets,
    pub result_count: usize,
}

/// Caller-owned log of searches, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the history with `entry` added at the front
    pub fn with_entry(mut self, entry: HistoryEntry) -> Self {
        self.entries.insert(0, entry);
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub facets: SearchFacets,
    /// Storefront query built from the facets
    pub crawl_query: String,
    /// Every crawled candidate, before filtering
    pub candidates: Vec<ProductRecord>,
    pub results: Vec<ScoredProduct>,
}

/// Preprocess, extract, crawl and rank
pub struct SearchPipeline {
    preprocessor: Arc<dyn QueryPreprocessor>,
    extractor: FacetExtractor,
    coordinator: Coordinator,
    crawl: CrawlConfig,
    search: SearchConfig,
    top_n: usize,
}

impl SearchPipeline {
    /// Creates a pipeline with the keyword preprocessor
    pub fn new(config: &Config, coordinator: Coordinator) -> Self {
        Self {
            preprocessor: Arc::new(SimplePreprocessor),
            extractor: FacetExtractor::new(coordinator.normalizer().clone()),
            coordinator,
            crawl: config.crawl.clone(),
            search: config.search.clone(),
            top_n: config.ranking.top_n,
        }
    }

    /// Replaces the preprocessing step
    pub fn with_preprocessor(mut self, preprocessor: Arc<dyn QueryPreprocessor>) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.search.detailed = detailed;
        self
    }

    /// Extracts facets from request text without any network activity
    pub fn analyze(&self, text: &str) -> SearchFacets {
        let query = self.preprocessor.preprocess(text);
        self.extractor.extract_query(&query)
    }

    /// Runs one search and records it in the history
    ///
    /// # Arguments
    ///
    /// * `text` - The shopping request
    /// * `history` - The caller's history so far
    ///
    /// # Returns
    ///
    /// * `Ok((SearchOutcome, SearchHistory))` - Ranked results and the history
    ///   with this search at the front
    /// * `Err(ScoutError)` - Blank request or an invalid crawl configuration
    pub async fn run(
        &self,
        text: &str,
        history: SearchHistory,
    ) -> Result<(SearchOutcome, SearchHistory)> {
        if text.trim().is_empty() {
            return Err(ScoutError::Validation("search text cannot be empty".to_string()));
        }

        let facets = self.analyze(text);
        let crawl_query = facets.crawl_query();
        tracing::info!(
            product = %facets.product(),
            brand = ?facets.brand(),
            budget = ?facets.budget(),
            "Searching for '{}'",
            crawl_query
        );

        let request = CrawlRequest::new(crawl_query.as_str(), &self.crawl)
            .pages(self.search.pages)
            .max_products(self.search.max_products)
            .detailed(self.search.detailed);
        let candidates = self.coordinator.crawl(&request).await?;

        let outcome = self.rank_candidates(facets, crawl_query, candidates);
        let history = history.with_entry(HistoryEntry {
            at: Utc::now(),
            query: text.trim().to_string(),
            facets: outcome.facets.clone(),
            result_count: outcome.results.len(),
        });

        Ok((outcome, history))
    }

    /// Ranks already collected products against request text
    pub fn rank_saved(&self, text: &str, candidates: Vec<ProductRecord>) -> SearchOutcome {
        let facets = self.analyze(text);
        let crawl_query = facets.crawl_query();
        self.rank_candidates(facets, crawl_query, candidates)
    }

    fn rank_candidates(
        &self,
        facets: SearchFacets,
        crawl_query: String,
        candidates: Vec<ProductRecord>,
    ) -> SearchOutcome {
        let results = rank(candidates.clone(), &facets, self.top_n);
        SearchOutcome {
            facets,
            crawl_query,
            candidates,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::ProductType;
    use crate::parser::AmazonParser;
    use rust_decimal::Decimal;

    fn pipeline() -> SearchPipeline {
        let config = Config::default();
        let coordinator = Coordinator::new(&config, Arc::new(AmazonParser)).unwrap();
        SearchPipeline::new(&config, coordinator)
    }

    fn product(title: &str, price: i64) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            price: Some(Decimal::from(price)),
            ..ProductRecord::default()
        }
    }

    #[test]
    fn test_analyze_arabic_request() {
        let facets = pipeline().analyze("عايز كوتش أسود مقاس 46 تحت 1500");
        assert_eq!(facets.product(), ProductType::Shoes);
        assert_eq!(facets.color(), Some("اسود"));
        assert_eq!(facets.size(), Some(46));
        assert_eq!(facets.budget(), Some(Decimal::from(1500)));
        assert_eq!(facets.price_range().max(), Some(Decimal::from(1500)));
        assert_eq!(facets.lang(), "ar");
    }

    #[test]
    fn test_rank_saved_offline() {
        let outcome = pipeline().rank_saved(
            "shoes under 1500",
            vec![
                product("Running shoes", 1200),
                product("Running shoes", 1600),
                product("Leather belt", 300),
            ],
        );
        assert_eq!(outcome.candidates.len(), 3);
        assert_eq!(outcome.results.len(), 1);
        // the Latin-letter brand fallback picks up the category word
        assert_eq!(outcome.facets.brand(), Some("shoes"));
        assert_eq!(outcome.crawl_query, "shoes shoes");
    }

    #[test]
    fn test_history_newest_first() {
        let entry = |query: &str| HistoryEntry {
            at: Utc::now(),
            query: query.to_string(),
            facets: SearchFacets::default(),
            result_count: 0,
        };
        let history = SearchHistory::new()
            .with_entry(entry("first"))
            .with_entry(entry("second"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().map(|e| e.query.as_str()), Some("second"));
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let result = pipeline().run("  ", SearchHistory::new()).await;
        assert!(matches!(result, Err(ScoutError::Validation(_))));
    }
}
