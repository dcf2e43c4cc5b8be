//! Souq-Scout: a shopping discovery pipeline
//!
//! This crate turns a free-text shopping request into a ranked list of
//! purchasable products. It extracts search facets from the request, crawls a
//! paginated e-commerce search with bounded concurrency, normalizes and merges
//! listing and detail data, and ranks the candidates against the facets.

pub mod config;
pub mod crawler;
pub mod facets;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod price;
pub mod query;
pub mod ranking;
pub mod records;

use thiserror::Error;

/// Main error type for Souq-Scout operations
///
/// Only configuration, validation and sink errors surface through this type.
/// Per-item fetch and parse failures are logged and degrade the data instead.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl request: {0}")]
    Validation(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Souq-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_to_csv, Coordinator, CrawlRequest};
pub use facets::{FacetExtractor, ProductType, SearchFacets};
pub use price::PriceNormalizer;
pub use ranking::{rank, ScoredProduct};
pub use records::{DetailRecord, ListingRecord, ProductRecord};
