//! Configuration module for Souq-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so an empty file (or no file at all) yields the
//! defaults.
//!
//! # Example
//!
//! ```no_run
//! use souq_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("souq-scout.toml")).unwrap();
//! println!("Crawling {} pages", config.crawl.pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, FetchConfig, OutputConfig, PriceConfig, RankingConfig, SearchConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_CONCURRENCY};

pub(crate) use validation::{validate_concurrency, validate_language};
