//! HTTP fetching for search and detail pages
//!
//! One [`FetchClient`] is built per crawl session and cloned into every
//! worker; clones share the same connection pool.

mod client;
mod retry;

pub use client::FetchClient;
pub use retry::{retry_with_backoff, RetryPolicy};

use thiserror::Error;

/// Why a page could not be fetched
///
/// Fetch errors never abort a crawl on their own: a failed search page ends
/// pagination and a failed detail page degrades one record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
