use super::retry::{retry_with_backoff, RetryPolicy};
use super::FetchError;
use crate::config::FetchConfig;
use crate::{Result, ScoutError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Pooled HTTP session shared by every fetch of a crawl
///
/// Cloning is cheap and every clone uses the same connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    policy: RetryPolicy,
    /// Idle connections kept per host
    pool_size: usize,
}

impl FetchClient {
    /// Builds a client sized for `concurrency` parallel detail fetches
    ///
    /// # Arguments
    ///
    /// * `config` - Headers, timeouts and retry settings
    /// * `concurrency` - Number of parallel workers sharing the pool
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Successfully built client
    /// * `Err(ScoutError)` - A header value is not valid, or the TLS backend
    ///   failed to initialize
    pub fn new(config: &FetchConfig, concurrency: usize) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, header_value("accept-language", &config.accept_language)?);
        headers.insert(ACCEPT, header_value("accept", &config.accept)?);

        let pool_size = concurrency.saturating_add(config.pool_headroom);
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(pool_size)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::from_config(config),
            pool_size,
        })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches one page and returns its body
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 200 | Return body |
    /// | Configured retry status (429, 5xx gateway) | Retry with back-off |
    /// | Timeout / connection failure | Retry with back-off |
    /// | Any other status | Fail immediately |
    /// | Body read failure | Fail immediately |
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute http(s) URL
    pub async fn fetch_page(&self, url: &str) -> std::result::Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        retry_with_backoff(&self.policy, || self.fetch_once(&parsed)).await
    }

    async fn fetch_once(&self, url: &Url) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ScoutError::Validation(format!("invalid {} header value '{}'", name, value)))
}
