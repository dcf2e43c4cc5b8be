//! Retry with exponential back-off for page fetches
//!
//! Only throttling, gateway-style statuses and connection-level failures are
//! retried. Everything else (404, a body that fails mid-read, a malformed
//! URL) is returned on the first attempt.

use super::FetchError;
use crate::config::FetchConfig;
use std::future::Future;
use std::time::Duration;

/// Upper bound on a single back-off sleep
const MAX_DELAY_MS: u64 = 30_000;

/// Attempt budget and retry classification for one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_base_ms: config.backoff_base_ms,
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    /// Returns `true` for errors worth another attempt
    pub fn is_retriable(&self, err: &FetchError) -> bool {
        match err {
            FetchError::Status { status, .. } => self.retry_statuses.contains(status),
            FetchError::Network { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            FetchError::Body { .. } | FetchError::InvalidUrl(_) => false,
        }
    }

    /// Sleep before retry number `retry` (1-based)
    ///
    /// | Retry | Delay with the default 300 ms base |
    /// |-------|------------------------------------|
    /// | 1     | 300 ms                             |
    /// | 2     | 600 ms                             |
    /// | 3     | 1 200 ms                           |
    pub fn delay_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(10);
        let computed = self.backoff_base_ms.saturating_mul(1u64 << shift);
        Duration::from_millis(computed.min(MAX_DELAY_MS))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the policy's
/// attempts are used up
///
/// # Arguments
///
/// * `policy` - Attempt budget and retry classification
/// * `operation` - Produces a fresh future for each attempt
///
/// # Returns
///
/// The first success, or the last error seen
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !policy.is_retriable(&err) || attempt >= policy.max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient fetch error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
