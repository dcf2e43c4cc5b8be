use crate::config::types::{
    Config, CrawlConfig, FetchConfig, OutputConfig, PriceConfig, RankingConfig,
};
use crate::ConfigError;
use url::Url;

/// Upper bound for detail-page workers
pub const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    validate_price_config(&config.price)?;
    validate_ranking_config(&config.ranking)?;
    Ok(())
}

/// Validates HTTP session settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if let Some(status) = config
        .retry_statuses
        .iter()
        .find(|s| !(100..=599).contains(*s))
    {
        return Err(ConfigError::Validation(format!(
            "retry_statuses contains invalid HTTP status {}",
            status
        )));
    }

    Ok(())
}

/// Validates crawl defaults
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    validate_language(&config.language)?;
    validate_concurrency(config.concurrency)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates price normalization settings
fn validate_price_config(config: &PriceConfig) -> Result<(), ConfigError> {
    if config.cents_digits > 4 {
        return Err(ConfigError::Validation(format!(
            "cents_digits must be between 0 and 4, got {}",
            config.cents_digits
        )));
    }

    if config.currency_tokens.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "currency_tokens cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

fn validate_ranking_config(config: &RankingConfig) -> Result<(), ConfigError> {
    if config.top_n < 1 {
        return Err(ConfigError::Validation(
            "top_n must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates a two-letter language tag
pub(crate) fn validate_language(language: &str) -> Result<(), ConfigError> {
    if language.len() != 2 || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "language must be a two-letter tag, got '{}'",
            language
        )));
    }
    Ok(())
}

/// Validates a worker pool size
pub(crate) fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if concurrency < 1 || concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, concurrency
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_language() {
        assert!(validate_language("en").is_ok());
        assert!(validate_language("ar").is_ok());

        assert!(validate_language("").is_err());
        assert!(validate_language("eng").is_err());
        assert!(validate_language("e1").is_err());
    }

    #[test]
    fn test_validate_concurrency() {
        assert!(validate_concurrency(1).is_ok());
        assert!(validate_concurrency(100).is_ok());

        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(101).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.crawl.base_url = "ftp://shop.example.com".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.crawl.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_retry_status() {
        let mut config = Config::default();
        config.fetch.retry_statuses = vec![503, 999];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.fetch.max_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_cents_digits_bound() {
        let mut config = Config::default();
        config.price.cents_digits = 5;
        assert!(validate(&config).is_err());
    }
}
