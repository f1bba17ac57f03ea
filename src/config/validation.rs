use crate::config::types::{Config, HttpConfig, ListingConfig, PipelineConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for either worker pool
const MAX_CONCURRENCY: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pipeline_config(&config.pipeline)?;
    validate_http_config(&config.http)?;
    validate_listing_config(&config.listing)?;
    Ok(())
}

/// Validates pool sizes and channel capacity
fn validate_pipeline_config(config: &PipelineConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("page_concurrency", config.page_concurrency),
        ("item_concurrency", config.item_concurrency),
    ] {
        if !(1..=MAX_CONCURRENCY).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 1 and {}, got {}",
                name, MAX_CONCURRENCY, value
            )));
        }
    }

    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "channel_capacity must be >= 1, got {}",
            config.channel_capacity
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if base.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    if config.pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be >= 1, got {}",
            config.pages
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
    fn test_validate_concurrency_bounds() {
        let mut config = PipelineConfig::default();
        config.item_concurrency = 0;
        assert!(validate_pipeline_config(&config).is_err());

        config.item_concurrency = 101;
        assert!(validate_pipeline_config(&config).is_err());

        config.item_concurrency = 100;
        assert!(validate_pipeline_config(&config).is_ok());

        config.channel_capacity = 0;
        assert!(validate_pipeline_config(&config).is_err());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = HttpConfig::default();
        config.base_url = "ftp://www.xvideos.com".to_string();
        assert!(matches!(
            validate_http_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.base_url = "not a url".to_string();
        assert!(validate_http_config(&config).is_err());

        config.base_url = "http://127.0.0.1:8080".to_string();
        assert!(validate_http_config(&config).is_ok());
    }

    #[test]
    fn test_validate_timeouts_and_agent() {
        let mut config = HttpConfig::default();
        config.timeout_secs = 0;
        assert!(validate_http_config(&config).is_err());

        let mut config = HttpConfig::default();
        config.user_agent = "   ".to_string();
        assert!(validate_http_config(&config).is_err());
    }
}
