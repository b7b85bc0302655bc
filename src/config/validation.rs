use crate::config::types::{Config, CrawlerConfig, OcrConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_ocr_config(&config.ocr)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the origin site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;

    if config.listing_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_articles < 1 {
        return Err(ConfigError::Validation(format!(
            "max-articles must be >= 1, got {}",
            config.max_articles
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates OCR service configuration
fn validate_ocr_config(config: &OcrConfig) -> Result<(), ConfigError> {
    validate_http_url("ocr endpoint", &config.endpoint)?;

    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "ocr language cannot be empty".to_string(),
        ));
    }

    if !(1..=3).contains(&config.engine) {
        return Err(ConfigError::Validation(format!(
            "ocr engine must be between 1 and 3, got {}",
            config.engine
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "ocr timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.base_name.is_empty() {
        return Err(ConfigError::Validation(
            "output base-name cannot be empty".to_string(),
        ));
    }

    if config.base_name.contains('/') || config.base_name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "output base-name must be a file name, got '{}'",
            config.base_name
        )));
    }

    if config.extension.is_empty() || !config.extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "output extension must be alphanumeric, got '{}'",
            config.extension
        )));
    }

    Ok(())
}

/// Checks that `value` is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
