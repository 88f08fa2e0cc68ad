use crate::config::types::{Config, CrawlSettings, OutputConfig, OutputFormat, RenderConfig};
use crate::url::ascii_suffix;
use crate::ConfigError;
use url::Url;

const MAX_CONCURRENCY: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_settings(&config.crawl)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl target, query and limits
fn validate_crawl_settings(config: &CrawlSettings) -> Result<(), ConfigError> {
    let start_url = config.start_url.trim();
    if start_url.is_empty() {
        return Err(ConfigError::Validation(
            "start_url is required (--start-point)".to_string(),
        ));
    }

    let url = Url::parse(start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' must use http or https",
            start_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' has no host",
            start_url
        )));
    }

    if config.query.is_empty() {
        return Err(ConfigError::Validation(
            "query is required (--query)".to_string(),
        ));
    }

    validate_domain_suffix(&config.domain_suffix)?;

    Ok(())
}

/// Validates a domain suffix filter
///
/// Accepts "any", "*", the empty string, or a host fragment such as ".net"
/// or "example.com".
fn validate_domain_suffix(suffix: &str) -> Result<(), ConfigError> {
    let suffix = suffix.trim();
    if suffix.is_empty() || suffix == "*" || suffix.eq_ignore_ascii_case("any") {
        return Ok(());
    }

    if !suffix
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "domain_suffix '{}' contains invalid characters",
            suffix
        )));
    }

    if suffix.contains("..") || suffix.ends_with('.') || ascii_suffix(suffix).is_none() {
        return Err(ConfigError::Validation(format!(
            "domain_suffix '{}' is not a valid host suffix",
            suffix
        )));
    }

    Ok(())
}

/// Validates render engine and worker pool settings
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration for the selected format
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.format {
        OutputFormat::Csv if config.directory.trim().is_empty() => Err(
            ConfigError::Validation("output directory cannot be empty".to_string()),
        ),
        OutputFormat::Sqlite if config.database_path.trim().is_empty() => Err(
            ConfigError::Validation("database_path cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}
