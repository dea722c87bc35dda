use crate::config::types::{ClientConfig, Config, CrawlerConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

const MAX_ENRICH_CONCURRENCY: usize = 16;
const MAX_REQUEST_DELAY_MS: u64 = 60_000;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_channel(&config.channel.root)?;
    validate_crawler_config(&config.crawler)?;
    validate_client_config(&config.client)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_channel(root: &str) -> Result<(), ConfigError> {
    if root.trim().is_empty() {
        return Err(ConfigError::Validation(
            "channel root cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_videos == Some(0) {
        return Err(ConfigError::Validation(
            "max_videos must be >= 1 when set".to_string(),
        ));
    }

    if config.enrich_concurrency < 1 || config.enrich_concurrency > MAX_ENRICH_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "enrich_concurrency must be between 1 and {}, got {}",
            MAX_ENRICH_CONCURRENCY, config.enrich_concurrency
        )));
    }

    if config.request_delay_ms > MAX_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= {}ms, got {}ms",
            MAX_REQUEST_DELAY_MS, config.request_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and {}, got {}",
            MAX_REQUEST_TIMEOUT_SECS, config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates client identification settings
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    let root = Url::parse(&config.platform_root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid platform_root: {}", e)))?;

    if root.scheme() != "https" && root.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "platform_root '{}' must use http or https",
            config.platform_root
        )));
    }

    let required = [
        ("user_agent", &config.user_agent),
        ("hl", &config.hl),
        ("gl", &config.gl),
        ("client_name", &config.client_name),
        ("client_name_id", &config.client_name_id),
    ];

    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation("output path cannot be empty".to_string()));
    }
    Ok(())
}
