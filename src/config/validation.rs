use crate::config::types::{CheckConfig, Config, CrawlConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_crawl_config(&config.crawl)?;
    validate_check_config(&config.check)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates request layer configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 || config.max_retries > 20 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 20, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.user_agents.iter().any(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "user_agents cannot contain empty entries".to_string(),
        ));
    }

    for proxy in &config.proxies {
        validate_proxy(proxy)?;
    }

    Ok(())
}

/// Validates a proxy URL: must parse and use an http or https scheme
fn validate_proxy(proxy: &str) -> Result<(), ConfigError> {
    let url = Url::parse(proxy)
        .map_err(|e| ConfigError::InvalidProxy(format!("'{}': {}", proxy, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::InvalidProxy(format!(
                "'{}' uses unsupported scheme '{}'",
                proxy, other
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidProxy(format!(
            "'{}' is missing a host",
            proxy
        )));
    }

    Ok(())
}

fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "crawl workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_check_config(config: &CheckConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 512 {
        return Err(ConfigError::Validation(format!(
            "check workers must be between 1 and 512, got {}",
            config.workers
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    if config.log_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "log_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}
