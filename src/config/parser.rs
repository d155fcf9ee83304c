use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[http]
max-retries = 5
base-delay-ms = 500
request-timeout-secs = 10
rotate-user-agent = true
user-agents = ["AgentA/1.0", "AgentB/2.0"]
proxies = ["http://127.0.0.1:8080"]

[crawl]
workers = 4
page-delay-ms = 1000
max-pages = 20

[check]
workers = 16

[output]
output-dir = "./out"
log-dir = "./log"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.http.max_retries, 5);
        assert_eq!(config.http.base_delay_ms, 500);
        assert!(config.http.rotate_user_agent);
        assert_eq!(config.http.user_agents.len(), 2);
        assert_eq!(config.crawl.workers, 4);
        assert_eq!(config.crawl.max_pages, Some(20));
        assert_eq!(config.check.workers, 16);
        assert_eq!(config.output.output_dir, std::path::PathBuf::from("./out"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();

        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.http.base_delay_ms, 2000);
        assert_eq!(config.http.request_timeout_secs, 15);
        assert_eq!(config.crawl.workers, 3);
        assert_eq!(config.crawl.max_pages, None);
        assert_eq!(config.check.workers, 80);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[http]\nmax-retries = 7\n").unwrap();

        assert_eq!(config.http.max_retries, 7);
        assert_eq!(config.http.request_timeout_secs, 15);
        assert!(!config.http.user_agents.is_empty());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/storescout.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawl]
workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
