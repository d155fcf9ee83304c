use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User agent sent when the configuration does not provide any
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Storescout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Request layer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum number of attempts per request
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay used for retry backoff and post-request jitter (milliseconds)
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,

    /// Timeout applied to every single attempt (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Pick a new user agent after each failed attempt
    #[serde(rename = "rotate-user-agent")]
    pub rotate_user_agent: bool,

    /// Pool of user agents to choose from
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,

    /// Proxies rotated round-robin across requests
    pub proxies: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            request_timeout_secs: 15,
            rotate_user_agent: false,
            user_agents: vec![DEFAULT_USER_AGENT.to_string()],
            proxies: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Product crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Worker pool size when running several crawlers
    pub workers: usize,

    /// Delay between two pages of the same crawl (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Page limit applied to adapters that do not define their own
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: 3,
            page_delay_ms: 2000,
            max_pages: None,
        }
    }
}

impl CrawlConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// Availability check configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Worker pool size for platform checks
    pub workers: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { workers: 80 }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving CSV artifacts
    #[serde(rename = "output-dir")]
    pub output_dir: PathBuf,

    /// Directory receiving timestamped log files
    #[serde(rename = "log-dir")]
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
        }
    }
}
