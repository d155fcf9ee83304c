//! Storescout: a resilient storefront crawl engine
//!
//! This crate crawls paginated product listings and checks account/email
//! availability on sites that expose no stable public API. Site adapters plug
//! into a fixed contract; the engine supplies retrying HTTP, pagination,
//! deduplicated output and bounded concurrent orchestration.

pub mod adapter;
pub mod check;
pub mod config;
pub mod crawler;
pub mod http;
pub mod output;
pub mod platforms;
pub mod pool;

use thiserror::Error;

/// Main error type for Storescout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Unknown adapter '{name}' (available: {})", .available.join(", "))]
    UnknownAdapter {
        name: String,
        available: Vec<String>,
    },

    #[error("Adapter '{name}' is already registered")]
    DuplicateAdapter { name: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid proxy URL in config: {0}")]
    InvalidProxy(String),
}

/// Errors raised by the resilient request layer
///
/// Every variant except `RetriesExhausted` describes a single failed attempt
/// and is fed back into the retry loop. `RetriesExhausted` is terminal and is
/// never retried by callers.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected content type {content_type} from {url}. You might be sending too many requests")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Response from {url} classified as an error (HTTP {status})")]
    Rejected { url: String, status: u16 },

    #[error("Malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("Invalid request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("Failed after {attempts} attempts for {url}: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<RequestError>,
    },
}

impl RequestError {
    /// Builds a transport error, splitting out timeouts
    pub fn from_transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            RequestError::Timeout {
                url: url.to_string(),
            }
        } else {
            RequestError::Transport {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Builds a malformed-body error
    pub fn malformed(url: &str, reason: impl Into<String>) -> Self {
        RequestError::Malformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true if the error is the terminal retry-ceiling error
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RequestError::RetriesExhausted { .. })
    }
}

/// Errors raised by the per-adapter token cache
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Could not retrieve token for {platform}. You might be sending too many requests")]
    Unavailable { platform: String },
}

/// Errors raised while running a single availability check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{platform} does not support {kind} checks")]
    Unsupported { platform: String, kind: &'static str },

    #[error("Unexpected response from {platform}: {reason}")]
    Unexpected { platform: String, reason: String },
}

/// Result type alias for Storescout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for request-layer operations
pub type RequestResult<T> = std::result::Result<T, RequestError>;

// Re-export commonly used types
pub use adapter::{
    CheckerRegistry, CrawlAdapter, CrawlerRegistry, Page, PageCursor, ResponseClassifier,
};
pub use check::{Availability, AvailabilityAdapter, PlatformResponse, Token, TokenCache};
pub use config::Config;
pub use crawler::{CrawlOutcome, Product, StopReason};
pub use http::{HttpSession, RawResponse, RequestSpec};
pub use output::{Record, ResultAccumulator};
