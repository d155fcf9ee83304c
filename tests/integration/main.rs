//! Integration tests for Storescout
//!
//! These tests use wiremock to stand in for the remote sites and exercise
//! the request layer, the crawl cycle and the availability checks end-to-end.

mod check_tests;
mod crawl_tests;
mod http_tests;

use storescout::config::{Config, CrawlConfig, HttpConfig};

/// Request settings with short delays so the retry schedule stays fast
pub fn fast_http_config() -> HttpConfig {
    HttpConfig {
        max_retries: 3,
        base_delay_ms: 10,
        request_timeout_secs: 5,
        ..HttpConfig::default()
    }
}

/// Full configuration with short delays and three crawl workers
pub fn fast_config() -> Config {
    Config {
        http: fast_http_config(),
        crawl: CrawlConfig {
            workers: 3,
            page_delay_ms: 1,
            max_pages: None,
        },
        ..Config::default()
    }
}
