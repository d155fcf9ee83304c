//! Configuration module for Storescout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file section falls back to the
//! built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use storescout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("storescout.toml")).unwrap();
//! println!("Crawl workers: {}", config.crawl.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckConfig, Config, CrawlConfig, HttpConfig, OutputConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
