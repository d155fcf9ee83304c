//! Crawler module for paginated product listings
//!
//! This module contains the core crawling logic, including:
//! - The pagination loop driving one adapter page by page
//! - Running one crawl end to end with a guaranteed flush
//! - Coordinating several crawls on a bounded worker pool
//! - HTML helpers for adapters that scrape markup instead of JSON

mod coordinator;
mod pagination;
mod parser;
mod runner;

pub use coordinator::Coordinator;
pub use pagination::{Pagination, PaginationSettings};
pub use parser::{extract_products, resolve_link, CardSelectors};
pub use runner::run_crawler;

use crate::output::Record;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A product listed by a storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

impl Record for Product {}

/// Why a pagination loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The site reported no further page
    Exhausted,
    /// A page came back without records
    EmptyPage,
    /// The configured or adapter page limit was reached
    PageLimit(u32),
    /// A request, parse or worker failure ended the crawl
    Failed(String),
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::Failed(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "no more pages"),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::PageLimit(limit) => write!(f, "page limit {} reached", limit),
            StopReason::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Result of one crawler in one run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    /// Adapter name
    pub crawler: String,

    /// False if the crawl ended on an error or a panic
    pub success: bool,

    /// Pages fetched
    pub pages: u32,

    /// Unique records written
    pub records: usize,

    pub stop: StopReason,

    /// Output artifact, if anything was written
    pub output: Option<PathBuf>,

    pub elapsed: Duration,
}

impl CrawlOutcome {
    /// Outcome for a crawler that never got to fetch anything
    pub fn failed(crawler: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            crawler: crawler.into(),
            success: false,
            pages: 0,
            records: 0,
            stop: StopReason::Failed(reason.into()),
            output: None,
            elapsed: Duration::ZERO,
        }
    }
}
