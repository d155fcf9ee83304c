//! Pagination loop
//!
//! Drives one adapter from the first page until the site runs out of pages,
//! a page comes back empty, the page limit is hit, or a page fails. Pages of
//! one crawl are fetched strictly in sequence.

use crate::adapter::{CrawlAdapter, PageCursor};
use crate::config::CrawlConfig;
use crate::crawler::{Product, StopReason};
use crate::http::HttpSession;
use crate::output::ResultAccumulator;
use std::time::Duration;
use tracing::{debug, error, info};

/// Pacing and limits for one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationSettings {
    /// Pause between two pages
    pub page_delay: Duration,
    /// Default page limit for adapters without their own
    pub max_pages: Option<u32>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self::from_config(&CrawlConfig::default())
    }
}

impl PaginationSettings {
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            page_delay: config.page_delay(),
            max_pages: config.max_pages,
        }
    }
}

/// State of one running pagination loop
pub struct Pagination<'a> {
    adapter: &'a dyn CrawlAdapter,
    http: &'a HttpSession,
    settings: &'a PaginationSettings,
    pages: u32,
}

impl<'a> Pagination<'a> {
    pub fn new(
        adapter: &'a dyn CrawlAdapter,
        http: &'a HttpSession,
        settings: &'a PaginationSettings,
    ) -> Self {
        Self {
            adapter,
            http,
            settings,
            pages: 0,
        }
    }

    /// Pages fetched so far
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Effective page limit, the adapter's own limit taking precedence
    pub fn page_limit(&self) -> Option<u32> {
        self.adapter.max_pages().or(self.settings.max_pages)
    }

    /// Runs the loop to completion, appending every page's records to `results`
    pub async fn run(&mut self, results: &mut ResultAccumulator<Product>) -> StopReason {
        let name = self.adapter.name().to_string();
        let limit = self.page_limit();
        let mut cursor = PageCursor::first();

        loop {
            if let Some(limit) = limit {
                if self.pages >= limit {
                    info!("[{}] Page limit {} reached", name, limit);
                    return StopReason::PageLimit(limit);
                }
            }

            info!("[{}] Fetching page {}...", name, self.pages + 1);
            let response = match self.adapter.fetch_page(self.http, &cursor).await {
                Ok(response) => response,
                Err(e) => {
                    error!("[{}] Error while fetching page {}: {}", name, self.pages + 1, e);
                    return StopReason::Failed(e.to_string());
                }
            };
            self.pages += 1;

            let page = match self.adapter.parse(&response, &cursor) {
                Ok(page) => page,
                Err(e) => {
                    error!("[{}] Error while parsing page {}: {}", name, self.pages, e);
                    return StopReason::Failed(e.to_string());
                }
            };

            if page.records.is_empty() {
                info!("[{}] No product data found", name);
                return StopReason::EmptyPage;
            }

            debug!("[{}] Page {}: {} records", name, self.pages, page.records.len());
            results.extend(page.records);

            cursor = match page.next {
                Some(next) => next,
                None => {
                    info!("[{}] No more pages to fetch", name);
                    return StopReason::Exhausted;
                }
            };

            if limit.is_some_and(|limit| self.pages >= limit) {
                info!("[{}] Page limit reached after {} pages", name, self.pages);
                return StopReason::PageLimit(self.pages);
            }

            tokio::time::sleep(self.settings.page_delay).await;
        }
    }
}
