//! Adapter contract
//!
//! Every site-specific crawler implements [`CrawlAdapter`]; availability
//! checkers implement [`crate::check::AvailabilityAdapter`]. Both share the
//! [`ResponseClassifier`] used by the request layer to decide whether a
//! response should be retried.

mod registry;

pub use registry::{CheckerRegistry, CrawlerRegistry, Factory, Registry};

use crate::crawler::Product;
use crate::http::{HttpSession, RawResponse};
use crate::RequestResult;
use async_trait::async_trait;
use reqwest::StatusCode;

/// Decides whether a response counts as a failed attempt
pub trait ResponseClassifier: Send + Sync {
    /// Returns true if the response should be retried
    ///
    /// The default rejects rate limiting (429) and server errors (5xx).
    fn is_error(&self, response: &RawResponse) -> bool {
        is_default_error(response)
    }
}

/// Rate limiting (429) or a server error (5xx)
pub fn is_default_error(response: &RawResponse) -> bool {
    let status = response.status();
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Classifier with the default behaviour, for requests made outside an adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl ResponseClassifier for DefaultClassifier {}

/// Position of the next page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// 1-based page number
    Page(u32),
    /// Opaque continuation token handed out by the site
    After(String),
}

impl PageCursor {
    /// Cursor of the first page of every crawl
    pub fn first() -> Self {
        PageCursor::Page(1)
    }

    /// Page number, if this cursor is numeric
    pub fn page_number(&self) -> Option<u32> {
        match self {
            PageCursor::Page(n) => Some(*n),
            PageCursor::After(_) => None,
        }
    }
}

/// Parsed content of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Product>,
    /// `None` when the site reports no further pages
    pub next: Option<PageCursor>,
}

impl Page {
    pub fn new(records: Vec<Product>, next: Option<PageCursor>) -> Self {
        Self { records, next }
    }

    /// A page with no records and no continuation
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Contract implemented by every product listing crawler
///
/// The pagination loop calls `fetch_page` then `parse` for each cursor,
/// strictly in sequence, until `parse` yields no records or no next cursor.
#[async_trait]
pub trait CrawlAdapter: ResponseClassifier {
    /// Display name, also used in output file names
    fn name(&self) -> &str;

    /// Page limit for this site, overriding the configured default
    fn max_pages(&self) -> Option<u32> {
        None
    }

    /// Fetches the page at `cursor` through the session's retry loop
    async fn fetch_page(&self, http: &HttpSession, cursor: &PageCursor) -> RequestResult<RawResponse>;

    /// Extracts records and the next cursor from a fetched page
    fn parse(&self, response: &RawResponse, cursor: &PageCursor) -> RequestResult<Page>;
}
