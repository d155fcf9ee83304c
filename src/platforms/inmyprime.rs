//! InMyPrime: server-rendered collection pages

use crate::adapter::{CrawlAdapter, Page, PageCursor, ResponseClassifier};
use crate::crawler::{extract_products, CardSelectors};
use crate::http::{HttpSession, RawResponse, RequestSpec};
use crate::{RequestError, RequestResult};
use async_trait::async_trait;
use url::Url;

const BASE_URL: &str = "https://www.inmyprime.in/";
const PAGE_URL: &str = "https://www.inmyprime.in/collections/all-products";

const SELECTORS: CardSelectors<'static> = CardSelectors {
    card: "li.grid__item",
    link: "div.card__information a",
};

pub struct InMyPrime {
    base_url: Url,
    page_url: String,
}

impl Default for InMyPrime {
    fn default() -> Self {
        let base_url = Url::parse(BASE_URL).expect("InMyPrime base URL is hardcoded and valid");
        Self::new(base_url, PAGE_URL)
    }
}

impl InMyPrime {
    /// `base_url` resolves the relative product links found on listing pages
    pub fn new(base_url: Url, page_url: impl Into<String>) -> Self {
        Self {
            base_url,
            page_url: page_url.into(),
        }
    }
}

impl ResponseClassifier for InMyPrime {}

#[async_trait]
impl CrawlAdapter for InMyPrime {
    fn name(&self) -> &str {
        "InMyPrime"
    }

    async fn fetch_page(&self, http: &HttpSession, cursor: &PageCursor) -> RequestResult<RawResponse> {
        let spec = RequestSpec::get(&self.page_url).query("page", cursor.page_number().unwrap_or(1));
        http.execute(&spec, self).await
    }

    /// The theme has no page count; the crawl ends on the first page without cards
    fn parse(&self, response: &RawResponse, cursor: &PageCursor) -> RequestResult<Page> {
        let records = extract_products(response.text(), &self.base_url, SELECTORS)
            .map_err(|reason| RequestError::malformed(response.url(), reason))?;

        let next = cursor.page_number().unwrap_or(1) + 1;
        Ok(Page::new(records, Some(PageCursor::Page(next))))
    }
}
