//! Tata CLiQ: JSON search API with page numbers
//!
//! The API is 0-indexed and reports the total page count with every page.
//! Failures are sometimes sent with a 200 status and an `error` field, so
//! the classifier inspects the body as well.

use crate::adapter::{is_default_error, CrawlAdapter, Page, PageCursor, ResponseClassifier};
use crate::crawler::Product;
use crate::http::{HttpSession, RawResponse, RequestSpec};
use crate::RequestResult;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://www.tatacliq.com/";
const API_URL: &str = "https://searchbff.tatacliq.com/products/mpl/search";
const SEARCH_TEXT: &str = ":relevance:category:MSH1116100:inStockFlag:true";
const PAGE_SIZE: u32 = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    searchresult: Option<Vec<SearchItem>>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchItem {
    #[serde(rename = "productId")]
    product_id: Option<String>,
    productname: Option<String>,
    #[serde(rename = "webURL")]
    web_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Pagination {
    total_pages: u32,
}

pub struct TataCliq {
    base_url: String,
    api_url: String,
}

impl Default for TataCliq {
    fn default() -> Self {
        Self::new(BASE_URL, API_URL)
    }
}

impl TataCliq {
    pub fn new(base_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_url: api_url.into(),
        }
    }
}

/// Returns the API's error message, if the body carries a non-empty `error`
fn body_error(response: &RawResponse) -> Option<String> {
    let body: Value = serde_json::from_str(response.text()).ok()?;
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl ResponseClassifier for TataCliq {
    fn is_error(&self, response: &RawResponse) -> bool {
        if is_default_error(response) {
            return true;
        }
        match body_error(response) {
            Some(message) => {
                tracing::error!("[TataCliq] {}", message);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CrawlAdapter for TataCliq {
    fn name(&self) -> &str {
        "TataCliq"
    }

    async fn fetch_page(&self, http: &HttpSession, cursor: &PageCursor) -> RequestResult<RawResponse> {
        let page = cursor.page_number().unwrap_or(1).saturating_sub(1);
        let spec = RequestSpec::get(&self.api_url)
            .query("searchText", SEARCH_TEXT)
            .query("isKeywordRedirect", "true")
            .query("isKeywordRedirectEnabled", "true")
            .query("channel", "WEB")
            .query("isMDE", "true")
            .query("isTextSearch", "false")
            .query("isFilter", "false")
            .query("qc", "false")
            .query("isSuggested", "false")
            .query("isPwa", "true")
            .query("pageSize", PAGE_SIZE)
            .query("typeID", "all")
            .query("page", page)
            .expect_json();
        http.execute(&spec, self).await
    }

    fn parse(&self, response: &RawResponse, cursor: &PageCursor) -> RequestResult<Page> {
        let body: SearchResponse = response.json()?;
        let current = cursor.page_number().unwrap_or(1);

        let total_pages = body.pagination.map_or(0, |p| p.total_pages);
        let next = if current < total_pages {
            Some(PageCursor::Page(current + 1))
        } else {
            None
        };

        let records = body
            .searchresult
            .unwrap_or_default()
            .into_iter()
            .map(|item| {
                let path = item.web_url.as_deref().unwrap_or_default().trim_start_matches('/');
                let url = if path.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", self.base_url, path)
                };
                Product::new(
                    item.product_id.unwrap_or_default(),
                    item.productname.unwrap_or_default(),
                    url,
                )
            })
            .collect();

        Ok(Page::new(records, next))
    }
}
