//! Virgio: JSON collection feed with cursor pagination

use crate::adapter::{CrawlAdapter, Page, PageCursor, ResponseClassifier};
use crate::crawler::Product;
use crate::http::{HttpSession, RawResponse, RequestSpec};
use crate::RequestResult;
use async_trait::async_trait;
use serde::Deserialize;

const BASE_URL: &str = "https://www.virgio.com/";
const API_URL: &str = "https://www.virgio.com/collections/all";
const DATA_ROUTE: &str = "routes/collections.$collectionHandle.(products).($productHandle)";

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    collection: Collection,
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    products: ProductConnection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProductConnection {
    nodes: Vec<ProductNode>,
    page_info: PageInfo,
}

/// Storefront fields may be `null` on draft or partially published products
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProductNode {
    id: Option<String>,
    title: Option<String>,
    handle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

pub struct Virgio {
    base_url: String,
    api_url: String,
}

impl Default for Virgio {
    fn default() -> Self {
        Self::new(BASE_URL, API_URL)
    }
}

impl Virgio {
    pub fn new(base_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_url: api_url.into(),
        }
    }

    fn product(&self, node: ProductNode) -> Product {
        // Shopify ids look like gid://shopify/Product/123
        let id = node
            .id
            .as_deref()
            .and_then(|id| id.rsplit('/').next())
            .unwrap_or_default()
            .to_string();
        let url = match node.handle.as_deref() {
            Some(handle) if !handle.is_empty() => format!("{}products/{}", self.base_url, handle),
            _ => String::new(),
        };
        Product::new(id, node.title.unwrap_or_default(), url)
    }
}

impl ResponseClassifier for Virgio {}

#[async_trait]
impl CrawlAdapter for Virgio {
    fn name(&self) -> &str {
        "Virgio"
    }

    async fn fetch_page(&self, http: &HttpSession, cursor: &PageCursor) -> RequestResult<RawResponse> {
        let mut spec = RequestSpec::get(&self.api_url)
            .query("_data", DATA_ROUTE)
            .expect_json();
        if let PageCursor::After(after) = cursor {
            spec = spec.query("cursor", after).query("direction", "next");
        }
        http.execute(&spec, self).await
    }

    fn parse(&self, response: &RawResponse, _cursor: &PageCursor) -> RequestResult<Page> {
        let body: CollectionResponse = response.json()?;
        let connection = body.collection.products;

        let next = match (connection.page_info.has_next_page, connection.page_info.end_cursor) {
            (true, Some(end)) => Some(PageCursor::After(end)),
            (true, None) => {
                return Err(crate::RequestError::malformed(
                    response.url(),
                    "hasNextPage without endCursor",
                ))
            }
            (false, _) => None,
        };

        let records = connection
            .nodes
            .into_iter()
            .map(|node| self.product(node))
            .collect();
        Ok(Page::new(records, next))
    }
}
