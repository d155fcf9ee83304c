use crate::fast_config;
use async_trait::async_trait;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use storescout::adapter::{CrawlAdapter, CrawlerRegistry, Page, PageCursor, ResponseClassifier};
use storescout::crawler::{Coordinator, StopReason};
use storescout::http::{HttpSession, RawResponse};
use storescout::output::CsvSink;
use storescout::platforms::{InMyPrime, TataCliq, Virgio};
use storescout::RequestResult;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Adapter that panics on its first page
struct Broken;

impl ResponseClassifier for Broken {}

#[async_trait]
impl CrawlAdapter for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    async fn fetch_page(&self, _http: &HttpSession, _cursor: &PageCursor) -> RequestResult<RawResponse> {
        panic!("adapter blew up")
    }

    fn parse(&self, _response: &RawResponse, _cursor: &PageCursor) -> RequestResult<Page> {
        Ok(Page::empty())
    }
}

async fn mount_virgio(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/collections/all"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": {"products": {
                "nodes": [
                    {"id": "gid://shopify/Product/2", "title": "Tee", "handle": "tee"},
                    {"id": "gid://shopify/Product/3", "title": "Skirt", "handle": "skirt"}
                ],
                "pageInfo": {"hasNextPage": false, "endCursor": null}
            }}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collections/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": {"products": {
                "nodes": [
                    {"id": "gid://shopify/Product/1", "title": "Wrap Dress", "handle": "wrap-dress"},
                    {"id": "gid://shopify/Product/2", "title": "Tee", "handle": "tee"}
                ],
                "pageInfo": {"hasNextPage": true, "endCursor": "c1"}
            }}
        })))
        .mount(server)
        .await;
}

async fn mount_tatacliq(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchresult": [{"productId": "MP1", "productname": "Kurta", "webURL": "/kurta/p-mp1"}],
            "pagination": {"totalPages": 2}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchresult": [{"productId": "MP2", "productname": "Saree", "webURL": "/saree/p-mp2"}],
            "pagination": {"totalPages": 2}
        })))
        .mount(server)
        .await;
}

async fn mount_inmyprime(server: &MockServer) {
    let cards = r#"
        <ul>
          <li class="grid__item"><div class="card__information"><a href="/products/a">Top A</a></div></li>
          <li class="grid__item"><div class="card__information"><a href="/products/b">Top B</a></div></li>
        </ul>"#;

    Mock::given(method("GET"))
        .and(path("/collections/all-products"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cards))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/collections/all-products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>No products</p>"))
        .mount(server)
        .await;
}

fn registry(base: &str) -> CrawlerRegistry {
    let mut registry = CrawlerRegistry::new();

    let (b, api) = (format!("{}/", base), format!("{}/collections/all", base));
    registry
        .register("virgio", move || {
            Box::new(Virgio::new(b.clone(), api.clone())) as Box<dyn CrawlAdapter>
        })
        .unwrap();

    let (b, api) = (format!("{}/", base), format!("{}/search", base));
    registry
        .register("tatacliq", move || {
            Box::new(TataCliq::new(b.clone(), api.clone())) as Box<dyn CrawlAdapter>
        })
        .unwrap();

    let b = Url::parse(&format!("{}/", base)).unwrap();
    let page = format!("{}/collections/all-products", base);
    registry
        .register("inmyprime", move || {
            Box::new(InMyPrime::new(b.clone(), page.clone())) as Box<dyn CrawlAdapter>
        })
        .unwrap();

    registry
}

#[tokio::test]
async fn test_full_crawl_all_sites() {
    let mock_server = MockServer::start().await;
    mount_virgio(&mock_server).await;
    mount_tatacliq(&mock_server).await;
    mount_inmyprime(&mock_server).await;

    let out = TempDir::new().unwrap();
    let coordinator = Coordinator::new(
        &fast_config(),
        registry(&mock_server.uri()),
        Arc::new(CsvSink::new(out.path())),
    );

    let outcomes = coordinator.run_all().await;
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.success), "{:?}", outcomes);

    let virgio = outcomes.iter().find(|o| o.crawler == "Virgio").unwrap();
    assert_eq!(virgio.pages, 2);
    assert_eq!(virgio.records, 3);
    assert_eq!(virgio.stop, StopReason::Exhausted);

    let tatacliq = outcomes.iter().find(|o| o.crawler == "TataCliq").unwrap();
    assert_eq!(tatacliq.pages, 2);
    assert_eq!(tatacliq.records, 2);

    let inmyprime = outcomes.iter().find(|o| o.crawler == "InMyPrime").unwrap();
    assert_eq!(inmyprime.pages, 2);
    assert_eq!(inmyprime.records, 2);
    assert_eq!(inmyprime.stop, StopReason::EmptyPage);

    // The repeated Tee row is written once
    let csv = fs::read_to_string(virgio.output.as_ref().unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,name,url");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("1,Wrap Dress,"));

    let artifacts = fs::read_dir(out.path()).unwrap().count();
    assert_eq!(artifacts, 3);
}

#[tokio::test]
async fn test_panicking_crawler_is_isolated() {
    let mock_server = MockServer::start().await;
    mount_virgio(&mock_server).await;
    mount_tatacliq(&mock_server).await;

    let mut registry = registry(&mock_server.uri());
    registry
        .register("broken", || Box::new(Broken) as Box<dyn CrawlAdapter>)
        .unwrap();

    let out = TempDir::new().unwrap();
    let coordinator = Coordinator::new(&fast_config(), registry, Arc::new(CsvSink::new(out.path())));

    let names = vec![
        "virgio".to_string(),
        "broken".to_string(),
        "tatacliq".to_string(),
    ];
    let outcomes = coordinator.run_named(&names).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    let failed: Vec<_> = outcomes.iter().filter(|o| !o.success).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].crawler, "Broken");
    assert!(failed[0].output.is_none());
}

#[tokio::test]
async fn test_failed_crawl_keeps_partial_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchresult": [{"productId": "MP1", "productname": "Kurta", "webURL": "/kurta"}],
            "pagination": {"totalPages": 3}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Too many requests"})))
        .expect(3)
        .mount(&mock_server)
        .await;

    let out = TempDir::new().unwrap();
    let coordinator = Coordinator::new(
        &fast_config(),
        registry(&mock_server.uri()),
        Arc::new(CsvSink::new(out.path())),
    );

    let outcome = coordinator.run_one("tatacliq").await.unwrap();
    assert!(!outcome.success);
    assert!(outcome.stop.is_failure());
    assert_eq!(outcome.records, 1);

    let csv = fs::read_to_string(outcome.output.unwrap()).unwrap();
    assert!(csv.contains("MP1,Kurta,"));
}
