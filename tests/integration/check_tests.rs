use crate::fast_http_config;
use std::sync::Arc;
use storescout::adapter::CheckerRegistry;
use storescout::check::{execute_queries, Availability, AvailabilityAdapter, PlatformResponse};
use storescout::http::HttpSession;
use storescout::platforms::{Firefox, Instagram};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn registry(base: &str) -> CheckerRegistry {
    let mut registry = CheckerRegistry::new();

    let (home, attempt) = (format!("{}/", base), format!("{}/attempt/", base));
    registry
        .register("instagram", move || {
            Box::new(Instagram::new(home.clone(), attempt.clone())) as Box<dyn AvailabilityAdapter>
        })
        .unwrap();

    let status = format!("{}/v1/account/status", base);
    registry
        .register("firefox", move || {
            Box::new(Firefox::new(status.clone())) as Box<dyn AvailabilityAdapter>
        })
        .unwrap();

    registry
}

fn find<'a>(responses: &'a [PlatformResponse], platform: &str, query: &str) -> &'a PlatformResponse {
    responses
        .iter()
        .find(|r| r.platform == platform && r.query == query)
        .unwrap_or_else(|| panic!("No response for {} / {}", platform, query))
}

async fn run(server: &MockServer, queries: &[&str]) -> Vec<PlatformResponse> {
    let http = Arc::new(HttpSession::new(&fast_http_config()).unwrap());
    let queries: Vec<String> = queries.iter().map(|q| q.to_string()).collect();
    execute_queries(registry(&server.uri()).factories(), &queries, http, 4).await
}

#[tokio::test]
async fn test_username_checks_share_one_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "csrftoken=tok123; Path=/")
                .set_body_string("<html></html>"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/attempt/"))
        .and(header("x-csrftoken", "tok123"))
        .and(body_string_contains("username=taken_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "errors": {"username": [{"message": "A user with that username already exists.", "code": "username_is_taken"}]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/attempt/"))
        .and(header("x-csrftoken", "tok123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "ok", "errors": {}})),
        )
        .mount(&mock_server)
        .await;

    let responses = run(&mock_server, &["taken_name", "fresh_name"]).await;

    // Firefox only answers email queries
    assert_eq!(responses.len(), 2);
    assert_eq!(
        find(&responses, "Instagram", "taken_name").outcome(),
        Availability::Unavailable
    );
    assert_eq!(
        find(&responses, "Instagram", "fresh_name").outcome(),
        Availability::Available
    );
}

#[tokio::test]
async fn test_missing_token_fails_every_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/attempt/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let responses = run(&mock_server, &["first", "second"]).await;

    assert_eq!(responses.len(), 2);
    for response in &responses {
        assert_eq!(response.outcome(), Availability::Failure);
        assert!(response.message.contains("Could not retrieve token"));
    }
}

#[tokio::test]
async fn test_email_checks_on_both_platforms() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "csrftoken=tok123; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/attempt/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "errors": {"email": [{"message": "Another account is using the same email.", "code": "email_is_taken"}]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/account/status"))
        .and(body_string_contains("email=used%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"exists": true})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/account/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"exists": false})))
        .mount(&mock_server)
        .await;

    let responses = run(&mock_server, &["used@example.com", "new@example.com"]).await;

    assert_eq!(responses.len(), 4);
    assert_eq!(
        find(&responses, "Firefox", "used@example.com").outcome(),
        Availability::Unavailable
    );
    assert_eq!(
        find(&responses, "Firefox", "new@example.com").outcome(),
        Availability::Available
    );
    assert_eq!(
        find(&responses, "Instagram", "used@example.com").outcome(),
        Availability::Unavailable
    );
}

#[tokio::test]
async fn test_server_errors_become_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/account/status"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let http = Arc::new(HttpSession::new(&fast_http_config()).unwrap());
    let registry = registry(&mock_server.uri());
    let firefox = vec![("firefox".to_string(), registry.factory("firefox").unwrap())];

    let responses = execute_queries(firefox, &["a@example.com".to_string()], http, 1).await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].outcome(), Availability::Failure);
    assert!(responses[0].message.contains("Failed after 3 attempts"));
}
