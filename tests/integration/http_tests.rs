use crate::fast_http_config;
use std::time::{Duration, Instant};
use storescout::adapter::DefaultClassifier;
use storescout::config::HttpConfig;
use storescout::http::{HttpSession, RequestSpec, RetryPolicy};
use storescout::RequestError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retry_until_success() {
    let mock_server = MockServer::start().await;

    // Mounted first, so it answers the first two calls
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let session = HttpSession::new(&fast_http_config()).unwrap();
    let spec = RequestSpec::get(format!("{}/flaky", mock_server.uri()));

    let start = Instant::now();
    let response = session.execute(&spec, &DefaultClassifier).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text(), "ok");
    assert_eq!(session.request_count(), 3);
    // Backoff after the first and second failures: 20ms + 30ms
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let session = HttpSession::new(&fast_http_config()).unwrap();
    let spec = RequestSpec::get(format!("{}/down", mock_server.uri()));

    match session.execute(&spec, &DefaultClassifier).await {
        Err(RequestError::RetriesExhausted { attempts, last, .. }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, RequestError::Rejected { status: 503, .. }));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other.map(|r| r.status())),
    }
}

#[tokio::test]
async fn test_rate_limit_page_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>Slow down</html>"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let session = HttpSession::new(&fast_http_config()).unwrap();
    let spec = RequestSpec::get(format!("{}/api", mock_server.uri())).expect_json();

    let response = session.execute(&spec, &DefaultClassifier).await.unwrap();
    assert_eq!(response.json_value().unwrap()["ok"], true);
    assert_eq!(session.request_count(), 2);
}

#[tokio::test]
async fn test_client_errors_are_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = HttpSession::new(&fast_http_config()).unwrap();
    let spec = RequestSpec::get(format!("{}/missing", mock_server.uri()));

    let response = session.execute(&spec, &DefaultClassifier).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_connection_refused() {
    let session = HttpSession::new(&fast_http_config()).unwrap();
    let spec = RequestSpec::get("http://127.0.0.1:1/");

    let result = session.execute(&spec, &DefaultClassifier).await;
    assert!(matches!(
        result,
        Err(RequestError::RetriesExhausted { attempts: 3, .. })
    ));
}

fn two_agent_config(rotate: bool) -> HttpConfig {
    HttpConfig {
        rotate_user_agent: rotate,
        user_agents: vec!["AgentA/1.0".to_string(), "AgentB/2.0".to_string()],
        ..fast_http_config()
    }
}

fn other_agent(agent: &str) -> &'static str {
    if agent == "AgentA/1.0" {
        "AgentB/2.0"
    } else {
        "AgentA/1.0"
    }
}

#[tokio::test]
async fn test_user_agent_rotates_after_failure() {
    let mock_server = MockServer::start().await;
    let session = HttpSession::new(&two_agent_config(true)).unwrap();
    let first = session.user_agent();
    let second = other_agent(&first);

    Mock::given(method("GET"))
        .and(path("/guarded"))
        .and(header("user-agent", first.as_str()))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/guarded"))
        .and(header("user-agent", second))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let spec = RequestSpec::get(format!("{}/guarded", mock_server.uri()));
    let response = session.execute(&spec, &DefaultClassifier).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(session.user_agent(), second);
}

#[tokio::test]
async fn test_user_agent_kept_without_rotation() {
    let mock_server = MockServer::start().await;
    let session = HttpSession::new(&two_agent_config(false)).unwrap();
    let first = session.user_agent();

    Mock::given(method("GET"))
        .and(path("/guarded"))
        .and(header("user-agent", first.as_str()))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let spec = RequestSpec::get(format!("{}/guarded", mock_server.uri()));
    let result = session.execute(&spec, &DefaultClassifier).await;

    assert!(result.unwrap_err().is_exhausted());
    assert_eq!(session.user_agent(), first);
}

#[tokio::test]
async fn test_proxies_used_round_robin() {
    let proxy_a = MockServer::start().await;
    let proxy_b = MockServer::start().await;

    for proxy in [&proxy_a, &proxy_b] {
        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(proxy)
            .await;
    }

    let config = HttpConfig {
        proxies: vec![proxy_a.uri(), proxy_b.uri()],
        ..fast_http_config()
    };
    let session = HttpSession::new(&config).unwrap();
    assert_eq!(session.client_count(), 2);

    // Plain-http requests are forwarded to the proxy as-is
    let spec = RequestSpec::get("http://shop.invalid/ping");
    for _ in 0..4 {
        session.execute(&spec, &DefaultClassifier).await.unwrap();
    }

    assert_eq!(proxy_a.received_requests().await.unwrap().len(), 2);
    assert_eq!(proxy_b.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_custom_retry_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .expect(5)
        .mount(&mock_server)
        .await;

    let session = HttpSession::new(&fast_http_config())
        .unwrap()
        .with_policy(RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(1),
        });
    assert_eq!(session.policy().max_attempts, 5);

    let spec = RequestSpec::get(format!("{}/down", mock_server.uri()));
    match session.execute(&spec, &DefaultClassifier).await {
        Err(error) => {
            assert!(error.is_exhausted());
            assert!(matches!(error, RequestError::RetriesExhausted { attempts: 5, .. }));
        }
        Ok(response) => panic!("Expected failure, got HTTP {}", response.status()),
    }
    assert_eq!(session.request_count(), 5);
}
