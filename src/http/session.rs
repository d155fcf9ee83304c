//! Shared HTTP session with retry, backoff and rotation
//!
//! This module handles every HTTP call made by adapters, including:
//! - Building reqwest clients (one per configured proxy)
//! - Round-robin proxy selection
//! - User agent selection and optional rotation after failures
//! - Per-attempt timeout, response classification and linear backoff
//! - Jittered pacing after successful requests

use crate::adapter::ResponseClassifier;
use crate::config::HttpConfig;
use crate::http::request::{RequestBody, RequestSpec};
use crate::http::response::RawResponse;
use crate::http::retry::RetryPolicy;
use crate::{RequestError, RequestResult};
use rand::seq::SliceRandom;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Proxy};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Builds an HTTP client with the configured timeout and optional proxy
///
/// Cookies are kept per client so that a crawl or a token handshake sees the
/// cookies set by earlier responses.
pub fn build_http_client(config: &HttpConfig, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .cookie_store(true)
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    builder.build()
}

/// HTTP session shared by every request of a crawl or a check run
///
/// The session is safe to share between tasks: client selection uses an
/// atomic round-robin index and the current user agent sits behind a lock.
pub struct HttpSession {
    clients: Vec<Client>,
    next_client: AtomicUsize,
    policy: RetryPolicy,
    user_agents: Vec<String>,
    user_agent: RwLock<String>,
    rotate_user_agent: bool,
    request_count: AtomicU64,
}

impl HttpSession {
    /// Creates a session from the request layer configuration
    ///
    /// # Returns
    ///
    /// * `Ok(HttpSession)` - Session with one client per proxy (or one direct client)
    /// * `Err(reqwest::Error)` - A client or proxy could not be built
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let clients = if config.proxies.is_empty() {
            vec![build_http_client(config, None)?]
        } else {
            config
                .proxies
                .iter()
                .map(|proxy| build_http_client(config, Some(proxy)))
                .collect::<Result<Vec<_>, _>>()?
        };

        let user_agents = if config.user_agents.is_empty() {
            vec![crate::config::DEFAULT_USER_AGENT.to_string()]
        } else {
            config.user_agents.clone()
        };
        let initial = user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(|| crate::config::DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            clients,
            next_client: AtomicUsize::new(0),
            policy: RetryPolicy::from_config(config),
            user_agents,
            user_agent: RwLock::new(initial),
            rotate_user_agent: config.rotate_user_agent,
            request_count: AtomicU64::new(0),
        })
    }

    /// Replaces the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Number of HTTP attempts issued through this session
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Number of underlying clients (one per proxy)
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// User agent currently sent with requests
    pub fn user_agent(&self) -> String {
        self.user_agent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Switches to the agent after the current one in the pool
    fn rotate_identity(&self) {
        let mut current = self
            .user_agent
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let position = self
            .user_agents
            .iter()
            .position(|agent| *agent == *current)
            .unwrap_or(0);
        if let Some(next) = self.user_agents.get((position + 1) % self.user_agents.len()) {
            tracing::debug!("Rotating user agent to {}", next);
            *current = next.clone();
        }
    }

    fn next_client(&self) -> &Client {
        let index = self.next_client.fetch_add(1, Ordering::Relaxed) % self.clients.len();
        &self.clients[index]
    }

    /// Executes a request with retry and backoff
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Transport error (connect, DNS, reset) | Retry after backoff |
    /// | Timeout | Retry after backoff |
    /// | JSON expected, other Content-Type | Retry after backoff |
    /// | `classifier.is_error` is true | Retry after backoff |
    /// | Attempt ceiling reached | `RetriesExhausted` |
    /// | Accepted response | Jittered pause, return |
    ///
    /// # Arguments
    ///
    /// * `spec` - The request to issue on every attempt
    /// * `classifier` - Decides whether an HTTP response counts as a failure
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        classifier: &(dyn ResponseClassifier + '_),
    ) -> RequestResult<RawResponse> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let failure = match self.attempt(spec).await {
                Ok(response) => match classify(spec, &response, classifier) {
                    None => {
                        tokio::time::sleep(self.policy.jitter()).await;
                        return Ok(response);
                    }
                    Some(error) => error,
                },
                Err(error) => error,
            };

            tracing::warn!(
                "Request failed (attempt {}/{}): {}",
                attempts,
                self.policy.max_attempts,
                failure
            );

            if !self.policy.allows_retry(attempts) {
                return Err(RequestError::RetriesExhausted {
                    url: spec.url.clone(),
                    attempts,
                    last: Box::new(failure),
                });
            }

            if self.rotate_user_agent {
                self.rotate_identity();
            }

            let delay = self.policy.backoff(attempts);
            tracing::debug!("Retrying {} in {:?}", spec.url, delay);
            tokio::time::sleep(delay).await;
        }
    }

    /// Issues one attempt and buffers the response
    async fn attempt(&self, spec: &RequestSpec) -> RequestResult<RawResponse> {
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let mut request = self
            .next_client()
            .request(spec.method.clone(), &spec.url)
            .header(USER_AGENT, self.user_agent());

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }

        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        request = match &spec.body {
            Some(RequestBody::Form(pairs)) => request.form(pairs),
            Some(RequestBody::Json(value)) => request.json(value),
            Some(RequestBody::Text(text)) => request.body(text.clone()),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::from_transport(&spec.url, e))?;

        RawResponse::read(response).await
    }
}

/// Classifies a buffered response, returning the failure it represents
fn classify(
    spec: &RequestSpec,
    response: &RawResponse,
    classifier: &(dyn ResponseClassifier + '_),
) -> Option<RequestError> {
    if spec.expect_json {
        if let Err(error) = response.ensure_json() {
            return Some(error);
        }
    }

    if classifier.is_error(response) {
        return Some(RequestError::Rejected {
            url: response.url().to_string(),
            status: response.status().as_u16(),
        });
    }

    None
}
