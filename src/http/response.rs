//! Buffered HTTP responses
//!
//! Responses are read to completion before classification so that both the
//! error classifier and the adapter's parser can inspect the same body.

use crate::{RequestError, RequestResult};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// A fully buffered HTTP response
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    url: String,
    headers: HeaderMap,
    body: String,
}

impl RawResponse {
    /// Creates a response from its parts
    pub fn new(status: StatusCode, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Convenience constructor for a 200 response carrying a JSON body
    pub fn json_ok(url: impl Into<String>, body: &serde_json::Value) -> Self {
        Self::new(StatusCode::OK, url, body.to_string()).with_content_type("application/json")
    }

    /// Sets the Content-Type header
    pub fn with_content_type(self, content_type: &str) -> Self {
        self.with_header(CONTENT_TYPE, content_type)
    }

    /// Appends a header; values that are not valid header text are ignored
    pub fn with_header(mut self, name: reqwest::header::HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Reads a live reqwest response into memory
    pub(crate) async fn read(response: reqwest::Response) -> RequestResult<Self> {
        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::from_transport(&url, e))?;

        Ok(Self {
            status,
            url,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Final URL of the response
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Content-Type header value, or an empty string when missing
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Returns true if the response declares a JSON body
    pub fn is_json(&self) -> bool {
        self.content_type().starts_with("application/json")
    }

    /// Fails with `UnexpectedContentType` unless the body is declared as JSON
    ///
    /// Sites that rate limit usually answer API calls with an HTML page, so a
    /// mismatch here is treated as a retryable failure rather than a parse bug.
    pub fn ensure_json(&self) -> RequestResult<()> {
        if self.is_json() {
            Ok(())
        } else {
            Err(RequestError::UnexpectedContentType {
                url: self.url.clone(),
                content_type: self.content_type().to_string(),
            })
        }
    }

    /// Decodes the body as JSON after checking the content type
    pub fn json<T: DeserializeOwned>(&self) -> RequestResult<T> {
        self.ensure_json()?;
        serde_json::from_str(&self.body).map_err(|e| RequestError::malformed(&self.url, e.to_string()))
    }

    /// Decodes the body as an untyped JSON value
    pub fn json_value(&self) -> RequestResult<serde_json::Value> {
        self.json()
    }

    /// Looks up a cookie set by this response
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.split(';').next())
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.trim().to_string())
    }
}
