//! Firefox accounts: email status API, no token needed

use crate::adapter::ResponseClassifier;
use crate::check::{AvailabilityAdapter, PlatformResponse, Token};
use crate::http::{HttpSession, RequestSpec};
use crate::CheckError;
use async_trait::async_trait;
use serde::Deserialize;

const PLATFORM: &str = "Firefox";
const EMAIL_ENDPOINT: &str = "https://api.accounts.firefox.com/v1/account/status";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusResponse {
    error: Option<serde_json::Value>,
    message: String,
    exists: bool,
}

pub struct Firefox {
    endpoint: String,
}

impl Default for Firefox {
    fn default() -> Self {
        Self::new(EMAIL_ENDPOINT)
    }
}

impl Firefox {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl ResponseClassifier for Firefox {}

#[async_trait]
impl AvailabilityAdapter for Firefox {
    fn platform(&self) -> &str {
        PLATFORM
    }

    fn supports_email(&self) -> bool {
        true
    }

    async fn check_email(
        &self,
        http: &HttpSession,
        _token: Option<&Token>,
        email: &str,
    ) -> Result<PlatformResponse, CheckError> {
        let spec = RequestSpec::post(&self.endpoint)
            .form(&[("email", email)])
            .expect_json();
        let body: StatusResponse = http.execute(&spec, self).await?.json()?;
        Ok(status_response(&body, email))
    }
}

fn status_response(body: &StatusResponse, email: &str) -> PlatformResponse {
    if body.error.is_some() {
        PlatformResponse::failure(PLATFORM, email, body.message.as_str())
    } else if body.exists {
        PlatformResponse::unavailable(PLATFORM, email, None, None)
    } else {
        PlatformResponse::available(PLATFORM, email)
    }
}
