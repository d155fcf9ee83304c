//! Instagram: sign-up form validation endpoint
//!
//! The endpoint needs the `csrftoken` cookie handed out by the home page,
//! sent back both as a cookie and as the `x-csrftoken` header.

use crate::adapter::ResponseClassifier;
use crate::check::{AvailabilityAdapter, PlatformResponse, Token};
use crate::http::{HttpSession, RequestSpec};
use crate::{CheckError, RequestResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const PLATFORM: &str = "Instagram";
const HOME_URL: &str = "https://www.instagram.com/";
const ENDPOINT: &str = "https://www.instagram.com/accounts/web_create_ajax/attempt/";
const PROFILE_URL: &str = "https://www.instagram.com/";
const USERNAME_TAKEN_MSGS: &[&str] = &[
    "This username isn't available.",
    "A user with that username already exists.",
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AttemptResponse {
    status: String,
    message: String,
    errors: HashMap<String, Vec<FieldError>>,
}

/// Field errors come either as `{"message", "code"}` objects or as bare strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldError {
    Detailed {
        #[serde(default)]
        message: String,
        #[serde(default)]
        code: String,
    },
    Plain(String),
}

impl FieldError {
    fn message(&self) -> &str {
        match self {
            FieldError::Detailed { message, .. } => message,
            FieldError::Plain(message) => message,
        }
    }

    fn code(&self) -> &str {
        match self {
            FieldError::Detailed { code, .. } => code,
            FieldError::Plain(_) => "",
        }
    }
}

impl AttemptResponse {
    fn first_error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field).and_then(|errors| errors.first())
    }
}

pub struct Instagram {
    home_url: String,
    endpoint: String,
}

impl Default for Instagram {
    fn default() -> Self {
        Self::new(HOME_URL, ENDPOINT)
    }
}

impl Instagram {
    pub fn new(home_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            home_url: home_url.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn attempt(
        &self,
        http: &HttpSession,
        token: Option<&Token>,
        field: &str,
        value: &str,
    ) -> Result<AttemptResponse, CheckError> {
        let token = token.ok_or_else(|| CheckError::Unexpected {
            platform: PLATFORM.to_string(),
            reason: "no csrf token".to_string(),
        })?;
        let spec = RequestSpec::post(&self.endpoint)
            .form(&[(field, value)])
            .header("x-csrftoken", token.value.as_str())
            .header("cookie", format!("csrftoken={}", token.value))
            .header("referer", self.home_url.as_str())
            .expect_json();
        let response = http.execute(&spec, self).await?;
        Ok(response.json()?)
    }
}

impl ResponseClassifier for Instagram {}

#[async_trait]
impl AvailabilityAdapter for Instagram {
    fn platform(&self) -> &str {
        PLATFORM
    }

    fn requires_token(&self) -> bool {
        true
    }

    async fn acquire_token(&self, http: &HttpSession) -> RequestResult<Option<Token>> {
        let response = http.execute(&RequestSpec::get(&self.home_url), self).await?;
        Ok(response.cookie("csrftoken").map(Token::new))
    }

    fn supports_username(&self) -> bool {
        true
    }

    fn supports_email(&self) -> bool {
        true
    }

    async fn check_username(
        &self,
        http: &HttpSession,
        token: Option<&Token>,
        username: &str,
    ) -> Result<PlatformResponse, CheckError> {
        let body = self.attempt(http, token, "username", username).await?;
        Ok(username_response(&body, username))
    }

    async fn check_email(
        &self,
        http: &HttpSession,
        token: Option<&Token>,
        email: &str,
    ) -> Result<PlatformResponse, CheckError> {
        let body = self.attempt(http, token, "email", email).await?;
        Ok(email_response(&body, email))
    }
}

fn username_response(body: &AttemptResponse, username: &str) -> PlatformResponse {
    // "fail" means the request was throttled, not that the name is taken
    if body.status == "fail" {
        return PlatformResponse::failure(PLATFORM, username, body.message.as_str());
    }
    match body.first_error("username") {
        Some(error) => PlatformResponse::unavailable_or_invalid(
            PLATFORM,
            username,
            error.message(),
            USERNAME_TAKEN_MSGS,
            Some(format!("{}{}", PROFILE_URL, username)),
        ),
        None => PlatformResponse::available(PLATFORM, username),
    }
}

fn email_response(body: &AttemptResponse, email: &str) -> PlatformResponse {
    if body.status == "fail" {
        return PlatformResponse::failure(PLATFORM, email, body.message.as_str());
    }
    match body.first_error("email") {
        None => PlatformResponse::available(PLATFORM, email),
        Some(error) if error.code() == "invalid_email" => {
            PlatformResponse::invalid(PLATFORM, email).with_message(error.message())
        }
        Some(error) => {
            PlatformResponse::unavailable(PLATFORM, email, None, None).with_message(error.message())
        }
    }
}
