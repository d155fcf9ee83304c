//! Account and email availability checks
//!
//! A checker adapter answers "is this username/email free on platform X?".
//! Every answer, including expected negatives and failures, is normalized
//! into a [`PlatformResponse`] with an explicit outcome.

mod checker;
pub mod coordinator;
mod token;

pub use checker::{is_email, Checker, QueryKind};
pub use coordinator::execute_queries;
pub use token::{Token, TokenCache};

use crate::adapter::ResponseClassifier;
use crate::http::HttpSession;
use crate::output::Record;
use crate::{CheckError, RequestResult};
use async_trait::async_trait;
use serde::Serialize;

/// Outcome tag of a [`PlatformResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    Unavailable,
    Invalid,
    Failure,
}

/// Normalized result of one query against one platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformResponse {
    pub platform: String,
    pub query: String,
    pub available: bool,
    pub valid: bool,
    pub success: bool,
    pub message: String,
    pub link: Option<String>,
    #[serde(skip)]
    pub data: Option<serde_json::Value>,
}

impl PlatformResponse {
    fn build(
        platform: &str,
        query: &str,
        (available, valid, success): (bool, bool, bool),
        message: &str,
    ) -> Self {
        Self {
            platform: platform.to_string(),
            query: query.to_string(),
            available,
            valid,
            success,
            message: message.to_string(),
            link: None,
            data: None,
        }
    }

    pub fn available(platform: &str, query: &str) -> Self {
        Self::build(platform, query, (true, true, true), "Available")
    }

    /// Taken; `link` points at the existing account when known
    pub fn unavailable(
        platform: &str,
        query: &str,
        link: Option<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        Self {
            link,
            data,
            ..Self::build(platform, query, (false, true, true), "Unavailable")
        }
    }

    /// Rejected by the platform as malformed or not allowed
    pub fn invalid(platform: &str, query: &str) -> Self {
        Self::build(platform, query, (false, false, true), "Invalid")
    }

    /// The check itself could not be completed
    pub fn failure(platform: &str, query: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::build(platform, query, (false, false, false), "Failure")
        }
    }

    /// Unavailable if `message` contains one of `unavailable_messages`, invalid otherwise
    pub fn unavailable_or_invalid(
        platform: &str,
        query: &str,
        message: &str,
        unavailable_messages: &[&str],
        link: Option<String>,
    ) -> Self {
        if unavailable_messages.iter().any(|m| message.contains(m)) {
            Self::unavailable(platform, query, link, None).with_message(message)
        } else {
            Self::invalid(platform, query).with_message(message)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn outcome(&self) -> Availability {
        match (self.success, self.available, self.valid) {
            (false, _, _) => Availability::Failure,
            (true, true, _) => Availability::Available,
            (true, false, true) => Availability::Unavailable,
            (true, false, false) => Availability::Invalid,
        }
    }
}

impl Record for PlatformResponse {}

/// Contract implemented by every availability checker
///
/// Implementations override whichever of `check_username` / `check_email`
/// the platform supports and set the matching `supports_*` flag. Expected
/// negative answers are returned as responses, not errors.
#[async_trait]
pub trait AvailabilityAdapter: ResponseClassifier {
    /// Display name used in results
    fn platform(&self) -> &str;

    /// Whether queries need a token from [`AvailabilityAdapter::acquire_token`]
    fn requires_token(&self) -> bool {
        false
    }

    /// Fetches the prerequisite token; `Ok(None)` when the site did not hand one out
    async fn acquire_token(&self, _http: &HttpSession) -> RequestResult<Option<Token>> {
        Ok(None)
    }

    fn supports_username(&self) -> bool {
        false
    }

    fn supports_email(&self) -> bool {
        false
    }

    async fn check_username(
        &self,
        _http: &HttpSession,
        _token: Option<&Token>,
        _username: &str,
    ) -> Result<PlatformResponse, CheckError> {
        Err(CheckError::Unsupported {
            platform: self.platform().to_string(),
            kind: "username",
        })
    }

    async fn check_email(
        &self,
        _http: &HttpSession,
        _token: Option<&Token>,
        _email: &str,
    ) -> Result<PlatformResponse, CheckError> {
        Err(CheckError::Unsupported {
            platform: self.platform().to_string(),
            kind: "email",
        })
    }
}
