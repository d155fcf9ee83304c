//! One adapter instance plus its token cache

use crate::check::{AvailabilityAdapter, PlatformResponse, Token, TokenCache};
use crate::http::HttpSession;
use crate::{CheckError, TokenError};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'’*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,253}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,253}[a-zA-Z0-9])?)+$",
    )
    .expect("Email regex is hardcoded and valid")
});

/// Returns true if `query` looks like an email address
pub fn is_email(query: &str) -> bool {
    EMAIL_REGEX.is_match(query)
}

/// Which adapter entry point a query is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Username,
    Email,
}

impl QueryKind {
    pub fn of(query: &str) -> Self {
        if is_email(query) {
            QueryKind::Email
        } else {
            QueryKind::Username
        }
    }
}

/// An availability adapter bound to its own token cache
pub struct Checker {
    adapter: Box<dyn AvailabilityAdapter>,
    tokens: TokenCache,
}

impl Checker {
    pub fn new(adapter: Box<dyn AvailabilityAdapter>) -> Self {
        Self {
            adapter,
            tokens: TokenCache::new(),
        }
    }

    pub fn platform(&self) -> &str {
        self.adapter.platform()
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// True if the adapter has an entry point for this kind of query
    pub fn supports(&self, kind: QueryKind) -> bool {
        match kind {
            QueryKind::Username => self.adapter.supports_username(),
            QueryKind::Email => self.adapter.supports_email(),
        }
    }

    /// Cached token, or `None` for platforms that need none
    pub async fn token(&self, http: &HttpSession) -> Result<Option<&Token>, TokenError> {
        if !self.adapter.requires_token() {
            return Ok(None);
        }
        self.tokens
            .get_token(self.adapter.platform(), || self.adapter.acquire_token(http))
            .await
            .map(Some)
    }

    /// Runs one query
    ///
    /// Returns `None` when the platform does not handle this kind of query.
    /// Errors are folded into a failure response carrying the error message.
    pub async fn query(&self, http: &HttpSession, query: &str) -> Option<PlatformResponse> {
        let kind = QueryKind::of(query);
        if !self.supports(kind) {
            tracing::debug!("[{}] Skipping {:?} query {}", self.platform(), kind, query);
            return None;
        }

        let response = match self.run(http, kind, query).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[{}] Check failed for {}: {}", self.platform(), query, e);
                PlatformResponse::failure(self.platform(), query, e.to_string())
            }
        };
        tracing::debug!(
            "[{}] {} -> {:?}",
            self.platform(),
            query,
            response.outcome()
        );
        Some(response)
    }

    async fn run(
        &self,
        http: &HttpSession,
        kind: QueryKind,
        query: &str,
    ) -> Result<PlatformResponse, CheckError> {
        let token = self.token(http).await?;
        match kind {
            QueryKind::Username => self.adapter.check_username(http, token, query).await,
            QueryKind::Email => self.adapter.check_email(http, token, query).await,
        }
    }
}
