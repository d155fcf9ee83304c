//! Single-acquisition token cache

use crate::pool::panic_message;
use crate::{RequestResult, TokenError};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::OnceCell;

/// Prerequisite value a platform hands out before it answers queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    /// Additional values (cookies, session ids) some platforms need
    pub extras: BTreeMap<String, String>,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }
}

/// Lazily populated token slot owned by one adapter instance
///
/// The first caller runs the acquisition; concurrent callers wait for it.
/// Whatever that attempt produced is kept for the lifetime of the cache,
/// including the absence of a token.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: OnceCell<Option<Token>>,
    acquisitions: AtomicU32,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token, acquiring it on first use
    ///
    /// # Returns
    ///
    /// * `Ok(&Token)` - Token available
    /// * `Err(TokenError::Unavailable)` - The single acquisition attempt produced no token
    pub async fn get_token<F, Fut>(&self, platform: &str, acquire: F) -> Result<&Token, TokenError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RequestResult<Option<Token>>>,
    {
        let slot = self
            .slot
            .get_or_init(|| async move {
                self.acquisitions.fetch_add(1, Ordering::SeqCst);
                let attempt = AssertUnwindSafe(async move { acquire().await })
                    .catch_unwind()
                    .await;
                let result = match attempt {
                    Ok(result) => result,
                    Err(payload) => {
                        tracing::error!(
                            "[{}] Token acquisition panicked: {}",
                            platform,
                            panic_message(payload)
                        );
                        return None;
                    }
                };
                match result {
                    Ok(Some(token)) => {
                        tracing::debug!("[{}] Token acquired", platform);
                        Some(token)
                    }
                    Ok(None) => {
                        tracing::warn!("[{}] No token in prerequest response", platform);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("[{}] Token acquisition failed: {}", platform, e);
                        None
                    }
                }
            })
            .await;

        slot.as_ref().ok_or_else(|| TokenError::Unavailable {
            platform: platform.to_string(),
        })
    }

    /// True once an acquisition has completed, successful or not
    pub fn is_attempted(&self) -> bool {
        self.slot.initialized()
    }

    /// Number of acquisition calls made
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions.load(Ordering::SeqCst)
    }
}
