//! Retry and pacing policy
//!
//! | Event | Delay |
//! |-------|-------|
//! | Attempt `n` failed, `n < max_attempts` | `base_delay × (n + 1)` |
//! | Attempt `n` failed, `n == max_attempts` | none, give up |
//! | Attempt succeeded | `base_delay × (0.5 + r)`, `r ∈ [0, 1)` |

use crate::config::HttpConfig;
use rand::Rng;
use std::time::Duration;

/// Attempt ceiling and delay schedule for the request layer
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first one
    pub max_attempts: u32,
    /// Unit delay for backoff and jitter
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: config.base_delay(),
        }
    }

    /// Delay to wait after `failed_attempts` consecutive failures
    pub fn backoff(&self, failed_attempts: u32) -> Duration {
        self.base_delay * (failed_attempts + 1)
    }

    /// Returns true if another attempt is allowed after `attempts` tries
    pub fn allows_retry(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }

    /// Randomized pause after a successful request
    pub fn jitter(&self) -> Duration {
        self.jitter_with(rand::thread_rng().gen::<f64>())
    }

    /// Pause for a given random fraction in `[0, 1)`
    pub fn jitter_with(&self, fraction: f64) -> Duration {
        self.base_delay.mul_f64(0.5 + fraction.clamp(0.0, 1.0))
    }
}
