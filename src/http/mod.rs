//! Resilient request layer
//!
//! This module contains everything adapters use to talk to remote sites:
//! - Request descriptions that can be replayed on retry
//! - Buffered responses with content-type checked JSON decoding
//! - The retry/backoff policy
//! - The shared session with proxy and user agent rotation

mod request;
mod response;
mod retry;
mod session;

pub use request::{RequestBody, RequestSpec};
pub use response::RawResponse;
pub use retry::RetryPolicy;
pub use session::{build_http_client, HttpSession};
