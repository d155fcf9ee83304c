//! Concurrent availability checks
//!
//! One worker per platform. Each worker builds its own adapter instance and
//! token cache, then runs every query in order against the shared session.

use crate::adapter::Factory;
use crate::check::{AvailabilityAdapter, Checker, PlatformResponse};
use crate::http::HttpSession;
use crate::pool::{panic_message, WorkerPool};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info};

/// Runs every query against every platform
///
/// Returns the responses grouped by platform, in the order the platforms were
/// given and, within a platform, in query order. Platforms that do not handle
/// a query's kind contribute nothing for it. A panicking adapter yields a
/// failure response for each affected query; other platforms are unaffected.
pub async fn execute_queries(
    checkers: Vec<(String, Factory<dyn AvailabilityAdapter>)>,
    queries: &[String],
    http: Arc<HttpSession>,
    workers: usize,
) -> Vec<PlatformResponse> {
    let queries = Arc::new(queries.to_vec());
    let pool = WorkerPool::new(workers);
    info!(
        "Checking {} queries on {} platforms ({} workers)",
        queries.len(),
        checkers.len(),
        pool.size()
    );

    let jobs: Vec<_> = checkers
        .into_iter()
        .map(|(name, factory)| {
            let http = Arc::clone(&http);
            let queries = Arc::clone(&queries);
            (name, async move {
                let checker = Checker::new(factory());
                run_platform(&checker, &http, &queries).await
            })
        })
        .collect();

    let mut responses = Vec::new();
    for (name, result) in pool.run_all(jobs).await {
        match result {
            Ok(platform_responses) => responses.extend(platform_responses),
            Err(fault) => {
                error!("[{}] Checker failed: {}", name, fault);
                responses.extend(
                    queries
                        .iter()
                        .map(|q| PlatformResponse::failure(&name, q, fault.to_string())),
                );
            }
        }
    }

    info!("Checks finished: {} responses", responses.len());
    responses
}

/// Runs all queries for one platform, isolating panics per query
async fn run_platform(
    checker: &Checker,
    http: &HttpSession,
    queries: &[String],
) -> Vec<PlatformResponse> {
    let mut responses = Vec::with_capacity(queries.len());

    for query in queries {
        match AssertUnwindSafe(checker.query(http, query))
            .catch_unwind()
            .await
        {
            Ok(Some(response)) => responses.push(response),
            Ok(None) => {}
            Err(payload) => {
                let message = panic_message(payload);
                error!("[{}] Panic while checking {}: {}", checker.platform(), query, message);
                responses.push(PlatformResponse::failure(
                    checker.platform(),
                    query,
                    format!("worker panicked: {}", message),
                ));
            }
        }
    }

    responses
}
