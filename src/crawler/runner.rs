//! One crawl, end to end

use crate::adapter::CrawlAdapter;
use crate::crawler::{CrawlOutcome, Pagination, PaginationSettings, Product, StopReason};
use crate::http::HttpSession;
use crate::output::{FlushStatus, RecordSink, ResultAccumulator};
use crate::pool::panic_message;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info};

/// Runs one adapter through the pagination loop and flushes its results
///
/// Whatever was accumulated is flushed exactly once, including when the loop
/// failed or panicked. The outcome is successful only if the loop ended
/// without an error and the flush went through.
pub async fn run_crawler(
    adapter: &dyn CrawlAdapter,
    http: &HttpSession,
    settings: &PaginationSettings,
    sink: &dyn RecordSink<Product>,
) -> CrawlOutcome {
    let started = Instant::now();
    let name = adapter.name().to_string();
    let mut results = ResultAccumulator::new(format!("{}_products", name));
    info!("[{}] Crawl started", name);

    let mut pagination = Pagination::new(adapter, http, settings);
    let mut stop = match AssertUnwindSafe(pagination.run(&mut results))
        .catch_unwind()
        .await
    {
        Ok(stop) => stop,
        Err(payload) => {
            let message = panic_message(payload);
            error!("[{}] Crawl panicked: {}", name, message);
            StopReason::Failed(format!("panicked: {}", message))
        }
    };
    let pages = pagination.pages();

    let (output, records) = match results.flush(sink) {
        Ok(FlushStatus::Written { path, rows }) => (Some(path), rows),
        Ok(_) => (None, 0),
        Err(e) => {
            error!("[{}] Failed to write output: {}", name, e);
            if !stop.is_failure() {
                stop = StopReason::Failed(e.to_string());
            }
            (None, 0)
        }
    };

    let outcome = CrawlOutcome {
        crawler: name,
        success: !stop.is_failure(),
        pages,
        records,
        stop,
        output,
        elapsed: started.elapsed(),
    };

    info!(
        "[{}] Crawl finished in {:.1}s: {} pages, {} rows ({})",
        outcome.crawler,
        outcome.elapsed.as_secs_f64(),
        outcome.pages,
        outcome.records,
        outcome.stop
    );
    outcome
}
