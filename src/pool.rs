//! Bounded worker pool
//!
//! Runs a batch of named jobs with at most `size` of them in flight, then
//! waits for all of them. A job that panics is reported as a [`WorkerFault`]
//! for that job only; the rest of the batch is unaffected.

use futures::future::join_all;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// A job that did not produce a value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkerFault {
    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker was cancelled")]
    Cancelled,
}

/// Fixed-size pool of concurrent tasks
#[derive(Debug, Clone)]
pub struct WorkerPool {
    size: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Creates a pool running at most `size` jobs at once (minimum 1)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs every job and returns one result per job, in submission order
    ///
    /// Returns only after all jobs have finished.
    pub async fn run_all<T, F>(&self, jobs: Vec<(String, F)>) -> Vec<(String, Result<T, WorkerFault>)>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let mut names = Vec::with_capacity(jobs.len());
        let mut handles = Vec::with_capacity(jobs.len());

        for (name, job) in jobs {
            let permits = Arc::clone(&self.permits);
            let label = name.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                tracing::debug!("Worker started: {}", label);
                job.await
            }));
            names.push(name);
        }

        let results = join_all(handles).await;

        names
            .into_iter()
            .zip(results)
            .map(|(name, result)| {
                let result = result.map_err(|e| {
                    if e.is_panic() {
                        let message = panic_message(e.into_panic());
                        tracing::error!("Worker {} panicked: {}", name, message);
                        WorkerFault::Panicked(message)
                    } else {
                        tracing::error!("Worker {} was cancelled", name);
                        WorkerFault::Cancelled
                    }
                });
                (name, result)
            })
            .collect()
    }
}

/// Extracts the message from a panic payload
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
