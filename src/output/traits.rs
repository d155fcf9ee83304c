//! Output traits and error types
//!
//! This module defines the record contract shared by crawls and checks and
//! the sink interface that turns accumulated records into an artifact.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A row produced by an adapter
///
/// Records are immutable once produced. Two records whose serialized fields
/// are all equal are duplicates; only the first one survives a flush.
pub trait Record: Clone + Serialize + Send + Sync + 'static {
    /// Key covering every serialized field, `None` if the record cannot be serialized
    fn row_key(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

/// Destination for flushed records
///
/// Implementations must be thread-safe; one sink is shared by every worker
/// of an orchestration run.
pub trait RecordSink<R: Record>: Send + Sync {
    /// Writes one artifact named after `label` and returns its location
    ///
    /// # Arguments
    ///
    /// * `label` - Artifact prefix, e.g. `Virgio_products`
    /// * `records` - Deduplicated records, in accumulation order
    fn write(&self, label: &str, records: &[R]) -> OutputResult<PathBuf>;
}
