//! Per-crawl result accumulator
//!
//! Records are appended page by page and written out exactly once. A second
//! flush (for example from a cleanup path after a failure) is a no-op.

use crate::output::traits::{OutputResult, Record, RecordSink};
use std::collections::HashSet;
use std::path::PathBuf;

/// What a call to [`ResultAccumulator::flush`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushStatus {
    /// Artifact written with `rows` unique records
    Written { path: PathBuf, rows: usize },
    /// Nothing accumulated, no artifact
    Empty,
    /// An earlier flush already ran
    AlreadyFlushed,
}

/// Ordered, append-only store of records for one crawl
#[derive(Debug)]
pub struct ResultAccumulator<R: Record> {
    label: String,
    records: Vec<R>,
    flushed: bool,
}

impl<R: Record> ResultAccumulator<R> {
    /// Creates an empty accumulator; `label` prefixes the output artifact
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            records: Vec::new(),
            flushed: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn extend<I: IntoIterator<Item = R>>(&mut self, records: I) {
        self.records.extend(records);
    }

    /// Number of records appended so far, duplicates included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Records with exact duplicates removed, first occurrence kept
    ///
    /// Records that cannot be serialized are never treated as duplicates.
    pub fn unique_records(&self) -> Vec<R> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|record| match record.row_key() {
                Some(key) => seen.insert(key),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Writes the deduplicated records through `sink`, at most once
    ///
    /// The flushed flag is set before writing so that a failed write is not
    /// retried by a later cleanup flush.
    pub fn flush(&mut self, sink: &dyn RecordSink<R>) -> OutputResult<FlushStatus> {
        if self.flushed {
            tracing::debug!("[{}] Output already flushed", self.label);
            return Ok(FlushStatus::AlreadyFlushed);
        }
        self.flushed = true;

        if self.records.is_empty() {
            tracing::warn!("[{}] No data to output", self.label);
            return Ok(FlushStatus::Empty);
        }

        let unique = self.unique_records();
        let path = sink.write(&self.label, &unique)?;
        tracing::info!(
            "[{}] Data saved to {} ({} rows)",
            self.label,
            path.display(),
            unique.len()
        );

        Ok(FlushStatus::Written {
            path,
            rows: unique.len(),
        })
    }
}
