//! In-memory sink, used by tests and dry runs

use crate::output::traits::{OutputResult, Record, RecordSink};
use std::path::PathBuf;
use std::sync::Mutex;

/// Keeps every flushed batch in memory
#[derive(Debug, Default)]
pub struct MemorySink<R> {
    batches: Mutex<Vec<(String, Vec<R>)>>,
}

impl<R: Record> MemorySink<R> {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.batches.lock().map(|b| b.len()).unwrap_or(0)
    }

    /// All rows written under `label`
    pub fn rows(&self, label: &str) -> Vec<R> {
        self.batches
            .lock()
            .map(|batches| {
                batches
                    .iter()
                    .filter(|(l, _)| l == label)
                    .flat_map(|(_, rows)| rows.iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Labels in write order
    pub fn labels(&self) -> Vec<String> {
        self.batches
            .lock()
            .map(|batches| batches.iter().map(|(l, _)| l.clone()).collect())
            .unwrap_or_default()
    }
}

impl<R: Record> RecordSink<R> for MemorySink<R> {
    fn write(&self, label: &str, records: &[R]) -> OutputResult<PathBuf> {
        let mut batches = self
            .batches
            .lock()
            .map_err(|e| crate::output::OutputError::Write(e.to_string()))?;
        batches.push((label.to_string(), records.to_vec()));
        Ok(PathBuf::from(format!("memory://{}", label)))
    }
}
