//! CSV artifact writer

use crate::output::traits::{OutputResult, Record, RecordSink};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each flush to `{output_dir}/{label}_{YYYYmmdd_HHMMSS}.csv`
///
/// Column headers come from the record's serialized field names.
#[derive(Debug, Clone)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Picks a file name that does not exist yet
    ///
    /// Two flushes of the same label within one second get a numeric suffix.
    fn artifact_path(&self, label: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut path = self.output_dir.join(format!("{}_{}.csv", label, stamp));
        let mut n = 1;
        while path.exists() {
            path = self
                .output_dir
                .join(format!("{}_{}_{}.csv", label, stamp, n));
            n += 1;
        }
        path
    }
}

impl<R: Record> RecordSink<R> for CsvSink {
    fn write(&self, label: &str, records: &[R]) -> OutputResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.artifact_path(label);

        let mut writer = csv::Writer::from_path(&path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;

        Ok(path)
    }
}
