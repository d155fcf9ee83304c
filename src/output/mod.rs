//! Output module for accumulated records and run summaries
//!
//! This module handles:
//! - Accumulating records per crawl and flushing them exactly once
//! - Dropping exact duplicate records before writing
//! - Writing CSV artifacts
//! - Printing crawl and check statistics

mod accumulator;
mod csv_sink;
mod memory;
pub mod stats;
mod traits;

pub use accumulator::{FlushStatus, ResultAccumulator};
pub use csv_sink::CsvSink;
pub use memory::MemorySink;
pub use stats::{print_check_statistics, print_crawl_statistics, CheckStatistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, Record, RecordSink};
