//! Run statistics
//!
//! Summaries printed at the end of a crawl or check run.

use crate::check::{Availability, PlatformResponse};
use crate::crawler::CrawlOutcome;
use std::collections::BTreeMap;

/// Totals over the outcomes of one crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Number of crawlers that ran
    pub crawlers: usize,

    /// Crawlers that finished without error
    pub succeeded: usize,

    /// Names of crawlers that failed
    pub failed: Vec<String>,

    /// Pages fetched across all crawlers
    pub total_pages: u64,

    /// Unique rows written across all crawlers
    pub total_records: usize,
}

impl CrawlStatistics {
    pub fn from_outcomes(outcomes: &[CrawlOutcome]) -> Self {
        let mut stats = CrawlStatistics {
            crawlers: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            if outcome.success {
                stats.succeeded += 1;
            } else {
                stats.failed.push(outcome.crawler.clone());
            }
            stats.total_pages += u64::from(outcome.pages);
            stats.total_records += outcome.records;
        }

        stats
    }

    /// Percentage of crawlers that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.crawlers > 0 {
            (self.succeeded as f64 / self.crawlers as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints one line per crawler followed by the totals
pub fn print_crawl_statistics(outcomes: &[CrawlOutcome]) {
    let stats = CrawlStatistics::from_outcomes(outcomes);

    println!("=== Crawl Summary ===\n");
    for outcome in outcomes {
        let status = if outcome.success { "ok" } else { "FAILED" };
        println!(
            "  {:<16} {:<6} {:>4} pages {:>6} rows  {:.1}s  ({})",
            outcome.crawler,
            status,
            outcome.pages,
            outcome.records,
            outcome.elapsed.as_secs_f64(),
            outcome.stop
        );
        if let Some(path) = &outcome.output {
            println!("  {:<16} -> {}", "", path.display());
        }
    }
    println!();

    if !stats.failed.is_empty() {
        println!("Failed crawlers ({}):", stats.failed.len());
        for name in &stats.failed {
            println!("  - {}", name);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} crawlers, {} pages, {} rows)",
        stats.success_rate(),
        stats.succeeded,
        stats.crawlers,
        stats.total_pages,
        stats.total_records
    );
}

/// Counts of availability outcomes over one check run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckStatistics {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    pub invalid: usize,
    pub failed: usize,

    /// Failure count per platform
    pub failures_by_platform: BTreeMap<String, usize>,
}

impl CheckStatistics {
    pub fn from_responses(responses: &[PlatformResponse]) -> Self {
        let mut stats = CheckStatistics {
            total: responses.len(),
            ..Default::default()
        };

        for response in responses {
            match response.outcome() {
                Availability::Available => stats.available += 1,
                Availability::Unavailable => stats.unavailable += 1,
                Availability::Invalid => stats.invalid += 1,
                Availability::Failure => {
                    stats.failed += 1;
                    *stats
                        .failures_by_platform
                        .entry(response.platform.clone())
                        .or_insert(0) += 1;
                }
            }
        }

        stats
    }
}

/// Prints per-query results grouped by query, then the totals
pub fn print_check_statistics(responses: &[PlatformResponse]) {
    let stats = CheckStatistics::from_responses(responses);

    println!("=== Check Summary ===\n");

    let mut by_query: BTreeMap<&str, Vec<&PlatformResponse>> = BTreeMap::new();
    for response in responses {
        by_query.entry(&response.query).or_default().push(response);
    }

    for (query, results) in by_query {
        println!("{}:", query);
        for response in results {
            let status = match response.outcome() {
                Availability::Available => "available",
                Availability::Unavailable => "taken",
                Availability::Invalid => "invalid",
                Availability::Failure => "error",
            };
            println!(
                "  {:<12} {:<10} {}",
                response.platform, status, response.message
            );
        }
        println!();
    }

    println!(
        "Totals: {} checks, {} available, {} taken, {} invalid, {} errors",
        stats.total, stats.available, stats.unavailable, stats.invalid, stats.failed
    );
    for (platform, count) in &stats.failures_by_platform {
        println!("  {} errors on {}", count, platform);
    }
}
