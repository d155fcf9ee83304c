//! Storescout main entry point
//!
//! This is the command-line interface for the Storescout crawl engine.

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storescout::check::execute_queries;
use storescout::config::{load_config, Config};
use storescout::crawler::Coordinator;
use storescout::http::HttpSession;
use storescout::output::{print_check_statistics, print_crawl_statistics, CsvSink, ResultAccumulator};
use storescout::platforms;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Storescout: a resilient storefront crawler
///
/// Storescout crawls paginated product listings into CSV files and checks
/// whether usernames or email addresses are registered on supported
/// platforms.
#[derive(Parser, Debug)]
#[command(name = "storescout")]
#[command(version = "1.0.0")]
#[command(about = "A resilient storefront crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl product listings
    Crawl {
        /// Crawler to run (repeatable)
        #[arg(short = 'c', long = "crawler", value_name = "NAME", required_unless_present = "all")]
        crawlers: Vec<String>,

        /// Run every registered crawler
        #[arg(long, conflicts_with = "crawlers")]
        all: bool,

        /// Number of crawlers running at once
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Check username or email availability
    Check {
        /// Usernames or email addresses to check
        #[arg(required = true, value_name = "QUERY")]
        queries: Vec<String>,

        /// Platform to check (repeatable, default: all)
        #[arg(short, long = "platform", value_name = "NAME")]
        platforms: Vec<String>,

        /// Number of platforms checked at once
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// List registered crawlers and checkers
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if matches!(cli.command, Command::List) {
        return handle_list();
    }

    // The guard flushes the file writer when main returns
    let (log_file, _log_guard) = setup_logging(cli.verbose, cli.quiet, &config.output.log_dir)?;
    tracing::info!("Logging to {}", log_file.display());
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    match cli.command {
        Command::Crawl {
            crawlers,
            all,
            workers,
        } => handle_crawl(config, crawlers, all, workers).await,
        Command::Check {
            queries,
            platforms,
            workers,
        } => handle_check(config, queries, platforms, workers).await,
        Command::List => handle_list(),
    }
}

/// Sets up console and file logging based on verbosity level
///
/// Returns the path of the log file for this run and the guard of its
/// background writer.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_dir: &Path,
) -> anyhow::Result<(PathBuf, WorkerGuard)> {
    let filter = if quiet {
        // Only show errors
        "error"
    } else {
        match verbose {
            0 => "storescout=info,warn",
            1 => "storescout=debug,info",
            2 => "storescout=trace,debug",
            _ => "trace",
        }
    };

    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let file_name = format!("crawl_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
    let (file_writer, guard) = non_blocking(rolling::never(log_dir, &file_name));

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(file_writer),
        )
        .init();

    Ok((log_dir.join(file_name), guard))
}

/// Handles the `list` command
fn handle_list() -> anyhow::Result<()> {
    let crawlers = platforms::crawlers()?;
    let checkers = platforms::checkers()?;

    println!("Crawlers ({}):", crawlers.len());
    for name in crawlers.names() {
        println!("  - {}", name);
    }

    println!("\nCheckers ({}):", checkers.len());
    for name in checkers.names() {
        println!("  - {}", name);
    }

    Ok(())
}

/// Handles the `crawl` command
async fn handle_crawl(
    config: Config,
    crawlers: Vec<String>,
    all: bool,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    let registry = platforms::crawlers()?;
    let sink = Arc::new(CsvSink::new(&config.output.output_dir));
    let mut coordinator = Coordinator::new(&config, registry, sink);
    if let Some(workers) = workers {
        coordinator = coordinator.with_workers(workers);
    }

    let outcomes = if all {
        tracing::info!("Running all crawlers");
        coordinator.run_all().await
    } else {
        tracing::info!("Running crawlers: {}", crawlers.join(", "));
        coordinator.run_named(&crawlers).await?
    };

    print_crawl_statistics(&outcomes);

    let failed = outcomes.iter().filter(|o| !o.success).count();
    if failed > 0 {
        bail!("{} of {} crawlers failed", failed, outcomes.len());
    }
    tracing::info!("Crawl completed successfully");
    Ok(())
}

/// Handles the `check` command
async fn handle_check(
    config: Config,
    queries: Vec<String>,
    platforms: Vec<String>,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    let registry = platforms::checkers()?;
    let selected = if platforms.is_empty() {
        registry.factories()
    } else {
        platforms
            .iter()
            .map(|name| Ok((name.clone(), registry.factory(name)?)))
            .collect::<Result<Vec<_>, storescout::ScoutError>>()?
    };

    let http = Arc::new(HttpSession::new(&config.http).context("Failed to build HTTP session")?);
    let workers = workers.unwrap_or(config.check.workers);
    let responses = execute_queries(selected, &queries, http, workers).await;

    let mut results = ResultAccumulator::new("checks");
    results.extend(responses.iter().cloned());
    results.flush(&CsvSink::new(&config.output.output_dir))?;

    print_check_statistics(&responses);
    Ok(())
}
