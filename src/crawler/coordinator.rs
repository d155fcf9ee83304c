//! Crawler coordinator - runs several crawls concurrently
//!
//! Each selected crawler gets its own worker, its own adapter instance and
//! its own HTTP session. A crawler that fails or panics is reported in its
//! outcome; the other crawlers keep running.

use crate::adapter::{CrawlAdapter, CrawlerRegistry, Factory};
use crate::config::{Config, HttpConfig};
use crate::crawler::{run_crawler, CrawlOutcome, PaginationSettings, Product};
use crate::http::HttpSession;
use crate::output::RecordSink;
use crate::pool::WorkerPool;
use crate::ScoutError;
use std::sync::Arc;
use tracing::{error, info};

/// Main crawler coordinator structure
pub struct Coordinator {
    registry: CrawlerRegistry,
    http: HttpConfig,
    settings: PaginationSettings,
    sink: Arc<dyn RecordSink<Product>>,
    workers: usize,
}

impl Coordinator {
    /// Creates a coordinator over the registered crawlers
    ///
    /// # Arguments
    ///
    /// * `config` - Request, pacing and worker settings
    /// * `registry` - Crawlers that can be selected by name
    /// * `sink` - Destination of every crawl's records
    pub fn new(
        config: &Config,
        registry: CrawlerRegistry,
        sink: Arc<dyn RecordSink<Product>>,
    ) -> Self {
        Self {
            registry,
            http: config.http.clone(),
            settings: PaginationSettings::from_config(&config.crawl),
            sink,
            workers: config.crawl.workers,
        }
    }

    /// Overrides the worker pool size
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn registry(&self) -> &CrawlerRegistry {
        &self.registry
    }

    /// Runs a single crawler by name
    pub async fn run_one(&self, name: &str) -> Result<CrawlOutcome, ScoutError> {
        let factory = self.registry.factory(name)?;
        let mut outcomes = self.run_factories(vec![(name.to_string(), factory)]).await;
        Ok(outcomes.remove(0))
    }

    /// Runs the named crawlers
    ///
    /// Every name is resolved before anything starts, so an unknown name
    /// fails the whole call with `UnknownAdapter`.
    pub async fn run_named(&self, names: &[String]) -> Result<Vec<CrawlOutcome>, ScoutError> {
        let factories = names
            .iter()
            .map(|name| Ok((name.clone(), self.registry.factory(name)?)))
            .collect::<Result<Vec<_>, ScoutError>>()?;
        Ok(self.run_factories(factories).await)
    }

    /// Runs every registered crawler
    pub async fn run_all(&self) -> Vec<CrawlOutcome> {
        self.run_factories(self.registry.factories()).await
    }

    async fn run_factories(
        &self,
        factories: Vec<(String, Factory<dyn CrawlAdapter>)>,
    ) -> Vec<CrawlOutcome> {
        let pool = WorkerPool::new(self.workers);
        info!(
            "Starting {} crawlers with {} workers",
            factories.len(),
            pool.size()
        );

        let jobs: Vec<_> = factories
            .into_iter()
            .map(|(name, factory)| {
                let http_config = self.http.clone();
                let settings = self.settings.clone();
                let sink = Arc::clone(&self.sink);
                let label = name.clone();
                (name, async move {
                    let adapter = factory();
                    let http = match HttpSession::new(&http_config) {
                        Ok(http) => http,
                        Err(e) => {
                            error!("[{}] Failed to build HTTP session: {}", label, e);
                            return CrawlOutcome::failed(label, e.to_string());
                        }
                    };
                    run_crawler(adapter.as_ref(), &http, &settings, sink.as_ref()).await
                })
            })
            .collect();

        let outcomes: Vec<CrawlOutcome> = pool
            .run_all(jobs)
            .await
            .into_iter()
            .map(|(name, result)| {
                result.unwrap_or_else(|fault| {
                    error!("[{}] Crawler failed: {}", name, fault);
                    CrawlOutcome::failed(name, fault.to_string())
                })
            })
            .collect();

        let failed = outcomes.iter().filter(|o| !o.success).count();
        info!(
            "All crawlers finished: {} succeeded, {} failed",
            outcomes.len() - failed,
            failed
        );
        outcomes
    }
}
