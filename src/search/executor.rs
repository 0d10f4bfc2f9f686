//! Search execution and orchestration

use super::models::{SearchQuery, Target};
use super::worker::{self, WorkerContext, WorkerReport};
use crate::metrics::Metrics;
use crate::network::Fetcher;
use crate::providers::{Provider, ProviderRegistry};
use crate::results::{AbsentReason, Outcome, ResultContainer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Provider whose results fill the `Overdrive` field of a response
pub const DEFAULT_PROVIDER: &str = "overdrive";

/// Search executor that fans a query out to every library domain of a provider
pub struct Search {
    /// Fetcher shared by all workers
    fetcher: Arc<dyn Fetcher>,
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Outcome counters
    metrics: Arc<Metrics>,
    /// Per-target timeout
    timeout: Duration,
}

impl Search {
    /// Create a new search executor
    pub fn new(fetcher: Arc<dyn Fetcher>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            fetcher,
            registry,
            metrics: Arc::new(Metrics::new()),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT),
        }
    }

    /// Set per-target timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.min(Duration::from_secs(crate::MAX_TIMEOUT));
        self
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Execute a search against the default provider
    pub async fn execute(&self, query: &SearchQuery) -> ResultContainer {
        self.search_provider(DEFAULT_PROVIDER, query).await
    }

    /// Execute a search against every domain of one provider
    ///
    /// One worker is spawned per domain and exactly one report is drained per
    /// worker. Records come back in completion order, which varies between
    /// runs. Dropping the returned future aborts any workers still running.
    pub async fn search_provider(&self, name: &str, query: &SearchQuery) -> ResultContainer {
        let start = Instant::now();
        let mut container = ResultContainer::new();

        let Some(provider) = self.registry.get(name) else {
            warn!("Provider {} is not loaded", name);
            return container;
        };

        self.metrics.inc_search();

        let targets = self.build_targets(name, provider.as_ref(), query, &mut container);
        if targets.is_empty() {
            return container;
        }

        let ctx = WorkerContext {
            provider: provider.clone(),
            fetcher: self.fetcher.clone(),
            metrics: self.metrics.clone(),
            timeout: self.timeout,
        };

        let (tx, mut rx) = mpsc::channel::<WorkerReport>(targets.len());
        let mut workers = JoinSet::new();

        info!(
            "Searching {} for '{}' across {} libraries",
            provider.display_name(),
            query,
            targets.len()
        );

        for target in targets {
            workers.spawn(worker::run(target, ctx.clone(), tx.clone()));
        }
        // Only workers hold senders now, so the channel closes if one dies silently.
        drop(tx);

        let launched = workers.len();
        let mut received = 0;
        while received < launched {
            match rx.recv().await {
                Some(report) => {
                    received += 1;
                    container.add_outcome(report.domain, report.outcome);
                }
                None => {
                    warn!(
                        "{} of {} workers exited without reporting",
                        launched - received,
                        launched
                    );
                    break;
                }
            }
        }

        info!(
            "Search for '{}' completed in {:?} with {} results",
            query,
            start.elapsed(),
            container.result_count()
        );

        container
    }

    /// Resolve a provider's domains into targets
    ///
    /// Domains whose URL cannot be built are recorded as absent and not launched.
    fn build_targets(
        &self,
        name: &str,
        provider: &dyn Provider,
        query: &SearchQuery,
        container: &mut ResultContainer,
    ) -> Vec<Target> {
        let mut targets = Vec::new();
        for domain in self.registry.domains(name) {
            match provider.search_url(domain, query.as_str()) {
                Ok(url) => {
                    debug!("Target {} -> {}", domain, url);
                    targets.push(Target {
                        provider: name.to_string(),
                        domain: domain.clone(),
                        url,
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", domain, e);
                    container.add_outcome(domain.clone(), Outcome::Absent(AbsentReason::BadTarget));
                }
            }
        }
        targets
    }
}
