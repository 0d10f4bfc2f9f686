//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::network::Fetcher;
use crate::providers::ProviderRegistry;
use crate::search::Search;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub search: Arc<Search>,
    /// Outcome counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: ProviderRegistry, fetcher: Arc<dyn Fetcher>) -> Self {
        let settings = Arc::new(settings);
        let metrics = Arc::new(Metrics::new());
        let search = Arc::new(
            Search::new(fetcher, Arc::new(registry))
                .with_timeout(settings.effective_timeout())
                .with_metrics(metrics.clone()),
        );

        Self {
            settings,
            search,
            metrics,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
