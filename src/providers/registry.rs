//! Provider registry holding the catalog providers and their library domains

use super::traits::Provider;
use crate::config::ProviderConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of all loaded providers
///
/// Built once at startup and only read afterwards, so it is shared between
/// requests behind an `Arc` without locking.
pub struct ProviderRegistry {
    /// Providers by name
    providers: HashMap<String, Arc<dyn Provider>>,
    /// Provider configurations (carry the domain lists)
    configs: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            configs: HashMap::new(),
        }
    }

    /// Register a provider under its config name
    pub fn register(&mut self, provider: Arc<dyn Provider>, config: ProviderConfig) {
        let name = if config.name.is_empty() {
            provider.name().to_string()
        } else {
            config.name.clone()
        };
        self.providers.insert(name.clone(), provider);
        self.configs.insert(name, config);
    }

    /// Get a provider by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(name)
    }

    /// Library domains configured for a provider
    pub fn domains(&self, name: &str) -> &[String] {
        self.configs
            .get(name)
            .map(|c| c.domains.as_slice())
            .unwrap_or_default()
    }

    /// Check if a provider exists
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
