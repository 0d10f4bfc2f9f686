//! Provider loader for initializing providers from configuration

use super::overdrive;
use super::registry::ProviderRegistry;
use super::traits::{Provider, ProviderError};
use crate::config::{ProviderConfig, Settings};
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all enabled providers from settings
    ///
    /// A provider that fails to initialize is skipped with a warning rather
    /// than preventing startup.
    pub fn load(settings: &Settings) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        for config in settings.providers.iter().filter(|c| c.disabled) {
            info!("Skipping disabled provider: {}", config.name);
        }

        for config in settings.enabled_providers() {
            match Self::create_provider(&config.provider, config) {
                Ok(provider) => {
                    info!(
                        "Loaded provider: {} ({} domains)",
                        config.name,
                        config.domains.len()
                    );
                    registry.register(provider, config.clone());
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        registry
    }

    /// Create a provider instance by type
    fn create_provider(
        provider_type: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        let mut provider: Box<dyn Provider> = match provider_type {
            "overdrive" => Box::new(overdrive::Overdrive::new()),
            other => return Err(ProviderError::Unsupported(other.to_string())),
        };

        provider.init(config)?;

        Ok(Arc::from(provider))
    }
}
