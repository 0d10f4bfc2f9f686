//! Settings structures for libsearch configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Placeholder substituted with a library domain in provider URL templates
pub const DOMAIN_PLACEHOLDER: &str = "{domain}";

/// Main settings structure, loadable from `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.outgoing.validate()?;
        Ok(settings)
    }

    /// Merge with environment variables (`PORT` and the `LIBSEARCH_*` prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// `LIBSEARCH_PORT` wins over the plain `PORT` most hosting platforms set.
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["PORT", "LIBSEARCH_PORT"] {
            if let Some(port) = var(key).and_then(|v| v.trim().parse().ok()) {
                self.server.port = port;
            }
        }
        if let Some(val) = var("LIBSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(timeout) = var("LIBSEARCH_REQUEST_TIMEOUT")
            .and_then(|v| v.trim().parse().ok())
            .filter(|t| is_valid_timeout(*t))
        {
            self.outgoing.request_timeout = timeout;
        }
    }

    /// Get all enabled providers
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }

    /// Per-target timeout, clamped to the configured maximum
    pub fn effective_timeout(&self) -> Duration {
        self.outgoing.effective_timeout()
    }
}

/// Timeouts must be positive and small enough to fit a `Duration`
fn is_valid_timeout(secs: f64) -> bool {
    secs > 0.0 && Duration::try_from_secs_f64(secs).is_ok()
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Instance name reported in logs and `/health`
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            instance_name: "libsearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-target request timeout in seconds
    pub request_timeout: f64,
    /// Upper bound for `request_timeout`
    pub max_request_timeout: Option<f64>,
    /// Browser identity sent to catalog endpoints
    pub user_agent: String,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl OutgoingSettings {
    /// Reject timeouts that are not positive, finite seconds
    pub fn validate(&self) -> Result<()> {
        if !is_valid_timeout(self.request_timeout) {
            bail!("invalid request_timeout: {}", self.request_timeout);
        }
        if let Some(max) = self.max_request_timeout {
            if !is_valid_timeout(max) {
                bail!("invalid max_request_timeout: {}", max);
            }
        }
        Ok(())
    }

    /// Request timeout clamped to `max_request_timeout`
    ///
    /// Falls back to the default when the configured values are unusable.
    pub fn effective_timeout(&self) -> Duration {
        let secs = match self.max_request_timeout {
            Some(max) if is_valid_timeout(max) => self.request_timeout.min(max),
            _ => self.request_timeout,
        };
        if is_valid_timeout(secs) {
            Duration::from_secs_f64(secs)
        } else {
            Duration::from_secs(crate::DEFAULT_TIMEOUT)
        }
    }
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            max_request_timeout: Some(30.0),
            user_agent: crate::network::DEFAULT_USER_AGENT.to_string(),
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// A catalog provider and the library domains searched through it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider implementation to use
    pub provider: String,
    /// Display name
    pub display_name: Option<String>,
    /// Search URL with a `{domain}` placeholder
    pub url_template: String,
    /// Library domains substituted into the template
    pub domains: Vec<String>,
    /// Whether the provider is disabled
    pub disabled: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            display_name: None,
            url_template: String::new(),
            domains: Vec::new(),
            disabled: false,
        }
    }
}

impl ProviderConfig {
    /// Check that the URL template can be resolved against a domain
    pub fn has_domain_placeholder(&self) -> bool {
        self.url_template.contains(DOMAIN_PLACEHOLDER)
    }
}

/// Default provider table
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "overdrive".to_string(),
            provider: "overdrive".to_string(),
            display_name: Some("Overdrive".to_string()),
            url_template: "https://{domain}.overdrive.com/search".to_string(),
            domains: ["lapl", "nypl", "erl", "portphillip", "boroondara", "baysidelibrary"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            ..Default::default()
        },
        // Not implemented yet; kept so the domain list lives with the others.
        ProviderConfig {
            name: "cloudlibrary".to_string(),
            provider: "cloudlibrary".to_string(),
            display_name: Some("Cloud Library".to_string()),
            url_template:
                "https://ebook.yourcloudlibrary.com/uisvc/{domain}/Search/CatalogSearch?media=all&src=lib"
                    .to_string(),
            domains: ["melbourne", "hobsonsbay", "yarra"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            disabled: true,
            ..Default::default()
        },
    ]
}
