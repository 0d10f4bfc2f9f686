//! Provider traits and types

use crate::config::{ProviderConfig, DOMAIN_PLACEHOLDER};
use crate::results::LibraryRecord;
use thiserror::Error;
use url::Url;

/// Why a catalog page yielded no record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no embedded catalog data")]
    NoData,
    #[error("catalog data present but no library identifier")]
    MissingIdentifier,
}

/// Provider setup or URL building failure
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("URL template for '{0}' has no {{domain}} placeholder")]
    MissingPlaceholder(String),
    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("provider '{0}' is not implemented")]
    Unsupported(String),
}

/// Build a search URL by substituting `domain` and appending the escaped query
///
/// The query is form-encoded, so spaces become `+`.
pub fn build_search_url(template: &str, domain: &str, query: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(&template.replace(DOMAIN_PLACEHOLDER, domain))?;
    url.query_pairs_mut().append_pair("query", query);
    Ok(url)
}

/// A library catalog service that embeds its search results in HTML
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Human-readable name
    fn display_name(&self) -> &str {
        self.name()
    }

    /// URL template with a `{domain}` placeholder
    fn url_template(&self) -> &str;

    /// Search URL for one library domain
    fn search_url(&self, domain: &str, query: &str) -> Result<Url, ProviderError> {
        build_search_url(self.url_template(), domain, query)
    }

    /// Pull the library record out of a search page
    fn extract(&self, body: &str) -> Result<LibraryRecord, ExtractError>;

    /// Apply configuration (called once on startup)
    fn init(&mut self, _config: &ProviderConfig) -> Result<(), ProviderError> {
        Ok(())
    }
}
