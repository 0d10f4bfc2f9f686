//! Overdrive catalog provider
//!
//! Overdrive search pages assign their results to a JavaScript global,
//! `window.OverDrive.mediaItems`, and the library's tenant id to
//! `window.OverDrive.tenant`. Both are pulled out with regexes; the page is
//! never parsed as HTML.

use super::traits::*;
use crate::config::ProviderConfig;
use crate::results::LibraryRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

// Greedy up to the last `;` on the line, as the page emits one statement per line.
static MEDIA_ITEMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"window\.OverDrive\.mediaItems\s*=\s*(.*);").unwrap());

static TENANT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"window\.OverDrive\.tenant\s*=\s*['"]?([^'";\s]+)['"]?\s*;"#).unwrap()
});

/// Overdrive library catalog
pub struct Overdrive {
    display_name: String,
    url_template: String,
}

impl Overdrive {
    pub fn new() -> Self {
        Self {
            display_name: "Overdrive".to_string(),
            url_template: "https://{domain}.overdrive.com/search".to_string(),
        }
    }

    fn parse_media_items(literal: &str) -> serde_json::Value {
        match serde_json::from_str(literal) {
            Ok(value) => value,
            Err(e) => {
                warn!("Malformed Overdrive media items, keeping empty data: {}", e);
                serde_json::Value::Object(serde_json::Map::new())
            }
        }
    }
}

impl Default for Overdrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Overdrive {
    fn name(&self) -> &str {
        "overdrive"
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn url_template(&self) -> &str {
        &self.url_template
    }

    fn extract(&self, body: &str) -> Result<LibraryRecord, ExtractError> {
        let items = MEDIA_ITEMS_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .ok_or(ExtractError::NoData)?;

        let tenant = TENANT_RE
            .captures(body)
            .and_then(|c| c.get(1))
            .ok_or(ExtractError::MissingIdentifier)?;

        Ok(LibraryRecord::new(
            tenant.as_str(),
            Self::parse_media_items(items.as_str()),
        ))
    }

    fn init(&mut self, config: &ProviderConfig) -> Result<(), ProviderError> {
        if !config.url_template.is_empty() {
            if !config.has_domain_placeholder() {
                return Err(ProviderError::MissingPlaceholder(config.name.clone()));
            }
            self.url_template = config.url_template.clone();
        }
        if let Some(ref display_name) = config.display_name {
            self.display_name = display_name.clone();
        }
        Ok(())
    }
}
