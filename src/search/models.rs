//! Search query and target models

use thiserror::Error;
use url::Url;

/// Rejected search input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query parameter is missing or empty")]
    Empty,
}

/// A validated search query
///
/// The text is kept verbatim; escaping happens when target URLs are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
}

impl SearchQuery {
    /// Validate caller input; blank text is rejected
    pub fn new(query: impl Into<String>) -> Result<Self, QueryError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self { query })
    }

    /// Validate an optional query parameter
    pub fn from_param(param: Option<String>) -> Result<Self, QueryError> {
        param.ok_or(QueryError::Empty).and_then(Self::new)
    }

    /// The query text
    pub fn as_str(&self) -> &str {
        &self.query
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.query)
    }
}

/// One library domain under one provider, resolved for a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Provider name
    pub provider: String,
    /// Library domain
    pub domain: String,
    /// Fully built search URL
    pub url: Url,
}
