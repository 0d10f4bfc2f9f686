//! libsearch: checks which online libraries can lend a book
//!
//! A query is sent to every configured library catalog at once, the catalog
//! data each search page embeds is pulled out, and the records that came back
//! are returned together as JSON.

pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::{Provider, ProviderRegistry};
pub use results::{LibraryRecord, ResultContainer, SearchResponse};
pub use search::{Search, SearchQuery};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for catalog requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
