//! Catalog provider module
//!
//! Defines the Provider trait and a registry of the configured providers.

mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod overdrive;

pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;
