//! Results module
//!
//! Record and outcome types, and the container a search gathers into.

mod container;
mod types;

pub use container::ResultContainer;
pub use types::*;
