//! Search orchestration module
//!
//! Fans a query out to every library domain of a provider, one worker per
//! domain, and gathers exactly one outcome from each.

mod executor;
mod models;
mod worker;

pub use executor::{Search, DEFAULT_PROVIDER};
pub use models::*;
pub use worker::WorkerReport;
