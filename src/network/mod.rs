//! HTTP networking module
//!
//! Provides the client used to fetch catalog search pages.

mod client;
mod user_agent;

pub use client::{FetchError, Fetcher, HttpClient};
pub use user_agent::DEFAULT_USER_AGENT;
