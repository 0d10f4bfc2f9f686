//! Metrics collection module
//!
//! Tracks per-domain response times and outcome counts across searches.

use crate::results::{AbsentReason, Outcome};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Number of response times kept per domain
const RESPONSE_TIME_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct DomainCounters {
    searches: u64,
    found: u64,
    absent: u64,
    fetch_errors: u64,
    response_times: VecDeque<u64>,
}

/// Process-wide metrics collector
pub struct Metrics {
    /// Total search count
    total_searches: AtomicU64,
    domains: RwLock<HashMap<String, DomainCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            total_searches: AtomicU64::new(0),
            domains: RwLock::new(HashMap::new()),
        }
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome of one target
    pub fn record_outcome(&self, domain: &str, outcome: &Outcome, time_ms: u64) {
        let mut domains = self.domains.write().unwrap_or_else(PoisonError::into_inner);
        let counters = domains.entry(domain.to_string()).or_default();

        counters.searches += 1;
        match outcome {
            Outcome::Found(_) => counters.found += 1,
            Outcome::Absent(AbsentReason::FetchFailed | AbsentReason::Timeout) => {
                counters.absent += 1;
                counters.fetch_errors += 1;
            }
            Outcome::Absent(_) => counters.absent += 1,
        }

        if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
            counters.response_times.pop_front();
        }
        counters.response_times.push_back(time_ms);
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a domain
    pub fn get_avg_response_time(&self, domain: &str) -> Option<u64> {
        let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner);
        domains.get(domain).and_then(|c| avg(&c.response_times))
    }

    /// Snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        let domains = self.domains.read().unwrap_or_else(PoisonError::into_inner);

        MetricsSnapshot {
            total_searches: self.get_total_searches(),
            domains: domains
                .iter()
                .map(|(name, c)| {
                    (
                        name.clone(),
                        DomainStats {
                            searches: c.searches,
                            found: c.found,
                            absent: c.absent,
                            fetch_errors: c.fetch_errors,
                            avg_response_time: avg(&c.response_times),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn avg(times: &VecDeque<u64>) -> Option<u64> {
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }
}

/// Statistics for a single domain
#[derive(Debug, Clone, Serialize)]
pub struct DomainStats {
    pub searches: u64,
    pub found: u64,
    pub absent: u64,
    pub fetch_errors: u64,
    pub avg_response_time: Option<u64>,
}

/// Serializable view of the collector
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub domains: BTreeMap<String, DomainStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::LibraryRecord;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.inc_search();
        let found = Outcome::Found(LibraryRecord::new("lapl", serde_json::json!({})));
        metrics.record_outcome("lapl", &found, 100);
        metrics.record_outcome("lapl", &Outcome::Absent(AbsentReason::Timeout), 300);
        metrics.record_outcome("nypl", &Outcome::Absent(AbsentReason::NoData), 50);

        assert_eq!(metrics.get_total_searches(), 1);
        assert_eq!(metrics.get_avg_response_time("lapl"), Some(200));
        assert_eq!(metrics.get_avg_response_time("erl"), None);

        let snapshot = metrics.snapshot();
        let lapl = &snapshot.domains["lapl"];
        assert_eq!((lapl.searches, lapl.found, lapl.absent, lapl.fetch_errors), (2, 1, 1, 1));
        assert_eq!(snapshot.domains["nypl"].fetch_errors, 0);
    }

    #[test]
    fn test_response_time_window() {
        let metrics = Metrics::new();
        let outcome = Outcome::Absent(AbsentReason::NoData);
        for _ in 0..RESPONSE_TIME_WINDOW {
            metrics.record_outcome("erl", &outcome, 10);
        }
        metrics.record_outcome("erl", &outcome, 10 + RESPONSE_TIME_WINDOW as u64 * 10);
        // Oldest sample dropped: 99 * 10 + 1010 over 100 samples.
        assert_eq!(metrics.get_avg_response_time("erl"), Some(20));
    }
}
