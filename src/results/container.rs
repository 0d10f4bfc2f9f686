//! Result container for gathering worker outcomes

use super::types::*;

/// Collects the outcomes of one search in the order they arrive
///
/// Owned by a single request; the executor drains its channel into it.
#[derive(Debug, Default)]
pub struct ResultContainer {
    records: Vec<LibraryRecord>,
    absent: Vec<(String, AbsentReason)>,
}

impl ResultContainer {
    /// Create a new empty result container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one outcome for a domain; absent outcomes are noted, not returned
    pub fn add_outcome(&mut self, domain: String, outcome: Outcome) {
        match outcome {
            Outcome::Found(record) => self.records.push(record),
            Outcome::Absent(reason) => self.absent.push((domain, reason)),
        }
    }

    /// Records gathered so far, in receipt order
    pub fn records(&self) -> &[LibraryRecord] {
        &self.records
    }

    /// Domains that yielded nothing, with the reason
    pub fn absent(&self) -> &[(String, AbsentReason)] {
        &self.absent
    }

    /// Total number of outcomes received
    pub fn outcome_count(&self) -> usize {
        self.records.len() + self.absent.len()
    }

    /// Get total record count
    pub fn result_count(&self) -> usize {
        self.records.len()
    }

    /// Finish the search and build the response body
    pub fn into_response(self) -> SearchResponse {
        SearchResponse {
            overdrive: self.records,
            cloud_library: None,
        }
    }
}
