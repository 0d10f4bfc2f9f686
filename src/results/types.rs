//! Result type definitions

use serde::{Deserialize, Serialize};

/// Catalog data found for one library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRecord {
    /// Library (tenant) identifier reported by the catalog page
    pub library: String,
    /// Embedded catalog payload, passed through untouched
    pub data: serde_json::Value,
}

impl LibraryRecord {
    pub fn new(library: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            library: library.into(),
            data,
        }
    }
}

/// Why a target produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentReason {
    /// The page carried no catalog data
    NoData,
    /// Catalog data was present but the library identifier was not
    MissingIdentifier,
    /// The page could not be fetched
    FetchFailed,
    /// The fetch did not finish within the per-target timeout
    Timeout,
    /// The provider could not build a request for the target
    BadTarget,
    /// The worker crashed before producing an outcome
    WorkerFailed,
}

impl std::fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no catalog data"),
            Self::MissingIdentifier => write!(f, "missing library identifier"),
            Self::FetchFailed => write!(f, "fetch failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::BadTarget => write!(f, "invalid target"),
            Self::WorkerFailed => write!(f, "worker failed"),
        }
    }
}

/// What one worker reports back for its target
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found(LibraryRecord),
    Absent(AbsentReason),
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Aggregated body returned to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Records in the order their workers finished
    #[serde(rename = "Overdrive")]
    pub overdrive: Vec<LibraryRecord>,
    /// Reserved for the Cloud Library provider; never populated yet
    #[serde(
        rename = "CloudLibrary",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cloud_library: Option<Vec<LibraryRecord>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_shape() {
        let response = SearchResponse {
            overdrive: vec![LibraryRecord::new("lapl", json!({"title": "Dune"}))],
            cloud_library: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({"Overdrive": [{"library": "lapl", "data": {"title": "Dune"}}]})
        );
    }

    #[test]
    fn test_empty_response_keeps_array() {
        let body = serde_json::to_string(&SearchResponse::default()).unwrap();
        assert_eq!(body, r#"{"Overdrive":[]}"#);
    }
}
