//! HTTP request handlers

use super::state::AppState;
use crate::search::SearchQuery;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use tracing::{error, info};

/// Search handler
///
/// Answers 400 with an empty body when `query` is missing or blank. Any other
/// request gets 200 and whatever subset of libraries produced a record. When
/// `query` is repeated only the first value counts.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();

    let param = params
        .into_iter()
        .find_map(|(key, value)| (key == "query").then_some(value));

    let query = match SearchQuery::from_param(param) {
        Ok(query) => query,
        Err(e) => {
            error!("Rejecting search: {}", e);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    info!("Search query received: {}", query);

    let results = state.search.execute(&query).await;
    let response = results.into_response();

    info!(
        "Returning {} records for '{}' in {:?}",
        response.overdrive.len(),
        query,
        start.elapsed()
    );

    Json(response).into_response()
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
