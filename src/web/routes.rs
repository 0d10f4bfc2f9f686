//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{any, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", any(handlers::search))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Every other path searches too.
        .fallback(handlers::search)
        .layer(cors)
        .with_state(state)
}
