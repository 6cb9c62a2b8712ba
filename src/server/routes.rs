//! Route definitions for mimird.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::orchestrator::Orchestrator;

/// Create the router with all routes configured.
///
/// CORS stays fully open: the UI is served from a different origin.
pub fn create_router(state: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/explain/{subject}/{topic}", get(handlers::explain))
        .route("/solve", post(handlers::solve))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
