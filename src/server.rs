//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::compute::{ComputeBackend, IdentityCompute};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ComputeBackend>,
}

/// Create application state from a configuration.
///
/// The server-held compute capability is the identity operation sized to
/// the configured canvas area; a real encrypted operator substitutes here
/// without touching the handlers.
pub fn create_app_state(config: Arc<AppConfig>) -> AppState {
    let area = config.watermark.canvas * config.watermark.canvas;
    let backend: Arc<dyn ComputeBackend> = Arc::new(IdentityCompute::new(area));
    AppState { config, backend }
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/compute", post(handle_compute))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

// Wrapper handler to extract state components for the underlying API handler

async fn handle_compute(
    axum::extract::State(state): axum::extract::State<AppState>,
    body: axum::Json<crate::services::compute::ComputeRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    api::handle_compute(axum::extract::State(state.backend), body).await
}
