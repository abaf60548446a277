//! API routes for the suitability server.

pub mod analyze;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(analyze::home))
        .route("/health", get(analyze::service_health))
        .route("/api/analyze", post(analyze::analyze_site))
        .route("/api/analyze/batch", post(analyze::analyze_batch))
        .route("/api/analyze/health", get(analyze::analyze_health))
}
