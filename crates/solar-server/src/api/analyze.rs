//! Analysis request handlers.

use crate::analysis;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use solar_core::{AnalysisError, SiteAnalysis};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub geometry: Value,
}

#[derive(Debug, Deserialize)]
pub struct BatchAnalysisRequest {
    pub geometries: Vec<Value>,
}

fn error_response(err: &AnalysisError) -> (StatusCode, Json<Value>) {
    let status = if err.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// Analyze a single site polygon.
pub async fn analyze_site(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<SiteAnalysis>, (StatusCode, Json<Value>)> {
    analysis::analyze_site(state.as_ref(), &payload.geometry)
        .await
        .map(Json)
        .map_err(|err| error_response(&err))
}

/// Analyze a batch of polygons sequentially. One item's failure
/// becomes an error record for that item only; siblings still run.
pub async fn analyze_batch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BatchAnalysisRequest>,
) -> Json<Value> {
    let mut results = Vec::with_capacity(payload.geometries.len());
    for geometry in &payload.geometries {
        match analysis::analyze_site(state.as_ref(), geometry).await {
            Ok(analysis) => match serde_json::to_value(&analysis) {
                Ok(value) => results.push(value),
                Err(err) => results.push(json!({
                    "error": format!("failed to serialize result: {err}"),
                    "geometry": geometry,
                })),
            },
            Err(err) => results.push(json!({
                "error": err.to_string(),
                "geometry": geometry,
            })),
        }
    }
    Json(json!({ "results": results }))
}

pub async fn analyze_health() -> impl IntoResponse {
    Json(json!({
        "status": "OK",
        "message": "Analysis API is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn service_health() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}

pub async fn home() -> impl IntoResponse {
    Json(json!({ "message": "Solar suitability service is running" }))
}
