use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Download jobs still running.
    pub active_jobs: usize,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        active_jobs: state
            .orchestrator()
            .map(|orchestrator| orchestrator.active_jobs())
            .unwrap_or(0),
    })
}

/// Fallback for every unknown route.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "The route was not found.".to_string(),
        }),
    )
}

/// Fallback for a known route called with a method it does not serve.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "The method is not allowed for this route.".to_string(),
        }),
    )
}
