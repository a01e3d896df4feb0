//! Download API handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use super::params::{last_value, QueryPairs};
use super::ApiError;
use crate::state::AppState;

/// Serializes as an empty JSON object.
#[derive(Debug, Serialize)]
pub struct DownloadStarted {}

/// GET /download?id=...
///
/// Start a background download of a stored item and return immediately.
pub async fn start_download(
    State(state): State<Arc<AppState>>,
    params: QueryPairs,
) -> Result<Json<DownloadStarted>, ApiError> {
    let id = ApiError::require(last_value(params, "id"), "id")?;

    if !state.repository().contains(&id)? {
        return Err(ApiError::NotFound(
            "Couldn't find torrent for id.".to_string(),
        ));
    }

    let orchestrator = state
        .orchestrator()
        .ok_or(ApiError::NotConfigured("Download engine"))?;

    let job = orchestrator.start_download(&id)?;
    info!(id = job.id(), "Download requested");

    Ok(Json(DownloadStarted {}))
}
