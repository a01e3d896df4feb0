//! Status API handler.

use std::sync::Arc;

use axum::{extract::State, Json};

use torrentino_core::Item;

use super::ApiError;
use crate::state::AppState;

/// GET /status
///
/// Every stored item, ordered by id, with its ETA recomputed at read time.
pub async fn list_statuses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let mut items = state.repository().list_items()?;
    for item in items.iter_mut() {
        item.refresh_eta();
    }
    Ok(Json(items))
}
