//! Search API handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use torrentino_core::{Item, SearchHit};

use super::params::{last_value, QueryPairs};
use super::ApiError;
use crate::state::AppState;

/// GET /search?query=...
///
/// Search the configured backend and store every hit. Items already stored
/// keep their download status; the response never carries one.
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: QueryPairs,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let query = ApiError::require(last_value(params, "query"), "query")?;

    let searcher = state
        .searcher()
        .ok_or(ApiError::NotConfigured("Search backend"))?;

    let hits = searcher.search(&query).await?;

    for hit in &hits {
        state
            .repository()
            .store_discovered(Item::from(hit.clone()))?;
    }

    info!(
        query = %query,
        searcher = searcher.name(),
        results = hits.len(),
        "Search stored"
    );

    Ok(Json(hits))
}
