//! Types for the torrent search system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One search result, carrying every catalog field of an item.
///
/// `id` is stable across searches (the lowercase info hash for Jackett
/// results) and unique within one result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    /// Human-readable size (e.g. "700.00 MB").
    pub size: String,
    pub seeders: u32,
    pub id: String,
    pub category: String,
    pub sub_category: String,
    pub magnet_link: String,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search backend API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for torrent search backends.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Backend name for logging (e.g. "jackett").
    fn name(&self) -> &str;

    /// Resolve a free-text query into candidate torrents.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}
