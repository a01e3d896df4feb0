//! Mock searcher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::searcher::{SearchError, SearchHit, Searcher};

/// Mock implementation of the Searcher trait.
///
/// Returns the configured hits whose title contains every word of the query
/// (case-insensitive), records queries, and can be told to fail once.
#[derive(Debug, Default)]
pub struct MockSearcher {
    results: Arc<RwLock<Vec<SearchHit>>>,
    searches: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock searcher with predefined results.
    pub fn with_results(results: Vec<SearchHit>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..Self::default()
        }
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<SearchHit>) {
        *self.results.write().await = results;
    }

    /// Queries received so far, in order.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Make the next search fail with the given error.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }
}

fn matches_query(hit: &SearchHit, query: &str) -> bool {
    let title = hit.title.to_lowercase();
    query
        .split_whitespace()
        .all(|word| title.contains(&word.to_lowercase()))
}

#[async_trait]
impl Searcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.searches.write().await.push(query.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .results
            .read()
            .await
            .iter()
            .filter(|hit| matches_query(hit, query))
            .cloned()
            .collect())
    }
}
