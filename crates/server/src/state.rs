use std::sync::Arc;

use torrentino_core::{DownloadOrchestrator, ItemRepository, Searcher};

/// Shared application state
pub struct AppState {
    repository: ItemRepository,
    searcher: Option<Arc<dyn Searcher>>,
    orchestrator: Option<Arc<DownloadOrchestrator>>,
}

impl AppState {
    pub fn new(
        repository: ItemRepository,
        searcher: Option<Arc<dyn Searcher>>,
        orchestrator: Option<Arc<DownloadOrchestrator>>,
    ) -> Self {
        Self {
            repository,
            searcher,
            orchestrator,
        }
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    /// Search backend, if one is configured.
    pub fn searcher(&self) -> Option<&Arc<dyn Searcher>> {
        self.searcher.as_ref()
    }

    /// Download orchestrator, if a download engine is configured.
    pub fn orchestrator(&self) -> Option<&Arc<DownloadOrchestrator>> {
        self.orchestrator.as_ref()
    }
}
