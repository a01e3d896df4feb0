//! Download orchestrator implementation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;
use crate::engine::DownloadEngine;
use crate::store::ItemRepository;

use super::aggregator::ProgressAggregator;
use super::types::{JobOutcome, OrchestratorError};

/// Starts download jobs and tracks how many are running.
pub struct DownloadOrchestrator {
    config: OrchestratorConfig,
    repository: ItemRepository,
    engine: Arc<dyn DownloadEngine>,
    active_jobs: Arc<AtomicUsize>,
}

impl DownloadOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        repository: ItemRepository,
        engine: Arc<dyn DownloadEngine>,
    ) -> Self {
        Self {
            config,
            repository,
            engine,
            active_jobs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start downloading the stored item `id` on a background task.
    ///
    /// Returns once the job is spawned. Engine failures after this point end
    /// the job and are only logged. Starting the same id twice runs two jobs.
    pub fn start_download(&self, id: &str) -> Result<JobHandle, OrchestratorError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(OrchestratorError::InvalidArgument(
                "id must not be empty".to_string(),
            ));
        }

        let item = self
            .repository
            .get_item(id)?
            .ok_or_else(|| OrchestratorError::NotFound(id.to_string()))?;

        let (tx, rx) = mpsc::channel(self.config.progress_buffer.max(1));
        let aggregator = ProgressAggregator::new(self.repository.clone());
        let engine = Arc::clone(&self.engine);
        let guard = ActiveJobGuard::enter(Arc::clone(&self.active_jobs));
        let job_id = item.id.clone();
        let locator = item.magnet_link;

        info!(id = %job_id, engine = engine.name(), title = %item.title, "Starting download");

        let task = tokio::spawn(async move {
            let _guard = guard;
            let (started, outcome) =
                tokio::join!(engine.start(&locator, tx), aggregator.run(&job_id, rx));

            if let Err(e) = started {
                warn!(id = %job_id, error = %e, "Engine failed to start download");
            }
            info!(
                id = %job_id,
                updates = outcome.updates_applied,
                dropped = outcome.updates_dropped,
                finished = outcome.finished,
                "Download job ended"
            );
            outcome
        });

        Ok(JobHandle {
            id: item.id,
            task,
        })
    }

    /// Number of jobs whose task has not ended yet.
    pub fn active_jobs(&self) -> usize {
        self.active_jobs.load(Ordering::SeqCst)
    }
}

/// Handle to a spawned job. Dropping it leaves the job running.
pub struct JobHandle {
    id: String,
    task: JoinHandle<JobOutcome>,
}

impl JobHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the job to end.
    pub async fn wait(self) -> Result<JobOutcome, OrchestratorError> {
        self.task
            .await
            .map_err(|e| OrchestratorError::JobFailed(e.to_string()))
    }
}

/// Counts a job as active for as long as it is alive.
struct ActiveJobGuard(Arc<AtomicUsize>);

impl ActiveJobGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveJobGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
