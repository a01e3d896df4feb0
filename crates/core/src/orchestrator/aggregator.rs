//! Folding engine snapshots into stored items.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{ApplyOutcome, JobOutcome};
use crate::engine::EngineSnapshot;
use crate::item::{format_rate, DownloadStatus};
use crate::store::{ItemRepository, StoreError};

/// Applies progress snapshots for a job to the item store.
#[derive(Clone)]
pub struct ProgressAggregator {
    repository: ItemRepository,
}

impl ProgressAggregator {
    pub fn new(repository: ItemRepository) -> Self {
        Self { repository }
    }

    /// Store the status derived from `snapshot` on item `id`.
    ///
    /// The ETA is computed from the item's size. A save path reported by the
    /// engine replaces the stored path; an absent one leaves it alone.
    pub fn apply(&self, id: &str, snapshot: &EngineSnapshot) -> Result<ApplyOutcome, StoreError> {
        let updated = self.repository.update_item(id, |item| {
            item.status = Some(DownloadStatus::from_snapshot(
                snapshot,
                item.size_in_bytes(),
            ));
            if let Some(path) = &snapshot.save_path {
                item.path = Some(path.clone());
            }
        })?;

        Ok(match updated.and_then(|item| item.status) {
            Some(status) => ApplyOutcome::Stored(status),
            None => ApplyOutcome::Dropped,
        })
    }

    /// Consume snapshots for job `id` until the engine closes the channel or
    /// a finished status has been stored.
    pub async fn run(&self, id: &str, mut rx: mpsc::Receiver<EngineSnapshot>) -> JobOutcome {
        let mut outcome = JobOutcome::default();

        while let Some(snapshot) = rx.recv().await {
            match self.apply(id, &snapshot) {
                Ok(ApplyOutcome::Stored(status)) => {
                    outcome.updates_applied += 1;
                    debug!(
                        id = %id,
                        state = %status.state,
                        progress = status.progress,
                        rate = %format_rate(status.download_rate as f64),
                        peers = status.num_peers,
                        "Progress update"
                    );
                    if status.is_finished {
                        outcome.finished = true;
                        info!(id = %id, "Download finished");
                        break;
                    }
                }
                Ok(ApplyOutcome::Dropped) => {
                    outcome.updates_dropped += 1;
                    debug!(id = %id, "No stored item, progress update dropped");
                }
                Err(e) => {
                    outcome.updates_dropped += 1;
                    warn!(id = %id, error = %e, "Failed to store progress update");
                }
            }
        }

        outcome
    }
}
