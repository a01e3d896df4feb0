//! Types for the download orchestrator.

use thiserror::Error;

use crate::item::DownloadStatus;
use crate::store::StoreError;

/// Errors that can occur when starting or awaiting a job.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// No item stored under the requested id.
    #[error("item not found: {0}")]
    NotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The job task panicked or was aborted.
    #[error("job failed: {0}")]
    JobFailed(String),
}

/// Result of applying one snapshot to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The item was updated with this status.
    Stored(DownloadStatus),
    /// No item exists for the id; the snapshot was discarded.
    Dropped,
}

/// Summary of a finished job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutcome {
    pub updates_applied: usize,
    pub updates_dropped: usize,
    /// Whether a finished snapshot was stored.
    pub finished: bool,
}
