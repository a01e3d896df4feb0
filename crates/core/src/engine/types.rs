//! Types for download engines.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::item::DownloadState;

/// Point-in-time progress report from an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    /// Fraction downloaded (0.0 - 1.0).
    pub progress: f64,
    /// Bytes/second.
    pub download_rate: u64,
    /// Bytes/second.
    pub upload_rate: u64,
    pub num_peers: u32,
    pub state: DownloadState,
    /// Where the content is being written, once known.
    pub save_path: Option<String>,
}

impl EngineSnapshot {
    /// The report sent as soon as a job is accepted, before any metadata is
    /// known.
    pub fn metadata_pending() -> Self {
        Self {
            progress: 0.0,
            download_rate: 0,
            upload_rate: 0,
            num_peers: 0,
            state: DownloadState::DownloadingMetadata,
            save_path: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

/// Channel an engine reports progress through. Dropping it ends the job.
pub type ProgressSender = mpsc::Sender<EngineSnapshot>;

/// Errors raised while starting a download.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Failed to start download: {0}")]
    StartFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for download engines.
///
/// `start` returns once the job is accepted; the transfer runs on its own
/// task. The engine must send [`EngineSnapshot::metadata_pending`] first, then
/// real snapshots until one with a finished state, then drop `progress`.
/// Failures after acceptance end the job without a final snapshot.
#[async_trait]
pub trait DownloadEngine: Send + Sync {
    /// Engine name for logging (e.g. "librqbit").
    fn name(&self) -> &str;

    async fn start(&self, locator: &str, progress: ProgressSender) -> Result<(), EngineError>;
}

/// Accept magnet links and http(s) URLs to .torrent files.
pub fn validate_locator(locator: &str) -> Result<(), EngineError> {
    let locator = locator.trim();
    if locator.starts_with("magnet:?")
        || locator.starts_with("http://")
        || locator.starts_with("https://")
    {
        Ok(())
    } else {
        Err(EngineError::InvalidLocator(locator.chars().take(80).collect()))
    }
}
