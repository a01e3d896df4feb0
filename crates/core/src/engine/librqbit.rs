//! librqbit embedded download engine.

use std::ops::Range;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use librqbit::{
    AddTorrent, AddTorrentResponse, ManagedTorrent, Session, SessionOptions,
    SessionPersistenceConfig, TorrentStatsState,
};
use tracing::{debug, info, warn};

use super::types::validate_locator;
use super::{DownloadEngine, EngineError, EngineSnapshot, ProgressSender};
use crate::config::LibrqbitConfig;
use crate::item::DownloadState;

/// Download engine backed by an in-process librqbit session.
pub struct LibrqbitEngine {
    session: Arc<Session>,
    download_path: PathBuf,
    poll_interval: Duration,
}

impl LibrqbitEngine {
    /// Create the session from configuration.
    pub async fn new(config: &LibrqbitConfig) -> Result<Self, EngineError> {
        let download_path = PathBuf::from(&config.download_path);

        if !download_path.exists() {
            std::fs::create_dir_all(&download_path).map_err(|e| {
                EngineError::Internal(format!("Failed to create download directory: {}", e))
            })?;
        }

        let mut opts = SessionOptions::default();

        if !config.enable_dht {
            opts.disable_dht = true;
        }

        if let Some(port) = config.listen_port {
            opts.listen_port_range = Some(single_port_range(port)?);
        }

        if let Some(ref persistence_path) = config.persistence_path {
            let persistence_dir = PathBuf::from(persistence_path);
            if !persistence_dir.exists() {
                std::fs::create_dir_all(&persistence_dir).map_err(|e| {
                    EngineError::Internal(format!(
                        "Failed to create persistence directory: {}",
                        e
                    ))
                })?;
            }
            opts.persistence = Some(SessionPersistenceConfig::Json {
                folder: Some(persistence_dir),
            });
        }

        info!(
            download_path = %download_path.display(),
            dht_enabled = !opts.disable_dht,
            poll_interval_ms = config.poll_interval_ms,
            "Initializing librqbit session"
        );

        let session = Session::new_with_opts(download_path.clone(), opts)
            .await
            .map_err(|e| {
                EngineError::Internal(format!("Failed to initialize librqbit session: {}", e))
            })?;

        if let Some(port) = session.tcp_listen_port() {
            info!(port = port, "librqbit listening on TCP port");
        }

        Ok(Self {
            session,
            download_path,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }
}

#[async_trait]
impl DownloadEngine for LibrqbitEngine {
    fn name(&self) -> &str {
        "librqbit"
    }

    async fn start(&self, locator: &str, progress: ProgressSender) -> Result<(), EngineError> {
        validate_locator(locator)?;

        let job = TransferJob {
            session: self.session.clone(),
            download_path: self.download_path.clone(),
            poll_interval: self.poll_interval,
            locator: locator.trim().to_string(),
        };
        tokio::spawn(job.run(progress));

        Ok(())
    }
}

/// One accepted transfer, driven on its own task.
struct TransferJob {
    session: Arc<Session>,
    download_path: PathBuf,
    poll_interval: Duration,
    locator: String,
}

impl TransferJob {
    async fn run(self, progress: ProgressSender) {
        if progress
            .send(EngineSnapshot::metadata_pending())
            .await
            .is_err()
        {
            return;
        }

        // Resolves only once metadata has been fetched for magnet links.
        let response = match self
            .session
            .add_torrent(AddTorrent::from_url(&self.locator), None)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to add torrent");
                return;
            }
        };

        let handle = match response {
            AddTorrentResponse::Added(_, handle) => handle,
            AddTorrentResponse::AlreadyManaged(_, handle) => {
                debug!(name = ?handle.name(), "Torrent already managed by session");
                handle
            }
            AddTorrentResponse::ListOnly(_) => {
                warn!("Torrent was added in list-only mode");
                return;
            }
        };

        let save_path = handle
            .name()
            .map(|name| self.download_path.join(name.to_string()).display().to_string());

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            ticker.tick().await;

            let snapshot = match sample(&handle, save_path.clone()) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    warn!(name = ?handle.name(), error = %error, "Torrent entered error state");
                    return;
                }
            };
            let finished = snapshot.is_finished();

            if progress.send(snapshot).await.is_err() {
                debug!(name = ?handle.name(), "Progress receiver dropped");
                return;
            }
            if finished {
                return;
            }
        }
    }
}

/// Read the current stats of a torrent. Errors with the engine's message
/// when the torrent is in its error state.
fn sample(
    handle: &Arc<ManagedTorrent>,
    save_path: Option<String>,
) -> Result<EngineSnapshot, String> {
    let stats = handle.stats();
    if matches!(stats.state, TorrentStatsState::Error) {
        return Err(stats
            .error
            .clone()
            .unwrap_or_else(|| "unknown error".to_string()));
    }

    let progress = if stats.total_bytes > 0 {
        (stats.progress_bytes as f64 / stats.total_bytes as f64).min(1.0)
    } else {
        0.0
    };

    let (download_rate, upload_rate, num_peers) = stats
        .live
        .as_ref()
        .map(|live| {
            // "mbps" is MiB/s in librqbit
            (
                mib_per_sec_to_bytes(live.download_speed.mbps),
                mib_per_sec_to_bytes(live.upload_speed.mbps),
                live.snapshot.peer_stats.live as u32,
            )
        })
        .unwrap_or((0, 0, 0));

    Ok(EngineSnapshot {
        progress,
        download_rate,
        upload_rate,
        num_peers,
        state: map_state(&stats.state, handle.is_paused(), stats.finished),
        save_path,
    })
}

/// librqbit takes an exclusive range; 65535 has no exclusive upper bound.
fn single_port_range(port: u16) -> Result<Range<u16>, EngineError> {
    let end = port.checked_add(1).ok_or_else(|| {
        EngineError::Internal(format!("listen port {} cannot be used", port))
    })?;
    Ok(port..end)
}

fn mib_per_sec_to_bytes(mbps: f64) -> u64 {
    (mbps * 1024.0 * 1024.0).max(0.0) as u64
}

/// Map librqbit state to a download state.
fn map_state(state: &TorrentStatsState, is_paused: bool, is_finished: bool) -> DownloadState {
    if is_finished {
        return DownloadState::Finished;
    }
    if is_paused {
        return DownloadState::Queued;
    }

    match state {
        TorrentStatsState::Initializing => DownloadState::Checking,
        TorrentStatsState::Live => DownloadState::Downloading,
        TorrentStatsState::Paused => DownloadState::Queued,
        // Reported separately by `sample`.
        TorrentStatsState::Error => DownloadState::Downloading,
    }
}
