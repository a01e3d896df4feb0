//! Types for items and their download status.

use serde::{Deserialize, Serialize};

use super::metrics::{compute_eta, parse_size};
use crate::engine::EngineSnapshot;
use crate::searcher::SearchHit;

/// Lifecycle state of a download.
///
/// Serialized with the variant name (`"DownloadingMetadata"`). Engine states
/// that mean "all data present" (finished, seeding) map to `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadState {
    Queued,
    Checking,
    #[serde(alias = "Downloading Metadata")]
    DownloadingMetadata,
    Downloading,
    Finished,
    Allocating,
}

impl DownloadState {
    /// Returns the string representation for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Queued => "Queued",
            DownloadState::Checking => "Checking",
            DownloadState::DownloadingMetadata => "DownloadingMetadata",
            DownloadState::Downloading => "Downloading",
            DownloadState::Finished => "Finished",
            DownloadState::Allocating => "Allocating",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, DownloadState::Finished)
    }
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known status of a download job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadStatus {
    /// Fraction downloaded (0.0 - 1.0).
    #[serde(default)]
    pub progress: f64,
    /// Download rate in bytes/second.
    #[serde(rename = "download_speed", default)]
    pub download_rate: u64,
    /// Upload rate in bytes/second.
    #[serde(rename = "upload_speed", default)]
    pub upload_rate: u64,
    #[serde(default)]
    pub num_peers: u32,
    #[serde(default = "default_state")]
    pub state: DownloadState,
    #[serde(default)]
    pub is_finished: bool,
    /// Estimated seconds remaining.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<f64>,
}

fn default_state() -> DownloadState {
    DownloadState::Downloading
}

impl DownloadStatus {
    /// Build the canonical status from an engine snapshot for content of
    /// `total_bytes` size.
    pub fn from_snapshot(snapshot: &EngineSnapshot, total_bytes: f64) -> Self {
        Self {
            progress: snapshot.progress,
            download_rate: snapshot.download_rate,
            upload_rate: snapshot.upload_rate,
            num_peers: snapshot.num_peers,
            state: snapshot.state,
            is_finished: snapshot.state.is_finished(),
            eta: compute_eta(total_bytes, snapshot.progress, snapshot.download_rate),
        }
    }
}

/// A torrent discovered by a search, with its download state if one was
/// started.
///
/// Field order is the wire order of the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub title: String,
    /// Human-readable size (e.g. "700 MB").
    pub size: String,
    pub seeders: u32,
    pub id: String,
    pub category: String,
    pub sub_category: String,
    /// Locator handed to the download engine.
    pub magnet_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DownloadStatus>,
    /// Local storage path, once the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Item {
    /// Size of the content in bytes, parsed from the size string.
    pub fn size_in_bytes(&self) -> f64 {
        parse_size(&self.size)
    }

    /// Recompute the status ETA from the current rate, progress and size.
    pub fn refresh_eta(&mut self) {
        let total = self.size_in_bytes();
        if let Some(status) = self.status.as_mut() {
            status.eta = compute_eta(total, status.progress, status.download_rate);
        }
    }

    /// Take catalog fields from a newer search result, keeping the download
    /// status and path already recorded for this item.
    pub fn merge_discovered(&mut self, found: Item) {
        self.title = found.title;
        self.size = found.size;
        self.seeders = found.seeders;
        self.category = found.category;
        self.sub_category = found.sub_category;
        self.magnet_link = found.magnet_link;
    }
}

impl From<SearchHit> for Item {
    fn from(hit: SearchHit) -> Self {
        Self {
            title: hit.title,
            size: hit.size,
            seeders: hit.seeders,
            id: hit.id,
            category: hit.category,
            sub_category: hit.sub_category,
            magnet_link: hit.magnet_link,
            status: None,
            path: None,
        }
    }
}
