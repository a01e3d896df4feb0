//! Mock download engine for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixtures;
use crate::engine::{DownloadEngine, EngineError, EngineSnapshot, ProgressSender};

/// A recorded `start` call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedStart {
    pub locator: String,
}

/// Mock implementation of the DownloadEngine trait.
///
/// Each accepted job sends the metadata-pending snapshot, then replays a
/// script of snapshots one `interval` apart and closes the channel. Scripts
/// can be set per locator; other locators use the default script.
///
/// # Example
///
/// ```rust,ignore
/// let engine = MockEngine::new();
/// engine.set_script("magnet:?xt=urn:btih:abc123", fixtures::download_script(10, 2048)).await;
///
/// engine.start("magnet:?xt=urn:btih:abc123", tx).await?;
/// assert_eq!(engine.started().await.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockEngine {
    scripts: Arc<RwLock<HashMap<String, Vec<EngineSnapshot>>>>,
    default_script: Vec<EngineSnapshot>,
    started: Arc<RwLock<Vec<RecordedStart>>>,
    /// If set, the next start will fail with this error.
    next_error: Arc<RwLock<Option<EngineError>>>,
    interval: Duration,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    /// A mock whose jobs finish in four steps at 1 MiB/s, 10ms apart.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(RwLock::new(HashMap::new())),
            default_script: fixtures::download_script(4, 1_048_576),
            started: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            interval: Duration::from_millis(10),
        }
    }

    /// Use a different delay between snapshots.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::new()
        }
    }

    /// Script the snapshots reported for one locator.
    pub async fn set_script(&self, locator: &str, script: Vec<EngineSnapshot>) {
        self.scripts
            .write()
            .await
            .insert(locator.to_string(), script);
    }

    /// Make the next start fail with the given error.
    pub async fn set_next_error(&self, error: EngineError) {
        *self.next_error.write().await = Some(error);
    }

    /// All start calls so far, including failed ones.
    pub async fn started(&self) -> Vec<RecordedStart> {
        self.started.read().await.clone()
    }

    pub async fn start_count(&self) -> usize {
        self.started.read().await.len()
    }
}

#[async_trait]
impl DownloadEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn start(&self, locator: &str, progress: ProgressSender) -> Result<(), EngineError> {
        self.started.write().await.push(RecordedStart {
            locator: locator.to_string(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let script = match self.scripts.read().await.get(locator) {
            Some(script) => script.clone(),
            None => self.default_script.clone(),
        };
        let interval = self.interval;

        tokio::spawn(async move {
            if progress
                .send(EngineSnapshot::metadata_pending())
                .await
                .is_err()
            {
                return;
            }
            for snapshot in script {
                tokio::time::sleep(interval).await;
                if progress.send(snapshot).await.is_err() {
                    return;
                }
            }
        });

        Ok(())
    }
}
