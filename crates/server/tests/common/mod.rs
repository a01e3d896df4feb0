//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, enabling E2E testing without a Jackett
//! server or a torrent swarm.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use torrentino_core::{
    testing::{MockEngine, MockSearcher, RecordedStart},
    DownloadEngine, DownloadOrchestrator, ItemRepository, OrchestratorConfig, Searcher,
    SqliteStateStore,
};
use torrentino_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use torrentino_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.searcher.set_results(vec![fixtures::game_of_thrones()]).await;
///
///     let response = fixture.get("/search?query=game").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock searcher - configure search results
    pub searcher: Arc<MockSearcher>,
    /// Mock engine - script download progress
    pub engine: Arc<MockEngine>,
    /// Direct access to stored items
    pub repository: ItemRepository,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wire the mock searcher into the app
    pub enable_searcher: bool,
    /// Wire the mock engine (and an orchestrator) into the app
    pub enable_engine: bool,
    /// Delay between scripted engine snapshots
    pub engine_interval: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enable_searcher: true,
            enable_engine: true,
            engine_interval: Duration::from_millis(5),
        }
    }
}

impl TestConfig {
    /// Neither a searcher nor an engine configured.
    pub fn unconfigured() -> Self {
        Self {
            enable_searcher: false,
            enable_engine: false,
            ..Self::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let searcher = Arc::new(MockSearcher::new());
        let engine = Arc::new(MockEngine::with_interval(test_config.engine_interval));

        let store = SqliteStateStore::new(&db_path).expect("Failed to create state store");
        let repository = ItemRepository::new(Arc::new(store));

        let orchestrator = test_config.enable_engine.then(|| {
            Arc::new(DownloadOrchestrator::new(
                OrchestratorConfig::default(),
                repository.clone(),
                Arc::clone(&engine) as Arc<dyn DownloadEngine>,
            ))
        });
        let app_searcher = test_config
            .enable_searcher
            .then(|| Arc::clone(&searcher) as Arc<dyn Searcher>);

        let state = Arc::new(AppState::new(
            repository.clone(),
            app_searcher,
            orchestrator,
        ));

        let router = create_router(state);

        Self {
            router,
            searcher,
            engine,
            repository,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a request without a body.
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            body,
        }
    }

    /// Wait until the engine has received `count` start calls.
    ///
    /// Jobs call the engine from their own task, after `/download` returned.
    pub async fn wait_for_starts(&self, count: usize, timeout: Duration) -> Vec<RecordedStart> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let started = self.engine.started().await;
            if started.len() >= count {
                return started;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "Expected {} engine starts, saw {}",
                count,
                started.len()
            );
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Poll `/status` until the item's status reports finished.
    ///
    /// Returns every distinct status observed for the item, in order.
    pub async fn wait_for_finished(&self, id: &str, timeout: Duration) -> Vec<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut seen: Vec<Value> = Vec::new();

        loop {
            let response = self.get("/status").await;
            let status = find_item(&response.body, id)
                .and_then(|item| item.get("status"))
                .cloned();

            if let Some(status) = status {
                if seen.last() != Some(&status) {
                    seen.push(status.clone());
                }
                if status["is_finished"] == Value::Bool(true) {
                    return seen;
                }
            }

            assert!(
                tokio::time::Instant::now() < deadline,
                "Item {} did not finish in time; seen {:?}",
                id,
                seen
            );
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

/// Find the entry with the given id in a `/status` body.
pub fn find_item<'a>(body: &'a Value, id: &str) -> Option<&'a Value> {
    body.as_array()?.iter().find(|item| item["id"] == id)
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
