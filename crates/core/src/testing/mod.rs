//! Testing utilities and mock implementations.
//!
//! Mocks for the search and engine traits let the API and the orchestrator
//! be exercised end to end without a Jackett server or a torrent swarm.
//!
//! # Example
//!
//! ```rust,ignore
//! use torrentino_core::testing::{fixtures, MockEngine, MockSearcher};
//!
//! let searcher = MockSearcher::with_results(vec![fixtures::game_of_thrones()]);
//! let engine = MockEngine::new();
//!
//! // Script what the engine reports for one locator
//! engine.set_script("magnet:?xt=urn:btih:abc123", fixtures::download_script(4, 1024)).await;
//! ```

mod mock_engine;
mod mock_searcher;

pub use mock_engine::{MockEngine, RecordedStart};
pub use mock_searcher::MockSearcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::engine::EngineSnapshot;
    use crate::item::DownloadState;
    use crate::searcher::SearchHit;

    /// Create a search hit with reasonable defaults.
    pub fn search_hit(title: &str, id: &str, size: &str, seeders: u32) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            size: size.to_string(),
            seeders,
            id: id.to_string(),
            category: "Video".to_string(),
            sub_category: "Movies".to_string(),
            magnet_link: format!("magnet:?xt=urn:btih:{}", id),
        }
    }

    /// The `abc123` episode used across end-to-end tests.
    pub fn game_of_thrones() -> SearchHit {
        SearchHit {
            category: "Video".to_string(),
            sub_category: "TV shows".to_string(),
            ..search_hit("Game of Thrones S01E01 720p", "abc123", "700 MB", 120)
        }
    }

    /// A download that completes in `steps` equal increments at `rate`
    /// bytes/second. The last snapshot is finished with no rate.
    pub fn download_script(steps: u32, rate: u64) -> Vec<EngineSnapshot> {
        let steps = steps.max(1);
        (1..=steps)
            .map(|i| {
                let done = i == steps;
                EngineSnapshot {
                    progress: i as f64 / steps as f64,
                    download_rate: if done { 0 } else { rate },
                    upload_rate: 0,
                    num_peers: if done { 0 } else { 8 },
                    state: if done {
                        DownloadState::Finished
                    } else {
                        DownloadState::Downloading
                    },
                    save_path: None,
                }
            })
            .collect()
    }
}
