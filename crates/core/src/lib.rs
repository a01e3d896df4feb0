pub mod config;
pub mod engine;
pub mod item;
pub mod orchestrator;
pub mod searcher;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    JackettConfig, LibrqbitConfig, OrchestratorConfig, SearcherBackend, SearcherConfig,
    ServerConfig, TorrentClientBackend, TorrentClientConfig,
};
pub use engine::{DownloadEngine, EngineError, EngineSnapshot, LibrqbitEngine, ProgressSender};
pub use item::{
    compute_eta, format_rate, format_size, parse_size, DownloadState, DownloadStatus, Item,
};
pub use orchestrator::{
    ApplyOutcome, DownloadOrchestrator, JobHandle, JobOutcome, OrchestratorError,
    ProgressAggregator,
};
pub use searcher::{JackettSearcher, SearchError, SearchHit, Searcher};
pub use store::{
    ItemRepository, Record, RecordUpdate, SqliteStateStore, StateStore, StoreError,
};
