use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub searcher: Option<SearcherConfig>,
    #[serde(default)]
    pub torrent_client: Option<TorrentClientConfig>,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    10000
}

/// State store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("torrentino.db")
}

/// Searcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearcherConfig {
    /// Search backend type
    pub backend: SearcherBackend,
    /// Jackett-specific configuration (required when backend = "jackett")
    #[serde(default)]
    pub jackett: Option<JackettConfig>,
}

/// Available search backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearcherBackend {
    Jackett,
}

/// Jackett search backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Download engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TorrentClientConfig {
    pub backend: TorrentClientBackend,
    #[serde(default)]
    pub librqbit: Option<LibrqbitConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TorrentClientBackend {
    Librqbit,
}

/// Embedded librqbit session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrqbitConfig {
    /// Where downloaded content is written.
    #[serde(default = "default_download_path")]
    pub download_path: String,
    /// Fixed TCP listen port (librqbit picks one when unset).
    #[serde(default)]
    pub listen_port: Option<u16>,
    #[serde(default = "default_true")]
    pub enable_dht: bool,
    /// Session persistence folder; no persistence when unset.
    #[serde(default)]
    pub persistence_path: Option<String>,
    /// How often a running job samples engine stats (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

impl Default for LibrqbitConfig {
    fn default() -> Self {
        Self {
            download_path: default_download_path(),
            listen_port: None,
            enable_dht: true,
            persistence_path: None,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

fn default_download_path() -> String {
    "Downloads".to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    1000
}

/// Download orchestrator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrchestratorConfig {
    /// Capacity of the per-job progress channel. A full channel makes the
    /// engine wait until the store has caught up.
    #[serde(default = "default_progress_buffer")]
    pub progress_buffer: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            progress_buffer: default_progress_buffer(),
        }
    }
}

fn default_progress_buffer() -> usize {
    16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "torrentino.db");
        assert!(config.searcher.is_none());
        assert!(config.torrent_client.is_none());
        assert_eq!(config.orchestrator.progress_buffer, 16);
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/items.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/items.sqlite");
    }

    #[test]
    fn test_deserialize_with_searcher_config() {
        let toml = r#"
[searcher]
backend = "jackett"

[searcher.jackett]
url = "http://localhost:9117"
api_key = "test-api-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let searcher = config.searcher.as_ref().unwrap();
        assert_eq!(searcher.backend, SearcherBackend::Jackett);

        let jackett = searcher.jackett.as_ref().unwrap();
        assert_eq!(jackett.url, "http://localhost:9117");
        assert_eq!(jackett.api_key, "test-api-key");
        assert_eq!(jackett.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_with_librqbit_config() {
        let toml = r#"
[torrent_client]
backend = "librqbit"

[torrent_client.librqbit]
download_path = "/srv/downloads"
enable_dht = false
poll_interval_ms = 2000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let tc = config.torrent_client.as_ref().unwrap();
        assert_eq!(tc.backend, TorrentClientBackend::Librqbit);

        let librqbit = tc.librqbit.as_ref().unwrap();
        assert_eq!(librqbit.download_path, "/srv/downloads");
        assert!(!librqbit.enable_dht);
        assert_eq!(librqbit.poll_interval_ms, 2000);
        assert!(librqbit.listen_port.is_none());
        assert!(librqbit.persistence_path.is_none());
    }

    #[test]
    fn test_librqbit_defaults() {
        let config = LibrqbitConfig::default();
        assert_eq!(config.download_path, "Downloads");
        assert!(config.enable_dht);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_unknown_backend_fails() {
        let toml = r#"
[searcher]
backend = "prowlarr"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
