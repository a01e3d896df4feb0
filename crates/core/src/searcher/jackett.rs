//! Jackett search backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::JackettConfig;
use crate::item::format_size;

use super::dedup::deduplicate_hits;
use super::{SearchError, SearchHit, Searcher};

/// Jackett search backend, querying all configured indexers at once.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the Jackett API URL for a search across all indexers.
    fn build_search_url(&self, query: &str) -> String {
        format!(
            "{}/api/v2.0/indexers/all/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl Searcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let start = Instant::now();
        let url = self.build_search_url(query);
        debug!(query = %query, "Searching Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse response: {}", e)))?;

        let raw_count = jackett_response.Results.len();
        let hits = deduplicate_hits(
            jackett_response
                .Results
                .into_iter()
                .filter_map(to_search_hit)
                .collect(),
        );

        debug!(
            raw = raw_count,
            results = hits.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Jackett search complete"
        );

        Ok(hits)
    }
}

/// Map one Jackett result. Results with neither an info hash nor a magnet
/// link cannot be identified or downloaded and are skipped.
fn to_search_hit(r: JackettResult) -> Option<SearchHit> {
    let magnet_link = r
        .MagnetUri
        .filter(|m| !m.is_empty())
        .or_else(|| r.Link.filter(|l| l.starts_with("magnet:")))?;

    let id = r
        .InfoHash
        .filter(|h| !h.is_empty())
        .or_else(|| info_hash_from_magnet(&magnet_link))?
        .to_lowercase();

    let (category, sub_category) = split_category(r.CategoryDesc.as_deref());

    Some(SearchHit {
        title: r.Title,
        size: format_size(r.Size.unwrap_or(0).max(0) as u64),
        seeders: r.Seeders.unwrap_or(0).max(0) as u32,
        id,
        category,
        sub_category,
        magnet_link,
    })
}

/// Extract the `btih` hash from a magnet link.
fn info_hash_from_magnet(magnet: &str) -> Option<String> {
    const MARKER: &str = "xt=urn:btih:";
    let start = magnet.find(MARKER)? + MARKER.len();
    let hash: String = magnet[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if hash.is_empty() {
        None
    } else {
        Some(hash)
    }
}

/// Split "Movies/HD" into ("Movies", "HD").
fn split_category(desc: Option<&str>) -> (String, String) {
    match desc {
        Some(desc) => match desc.split_once('/') {
            Some((main, sub)) => (main.trim().to_string(), sub.trim().to_string()),
            None => (desc.trim().to_string(), String::new()),
        },
        None => (String::new(), String::new()),
    }
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    Link: Option<String>,
    InfoHash: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i32>,
    CategoryDesc: Option<String>,
}
