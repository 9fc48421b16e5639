// Sleeper HTTP client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::api::{League, Matchup, NflState, PlayerMap, Roster, User};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLEEPER_API_URL: &str = "https://api.sleeper.app/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SleeperError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },

    /// Sleeper answers unknown ids with a JSON `null` body.
    #[error("{url} returned no data")]
    NotFound { url: String },
}

// ---------------------------------------------------------------------------
// SleeperClient
// ---------------------------------------------------------------------------

/// Thin JSON client over the public Sleeper read API.
#[derive(Debug, Clone)]
pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SleeperError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SleeperError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Join path segments onto the base URL.
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, SleeperError> {
        let url = self.url(segments);
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| SleeperError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SleeperError::Status { url, status });
        }

        let body: Option<T> = response
            .json()
            .await
            .map_err(|source| SleeperError::Decode {
                url: url.clone(),
                source,
            })?;
        body.ok_or(SleeperError::NotFound { url })
    }

    pub async fn nfl_state(&self) -> Result<NflState, SleeperError> {
        self.get_json(&["state", "nfl"]).await
    }

    pub async fn league(&self, league_id: &str) -> Result<League, SleeperError> {
        self.get_json(&["league", league_id]).await
    }

    pub async fn users(&self, league_id: &str) -> Result<Vec<User>, SleeperError> {
        self.get_json(&["league", league_id, "users"]).await
    }

    pub async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, SleeperError> {
        self.get_json(&["league", league_id, "rosters"]).await
    }

    pub async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<Matchup>, SleeperError> {
        let week = week.to_string();
        self.get_json(&["league", league_id, "matchups", &week]).await
    }

    /// The full NFL player table. Large; callers should cache it.
    pub async fn players(&self) -> Result<PlayerMap, SleeperError> {
        self.get_json(&["players", "nfl"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_segments() {
        let client = SleeperClient::new(SLEEPER_API_URL, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.url(&["league", "123", "matchups", "4"]),
            "https://api.sleeper.app/v1/league/123/matchups/4"
        );
    }

    #[test]
    fn url_ignores_trailing_slash_on_base() {
        let client = SleeperClient::new("http://localhost:9000/v1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.url(&["state", "nfl"]), "http://localhost:9000/v1/state/nfl");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        let client =
            SleeperClient::new("http://127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let err = client.nfl_state().await.unwrap_err();
        assert!(matches!(err, SleeperError::Request { .. }), "got {err}");
    }
}
