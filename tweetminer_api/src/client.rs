//! HTTP client for the two search tiers.

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    query::{ArchiveSearchQuery, RecentSearchQuery},
    types::{ArchiveSearchResponse, RecentSearchResponse},
    Error,
};

/// Response header carrying the remaining request quota for the window.
const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";

/// A decoded tier response paired with the quota the tier reported left.
///
/// Callers must inspect `rate_remaining` after every fetch; zero means the
/// next request has to wait out the cooldown.
pub struct Fetched<T> {
    pub payload: T,
    /// Remaining calls in the current quota window, when the tier said.
    pub rate_remaining: Option<u64>,
}

/// Client for both search tiers.
///
/// Holds the two endpoint URLs and the bearer token. The token is attached
/// per request, so the client stays immutable and shareable. Each request
/// builds a fresh `reqwest::Client` with a 30-second timeout.
pub struct Client {
    recent_endpoint: String,
    archive_endpoint: String,
    bearer_token: String,
}

impl Client {
    /// Creates a client for the given tier endpoints and bearer credential.
    pub fn new(recent_endpoint: &str, archive_endpoint: &str, bearer_token: &str) -> Self {
        Self {
            recent_endpoint: recent_endpoint.to_string(),
            archive_endpoint: archive_endpoint.to_string(),
            bearer_token: bearer_token.to_string(),
        }
    }

    /// Fetches one page of recency-tier results for the query.
    pub async fn recent_tweets(
        &self,
        query: &RecentSearchQuery,
    ) -> Result<Fetched<RecentSearchResponse>, Error> {
        let url = Url::parse(&self.recent_endpoint).map_err(|e| {
            tracing::error!("Invalid recency endpoint: {}", e);
            Error::RequestFailed
        })?;
        let url = query.add_to_url(&url);
        let request = self.http()?.get(url);
        self.send::<RecentSearchResponse>(request).await
    }

    /// Fetches one page of archive-tier results for the query.
    pub async fn archive_search(
        &self,
        query: &ArchiveSearchQuery,
    ) -> Result<Fetched<ArchiveSearchResponse>, Error> {
        let request = self.http()?.post(&self.archive_endpoint).json(query);
        self.send::<ArchiveSearchResponse>(request).await
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })
    }

    async fn send<T>(&self, request: reqwest::RequestBuilder) -> Result<Fetched<T>, Error>
    where
        T: DeserializeOwned,
    {
        let resp = request
            .bearer_auth(&self.bearer_token)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach tier: {}", e);
                Error::RequestFailed
            })?;

        let rate_remaining = resp
            .headers()
            .get(RATE_LIMIT_REMAINING)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse().ok());

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let payload = serde_json::from_str::<T>(&body).map_err(|e| {
            tracing::error!(
                "Failed to parse response: {} | body: {}",
                e,
                truncate_body(&body)
            );
            Error::RequestFailed
        })?;

        Ok(Fetched {
            payload,
            rate_remaining,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}
