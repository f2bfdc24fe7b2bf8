//! Store that talks to a remote `/leaderboard` endpoint.

use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use crate::REQUEST_TIMEOUT;
use crate::leaderboard::{
    DifficultyFilter, LeaderboardEntry, LeaderboardStore, LeaderboardSubmission, StoreError,
    StoredEntry,
};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client of a `/leaderboard` endpoint, such as the one served by
/// [`router`](crate::router).
#[derive(Debug, Clone)]
pub struct HttpLeaderboard {
    endpoint: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpLeaderboard {
    /// Creates a store for `endpoint` (the full `/leaderboard` URL).
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`](crate::StoreErrorKind::Unavailable) error if
    /// the URL does not parse.
    #[instrument]
    pub fn new(endpoint: &str) -> Result<Self, StoreError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            StoreError::unavailable(format!("Invalid leaderboard URL '{}': {}", endpoint, e))
        })?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Reports the endpoint unavailable once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn unreachable(e: reqwest::Error) -> StoreError {
        error!(error = ?e, "Leaderboard endpoint unreachable");
        StoreError::unavailable(format!("Leaderboard endpoint unreachable: {}", e))
    }

    /// Decodes a response. Only a 400 answer to a submission is read as a
    /// refused entry; any other failure status means the endpoint is
    /// unusable.
    async fn read<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
        submission: bool,
    ) -> Result<T, StoreError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read leaderboard response");
            StoreError::unavailable(format!("Failed to read leaderboard response: {}", e))
        })?;

        if submission && status == StatusCode::BAD_REQUEST {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            warn!(message = %message, "Leaderboard refused entry");
            return Err(StoreError::invalid_entry(message));
        }
        if !status.is_success() {
            error!(status = %status, body = %body, "Leaderboard endpoint failed");
            return Err(StoreError::unavailable(format!(
                "Leaderboard endpoint returned {}",
                status
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, body = %body, "Unparseable leaderboard response");
            StoreError::unavailable(format!("Unparseable leaderboard response: {}", e))
        })
    }
}

#[async_trait]
impl LeaderboardStore for HttpLeaderboard {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn list_top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            if let DifficultyFilter::Only(difficulty) = filter {
                query.append_pair("difficulty", &difficulty.to_string());
            }
            query.append_pair("limit", &limit.to_string());
        }
        debug!(url = %url, "Fetching leaderboard");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(Self::unreachable)?;
        Self::read(response, false).await
    }

    #[instrument(
        skip(self, entry),
        fields(endpoint = %self.endpoint, player_name = %entry.player_name())
    )]
    async fn submit(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError> {
        let body = LeaderboardSubmission::from(&entry);
        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(Self::unreachable)?;
        Self::read(response, true).await
    }
}
