//! Judge that calls a remote `/check-word` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::REQUEST_TIMEOUT;
use crate::judge::{Judge, JudgeError, JudgeRequest, JudgeResult, Verdict};

/// Client of a `/check-word` endpoint, such as the one served by
/// [`router`](crate::router).
#[derive(Debug, Clone)]
pub struct HttpJudge {
    endpoint: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpJudge {
    /// Creates a judge posting to `endpoint` (the full `/check-word` URL).
    #[instrument]
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Fails a call as a network error once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Judge for HttpJudge {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, word = %request.word))]
    async fn evaluate(&self, request: &JudgeRequest) -> Result<JudgeResult, JudgeError> {
        debug!("Posting to judge endpoint");
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Judge endpoint unreachable");
                JudgeError::network(format!("Judge endpoint unreachable: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read judge response");
            JudgeError::network(format!("Failed to read judge response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "Judge endpoint refused");
            return Err(JudgeError::upstream_rejected(format!(
                "Judge endpoint returned {}: {}",
                status, body
            )));
        }

        Verdict::parse(&body).map(JudgeResult::from)
    }
}
