//! Judge that asks a language model directly.

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::judge::prompt::system_prompt;
use crate::judge::{Judge, JudgeError, JudgeRequest, JudgeResult, Verdict};
use crate::llm_client::{LlmClient, LlmConfig};

/// Rules on words with one chat completion per call.
#[derive(Debug, Clone)]
pub struct LlmJudge {
    client: LlmClient,
}

impl LlmJudge {
    /// Creates a judge backed by `config`.
    #[instrument(skip(config))]
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: LlmClient::new(config),
        }
    }

    /// Rules on `request` and returns the wire verdict.
    ///
    /// # Errors
    ///
    /// Returns a [`JudgeError`] for transport failures, non-success statuses
    /// and unparseable replies.
    #[instrument(skip(self, request), fields(word = %request.word))]
    pub async fn verdict(&self, request: &JudgeRequest) -> Result<Verdict, JudgeError> {
        let prompt = system_prompt(request);
        let raw = self.client.generate(&prompt, &request.word, true).await?;
        let verdict = Verdict::parse(&raw)?;
        info!(success = verdict.success, "Judge ruled");
        Ok(verdict)
    }
}

#[async_trait]
impl Judge for LlmJudge {
    async fn evaluate(&self, request: &JudgeRequest) -> Result<JudgeResult, JudgeError> {
        self.verdict(request).await.map(JudgeResult::from)
    }
}
