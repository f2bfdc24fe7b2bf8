//! Judge gateway: rules on whether a word beats the previous one.

mod error;
mod http;
mod llm;
mod prompt;
mod wire;

pub use error::{JudgeError, JudgeErrorKind};
pub use http::HttpJudge;
pub use llm::LlmJudge;
pub use prompt::{locale_directive, system_prompt};
pub use wire::{JudgeRequest, JudgeResult, Verdict};

use async_trait::async_trait;

/// Something that can rule on a word.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry. Duplicates are ruled on by the judge, not filtered locally.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Rules on `request.word` against `request.current_word`.
    async fn evaluate(&self, request: &JudgeRequest) -> Result<JudgeResult, JudgeError>;
}
