//! Judge error types.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::llm_client::{LlmError, LlmErrorKind};

/// Category of a judge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum JudgeErrorKind {
    /// The request never got an answer.
    #[display("network")]
    Network,
    /// An answer arrived but could not be understood.
    #[display("invalid response")]
    InvalidResponse,
    /// The service answered with a non-success status.
    #[display("upstream rejected")]
    UpstreamRejected,
}

/// A judge call that produced no verdict. Never a game outcome: the player
/// may resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Judge error ({}): {} at {}:{}", kind, message, file, line)]
pub struct JudgeError {
    /// Category.
    pub kind: JudgeErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl JudgeError {
    /// Creates a new judge error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: JudgeErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Transport failure.
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(JudgeErrorKind::Network, message)
    }

    /// Malformed or incomplete payload.
    #[track_caller]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(JudgeErrorKind::InvalidResponse, message)
    }

    /// Non-success status from upstream.
    #[track_caller]
    pub fn upstream_rejected(message: impl Into<String>) -> Self {
        Self::new(JudgeErrorKind::UpstreamRejected, message)
    }
}

impl From<LlmError> for JudgeError {
    #[track_caller]
    fn from(err: LlmError) -> Self {
        let kind = match err.kind {
            LlmErrorKind::Transport => JudgeErrorKind::Network,
            LlmErrorKind::Status => JudgeErrorKind::UpstreamRejected,
            LlmErrorKind::Malformed => JudgeErrorKind::InvalidResponse,
        };
        Self::new(kind, err.message)
    }
}
