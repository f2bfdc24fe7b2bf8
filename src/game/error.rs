//! Session error types.

use derive_more::{Display, Error, From};

use crate::game::PhaseKind;
use crate::game::validation::{MAX_PLAYER_NAME_CHARS, MAX_WORD_TOKENS};

/// A submission refused locally, before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    /// Nothing left after trimming.
    #[display("the word is empty")]
    Empty,
    /// Digits are not words.
    #[display("digits are not allowed")]
    ContainsDigit,
    /// Longer than the allowed phrase length.
    #[display("at most {} words are allowed", MAX_WORD_TOKENS)]
    TooManyWords,
    /// Player name blank or too long.
    #[display("player name must be 1 to {} characters", MAX_PLAYER_NAME_CHARS)]
    InvalidPlayerName,
}

/// A command issued while the session was in a phase that cannot take it.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// The command does not apply to the current phase.
    #[display("cannot {action} while {phase}")]
    WrongPhase {
        /// What was attempted.
        action: &'static str,
        /// Phase the session was in.
        phase: PhaseKind,
    },
    /// This game-over already has a score submitted or in flight.
    #[display("score already submitted for this game")]
    AlreadySubmitted,
}

impl SessionError {
    pub(crate) fn wrong_phase(action: &'static str, phase: PhaseKind) -> Self {
        Self::WrongPhase { action, phase }
    }
}

/// Why a submission did not reach the judge.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SubmitError {
    /// Refused by local validation.
    #[display("{_0}")]
    Invalid(ValidationError),
    /// Not accepting words right now.
    #[display("{_0}")]
    Rejected(SessionError),
}

/// Error returned by [`SessionHandle`](crate::SessionHandle) commands.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum CommandError {
    /// The controller task is gone.
    #[display("session controller has shut down")]
    #[from(ignore)]
    Closed,
    /// Refused by local validation.
    #[display("{_0}")]
    Invalid(ValidationError),
    /// Not valid in the current phase.
    #[display("{_0}")]
    Rejected(SessionError),
}

impl From<SubmitError> for CommandError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(e) => Self::Invalid(e),
            SubmitError::Rejected(e) => Self::Rejected(e),
        }
    }
}
