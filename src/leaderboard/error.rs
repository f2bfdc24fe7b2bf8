//! Leaderboard store error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum StoreErrorKind {
    /// The entry breaks a leaderboard rule and was not stored.
    #[display("invalid entry")]
    InvalidEntry,
    /// The backend could not be reached or failed.
    #[display("unavailable")]
    Unavailable,
}

/// Leaderboard store error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Leaderboard error ({}): {} at {}:{}", kind, message, file, line)]
pub struct StoreError {
    /// Category.
    pub kind: StoreErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The entry was refused.
    #[track_caller]
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidEntry, message)
    }

    /// The backend failed.
    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::unavailable(format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::unavailable(format!("Connection error: {}", err))
    }
}
