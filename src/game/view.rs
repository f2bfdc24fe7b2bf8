//! Immutable snapshots published to renderers.

use serde::Serialize;

use crate::game::{Difficulty, GameOverReason, Language, Move, PhaseKind};
use crate::leaderboard::StoredEntry;

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Good news.
    Success,
    /// Something went wrong or the game ended.
    Error,
}

/// A transient message for the player.
///
/// `id` increases with every notification so a renderer can tell a new
/// message from one it is already showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Monotonic identifier.
    pub id: u64,
    /// Tone.
    pub kind: NotificationKind,
    /// Text to show.
    pub message: String,
}

/// Where the leaderboard hand-off of a finished game stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "entry")]
pub enum SubmissionStatus {
    /// The game is not over.
    Unavailable,
    /// Ready to submit.
    Open,
    /// Waiting on the store.
    InFlight,
    /// Stored.
    Submitted(StoredEntry),
}

/// Everything a renderer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Current phase.
    pub phase: PhaseKind,
    /// Game language.
    pub language: Language,
    /// Chosen difficulty, once selected.
    pub difficulty: Option<Difficulty>,
    /// Seconds left on the clock.
    pub time_left: u32,
    /// Accepted words, seed excluded.
    pub score: u32,
    /// Word to beat.
    pub current_word: String,
    /// Emoji of the word to beat.
    pub current_emoji: String,
    /// Every move, seed first.
    pub history: Vec<Move>,
    /// Set once the game is over.
    pub game_over_reason: Option<GameOverReason>,
    /// Word currently with the judge.
    pub pending_word: Option<String>,
    /// Leaderboard hand-off state.
    pub score_submission: SubmissionStatus,
    /// Latest notification.
    pub notification: Option<Notification>,
}
