//! Word Battle library - beat each word with a stronger one
//!
//! A player submits a word that must defeat the previous word; a language
//! model rules on every move while a countdown keeps the pace. Finished games
//! go to a shared leaderboard.
//!
//! # Architecture
//!
//! - **Game**: the [`Session`] state machine and its async owner,
//!   [`SessionController`], which runs the countdown and calls out
//! - **Judge**: the [`Judge`] gateway, backed by an LLM ([`LlmJudge`]) or a
//!   remote `/check-word` endpoint ([`HttpJudge`])
//! - **Leaderboard**: the [`LeaderboardStore`] contract with SQLite,
//!   in-memory and HTTP backends
//! - **Server**: the axum [`router`] serving `/check-word` and `/leaderboard`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use word_battle::{
//!     AppConfig, Difficulty, InMemoryLeaderboard, Language, LlmJudge, SessionController,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let judge = Arc::new(LlmJudge::new(config.create_llm_config()?));
//! let store = Arc::new(InMemoryLeaderboard::new());
//!
//! let session = SessionController::spawn(Language::En, judge, store);
//! session.select_difficulty(Difficulty::Easy).await?;
//! session.finish_intro().await?;
//! session.submit("Anteater").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::time::Duration;

// Private module declarations
mod config;
mod game;
mod judge;
mod leaderboard;
mod llm_client;
mod server;

/// Time allowed for one outbound HTTP request, from connecting to the end of
/// the response body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};

// Crate-level exports - Game session
pub use game::{
    CommandError, Countdown, Difficulty, GameOverReason, JudgeTicket, Language,
    MAX_PLAYER_NAME_CHARS, MAX_WORD_TOKENS, Move, Notification, NotificationKind,
    PendingJudgment, Phase, PhaseKind, REJECTED_EMOJI, Resolution, Round, SEED_EXPLANATION,
    ScoreSubmission, ScoreTicket, Session, SessionController, SessionError, SessionHandle,
    SessionView, SubmissionStatus, SubmitError, TICK_PERIOD, TickOutcome, ValidationError,
    validate_player_name, validate_word,
};

// Crate-level exports - Judge gateway
pub use judge::{
    HttpJudge, Judge, JudgeError, JudgeErrorKind, JudgeRequest, JudgeResult, LlmJudge, Verdict,
    locale_directive, system_prompt,
};

// Crate-level exports - Leaderboard
pub use leaderboard::{
    DEFAULT_LIMIT, DifficultyFilter, HttpLeaderboard, InMemoryLeaderboard, LeaderboardEntry,
    LeaderboardRepository, LeaderboardRow, LeaderboardStore, LeaderboardSubmission,
    NewLeaderboardRow, SqliteLeaderboard, StoreError, StoreErrorKind, StoredEntry,
};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmErrorKind, LlmProvider};

// Crate-level exports - HTTP server
pub use server::{
    ALLOWED_METHODS, ApiError, AppState, ErrorBody, ListParams, check_word, list_leaderboard,
    router, serve, submit_score,
};
