//! Game session: vocabulary, state machine, countdown and controller.

mod controller;
mod countdown;
mod error;
mod session;
mod types;
mod validation;
mod view;

pub use controller::{SessionController, SessionHandle};
pub use countdown::{Countdown, TICK_PERIOD};
pub use error::{CommandError, SessionError, SubmitError, ValidationError};
pub use session::{
    JudgeTicket, PendingJudgment, Phase, PhaseKind, Resolution, Round, ScoreSubmission,
    ScoreTicket, Session, TickOutcome,
};
pub use types::{Difficulty, GameOverReason, Language, Move, REJECTED_EMOJI, SEED_EXPLANATION};
pub use validation::{MAX_PLAYER_NAME_CHARS, MAX_WORD_TOKENS, validate_player_name, validate_word};
pub use view::{Notification, NotificationKind, SessionView, SubmissionStatus};
