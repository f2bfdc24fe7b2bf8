//! The session state machine for one play-through.
//!
//! [`Session`] is synchronous and owns no timers or network handles. Every
//! operation is one transition from the table below; async collaborators
//! (countdown, judge, leaderboard) live in
//! [`SessionController`](crate::SessionController), which feeds their results
//! back in here.
//!
//! ```text
//! SelectingDifficulty --select--> Intro --finish_intro--> Playing
//! Playing --tick(>1)--> Playing          Playing --tick(<=1)--> GameOver(TimedOut)
//! Playing --submit--> AwaitingJudge
//! AwaitingJudge --accepted--> Playing    AwaitingJudge --rejected--> GameOver(RejectedWord)
//! AwaitingJudge --failed--> Playing      * --surrender--> GameOver(RejectedWord)
//! GameOver --reset--> SelectingDifficulty
//! ```

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info, instrument, warn};

use crate::game::validation::{validate_player_name, validate_word};
use crate::game::{
    Difficulty, GameOverReason, Language, Move, SessionError, SessionView, SubmissionStatus,
    SubmitError,
};
use crate::judge::{JudgeError, JudgeRequest, JudgeResult};
use crate::leaderboard::{LeaderboardEntry, StoreError, StoredEntry};

/// Fieldless view of [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PhaseKind {
    /// Waiting for the player to pick a difficulty.
    #[strum(serialize = "selecting a difficulty")]
    SelectingDifficulty,
    /// Intro animation before the clock starts.
    #[strum(serialize = "in the intro")]
    Intro,
    /// Clock running, accepting words.
    #[strum(serialize = "playing")]
    Playing,
    /// A word is with the judge; clock paused.
    #[strum(serialize = "awaiting the judge")]
    AwaitingJudge,
    /// Game finished.
    #[strum(serialize = "game over")]
    GameOver,
}

/// State shared by every in-game phase.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Round {
    difficulty: Difficulty,
    time_left: u32,
    history: Vec<Move>,
}

impl Round {
    fn new(difficulty: Difficulty, language: Language) -> Self {
        Self {
            difficulty,
            time_left: difficulty.duration_secs(),
            history: vec![Move::seed(language)],
        }
    }

    /// The last accepted move; the word the next submission must beat.
    pub fn current(&self) -> Option<&Move> {
        self.history.iter().rev().find(|m| *m.accepted())
    }

    /// Accepted moves, not counting the seed.
    pub fn score(&self) -> u32 {
        let accepted = self.history.iter().filter(|m| *m.accepted()).count();
        u32::try_from(accepted.saturating_sub(1)).unwrap_or(u32::MAX)
    }

    /// Every word played so far, seed included.
    pub fn words(&self) -> Vec<String> {
        self.history.iter().map(|m| m.word().clone()).collect()
    }
}

/// Identifies one outgoing judge call.
///
/// A resolution is applied only if the session is still awaiting this exact
/// ticket.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct JudgeTicket {
    generation: u64,
    word: String,
}

/// A validated submission waiting to be sent to the judge.
#[derive(Debug, Clone, Getters)]
pub struct PendingJudgment {
    ticket: JudgeTicket,
    request: JudgeRequest,
}

impl PendingJudgment {
    /// Splits into the ticket and the request to send.
    pub fn into_parts(self) -> (JudgeTicket, JudgeRequest) {
        (self.ticket, self.request)
    }
}

/// Leaderboard submission state of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreSubmission {
    /// Nothing sent yet, or the last attempt failed.
    Open,
    /// A submission is with the store.
    InFlight,
    /// The store accepted the entry.
    Submitted(StoredEntry),
}

/// A leaderboard entry claimed from a finished game.
#[derive(Debug, Clone, Getters)]
pub struct ScoreTicket {
    generation: u64,
    entry: LeaderboardEntry,
}

impl ScoreTicket {
    /// Splits into the generation tag and the entry to store.
    pub fn into_parts(self) -> (u64, LeaderboardEntry) {
        (self.generation, self.entry)
    }
}

/// The phases of a session, each carrying only the data valid in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a difficulty.
    SelectingDifficulty,
    /// Difficulty chosen, clock not yet running.
    Intro(Round),
    /// Clock running.
    Playing(Round),
    /// Clock paused while the judge decides.
    AwaitingJudge {
        /// The round in progress.
        round: Round,
        /// The call being waited on.
        ticket: JudgeTicket,
    },
    /// Finished.
    GameOver {
        /// The final round.
        round: Round,
        /// How it ended.
        reason: GameOverReason,
        /// Leaderboard hand-off state.
        submission: ScoreSubmission,
    },
}

impl Phase {
    /// The fieldless kind of this phase.
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::SelectingDifficulty => PhaseKind::SelectingDifficulty,
            Self::Intro(_) => PhaseKind::Intro,
            Self::Playing(_) => PhaseKind::Playing,
            Self::AwaitingJudge { .. } => PhaseKind::AwaitingJudge,
            Self::GameOver { .. } => PhaseKind::GameOver,
        }
    }

    /// The round, in every phase that has one.
    pub fn round(&self) -> Option<&Round> {
        match self {
            Self::SelectingDifficulty => None,
            Self::Intro(round) | Self::Playing(round) => Some(round),
            Self::AwaitingJudge { round, .. } | Self::GameOver { round, .. } => Some(round),
        }
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Ignored,
    /// One second elapsed; this many remain.
    Counted(u32),
    /// The clock ran out and the game ended.
    TimedOut,
}

/// How a judge resolution was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The word beat the current word; play continues.
    Accepted(Move),
    /// The word lost; the game is over.
    Rejected(Move),
    /// The judge could not decide; play resumes and the word may be resent.
    Failed {
        /// The word handed back to the player.
        word: String,
        /// What went wrong.
        error: JudgeError,
    },
    /// The session moved on before the answer arrived. Nothing changed.
    Stale,
}

/// All game state for one play-through.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Session {
    language: Language,
    generation: u64,
    phase: Phase,
}

impl Session {
    /// Creates a session waiting for a difficulty.
    #[instrument]
    pub fn new(language: Language) -> Self {
        info!(%language, "Creating session");
        Self {
            language,
            generation: 0,
            phase: Phase::SelectingDifficulty,
        }
    }

    /// The current phase kind.
    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Replaces the phase. Every phase change starts a new generation so
    /// tickets issued before it go stale.
    fn enter(&mut self, phase: Phase) {
        self.generation += 1;
        debug!(to = %phase.kind(), generation = self.generation, "Phase transition");
        self.phase = phase;
    }

    /// Switches language. Only before a game starts.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] once a difficulty is chosen.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn set_language(&mut self, language: Language) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::SelectingDifficulty) {
            warn!("Language change refused");
            return Err(SessionError::wrong_phase(
                "change language",
                self.phase.kind(),
            ));
        }
        self.language = language;
        Ok(())
    }

    /// Picks a difficulty and seeds the round.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] unless selecting a difficulty.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::SelectingDifficulty) {
            warn!("Difficulty selection refused");
            return Err(SessionError::wrong_phase(
                "select a difficulty",
                self.phase.kind(),
            ));
        }
        info!(%difficulty, language = %self.language, "Difficulty selected");
        self.enter(Phase::Intro(Round::new(difficulty, self.language)));
        Ok(())
    }

    /// Ends the intro and starts the clock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] outside the intro.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn finish_intro(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.phase, Phase::SelectingDifficulty) {
            Phase::Intro(round) => {
                self.enter(Phase::Playing(round));
                Ok(())
            }
            other => {
                let kind = other.kind();
                self.phase = other;
                Err(SessionError::wrong_phase("finish the intro", kind))
            }
        }
    }

    /// One second of the countdown.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn tick(&mut self) -> TickOutcome {
        let Phase::Playing(round) = &mut self.phase else {
            debug!("Tick outside play ignored");
            return TickOutcome::Ignored;
        };
        if round.time_left > 1 {
            round.time_left -= 1;
            return TickOutcome::Counted(round.time_left);
        }

        let Phase::Playing(mut round) =
            std::mem::replace(&mut self.phase, Phase::SelectingDifficulty)
        else {
            return TickOutcome::Ignored;
        };
        round.time_left = 0;
        info!(score = round.score(), "Time is up");
        self.enter(Phase::GameOver {
            round,
            reason: GameOverReason::TimedOut,
            submission: ScoreSubmission::Open,
        });
        TickOutcome::TimedOut
    }

    /// Validates a word and moves to [`Phase::AwaitingJudge`].
    ///
    /// The caller sends the returned request to the judge and hands the
    /// answer back through [`Session::resolve_judgment`] with the ticket.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] if local validation fails (state is
    /// untouched) or [`SubmitError::Rejected`] when not playing.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn submit(&mut self, input: &str) -> Result<PendingJudgment, SubmitError> {
        let Phase::Playing(round) = &self.phase else {
            warn!("Submission outside play refused");
            return Err(SessionError::wrong_phase("submit a word", self.phase.kind()).into());
        };

        let word = validate_word(input)?;
        let current_word = round
            .current()
            .map(|m| m.word().clone())
            .unwrap_or_else(|| self.language.seed_word().to_string());
        let request = JudgeRequest::new(word.clone(), round.words(), current_word, self.language);

        let Phase::Playing(round) = std::mem::replace(&mut self.phase, Phase::SelectingDifficulty)
        else {
            return Err(
                SessionError::wrong_phase("submit a word", PhaseKind::SelectingDifficulty).into(),
            );
        };
        let ticket = JudgeTicket {
            generation: self.generation + 1,
            word,
        };
        self.enter(Phase::AwaitingJudge {
            round,
            ticket: ticket.clone(),
        });

        info!(word = %ticket.word, generation = ticket.generation, "Word sent for judgment");
        Ok(PendingJudgment { ticket, request })
    }

    /// Applies the judge's answer for `ticket`.
    ///
    /// Answers for anything other than the ticket currently awaited are
    /// dropped and reported as [`Resolution::Stale`].
    #[instrument(skip(self, outcome), fields(phase = %self.phase.kind(), word = %ticket.word))]
    pub fn resolve_judgment(
        &mut self,
        ticket: &JudgeTicket,
        outcome: Result<JudgeResult, JudgeError>,
    ) -> Resolution {
        let awaiting_this =
            matches!(&self.phase, Phase::AwaitingJudge { ticket: t, .. } if t == ticket);
        if !awaiting_this {
            warn!(generation = ticket.generation, "Discarding stale judge response");
            return Resolution::Stale;
        }
        let Phase::AwaitingJudge { mut round, ticket } =
            std::mem::replace(&mut self.phase, Phase::SelectingDifficulty)
        else {
            return Resolution::Stale;
        };

        match outcome {
            Ok(result) if result.accepted => {
                let played = Move::won(ticket.word, result.explanation, result.emoji);
                round.history.push(played.clone());
                round.time_left = round.difficulty.duration_secs();
                info!(score = round.score(), "Word accepted");
                self.enter(Phase::Playing(round));
                Resolution::Accepted(played)
            }
            Ok(result) => {
                let played = Move::lost(ticket.word, result.explanation);
                round.history.push(played.clone());
                info!(
                    score = round.score(),
                    duplicate = result.was_duplicate,
                    "Word rejected"
                );
                self.enter(Phase::GameOver {
                    round,
                    reason: GameOverReason::RejectedWord,
                    submission: ScoreSubmission::Open,
                });
                Resolution::Rejected(played)
            }
            Err(error) => {
                warn!(error = %error, "Judge failed, resuming play");
                self.enter(Phase::Playing(round));
                Resolution::Failed {
                    word: ticket.word,
                    error,
                }
            }
        }
    }

    /// Forfeits the game.
    ///
    /// Surrendering an already finished game changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] before a game has started.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn surrender(&mut self) -> Result<(), SessionError> {
        match std::mem::replace(&mut self.phase, Phase::SelectingDifficulty) {
            Phase::SelectingDifficulty => Err(SessionError::wrong_phase(
                "surrender",
                PhaseKind::SelectingDifficulty,
            )),
            over @ Phase::GameOver { .. } => {
                self.phase = over;
                Ok(())
            }
            Phase::Intro(round) | Phase::Playing(round) | Phase::AwaitingJudge { round, .. } => {
                info!(score = round.score(), "Player surrendered");
                self.enter(Phase::GameOver {
                    round,
                    reason: GameOverReason::RejectedWord,
                    submission: ScoreSubmission::Open,
                });
                Ok(())
            }
        }
    }

    /// Clears the finished game and returns to difficulty selection.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPhase`] unless the game is over.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::GameOver { .. }) {
            warn!("Reset refused");
            return Err(SessionError::wrong_phase("reset", self.phase.kind()));
        }
        self.enter(Phase::SelectingDifficulty);
        Ok(())
    }

    /// Claims the leaderboard entry for the finished game.
    ///
    /// Marks the submission in flight; the caller stores the entry and
    /// reports back through [`Session::finish_score_submission`].
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] for a bad name,
    /// [`SessionError::WrongPhase`] unless the game is over, and
    /// [`SessionError::AlreadySubmitted`] if this game already has one.
    #[instrument(skip(self), fields(phase = %self.phase.kind()))]
    pub fn begin_score_submission(
        &mut self,
        player_name: &str,
        date: DateTime<Utc>,
    ) -> Result<ScoreTicket, SubmitError> {
        let generation = self.generation;
        let language = self.language;
        let kind = self.phase.kind();
        let Phase::GameOver {
            round, submission, ..
        } = &mut self.phase
        else {
            return Err(SessionError::wrong_phase("submit a score", kind).into());
        };
        if *submission != ScoreSubmission::Open {
            warn!("Score already submitted");
            return Err(SessionError::AlreadySubmitted.into());
        }

        let player_name = validate_player_name(player_name)?;
        let entry = LeaderboardEntry::new(
            player_name,
            round.score(),
            round.difficulty,
            date,
            round.words(),
            language.to_string(),
        );
        *submission = ScoreSubmission::InFlight;
        info!(score = round.score(), "Score submission started");
        Ok(ScoreTicket { generation, entry })
    }

    /// Records the store's answer for a score submission.
    ///
    /// A failure reopens the submission so the player can retry. Returns
    /// `false` if the session has moved on and the answer was dropped.
    #[instrument(skip(self, outcome), fields(phase = %self.phase.kind()))]
    pub fn finish_score_submission(
        &mut self,
        generation: u64,
        outcome: Result<StoredEntry, StoreError>,
    ) -> bool {
        let current = self.generation;
        let Phase::GameOver { submission, .. } = &mut self.phase else {
            warn!("Discarding stale score submission result");
            return false;
        };
        if generation != current || *submission != ScoreSubmission::InFlight {
            warn!(generation, current, "Discarding stale score submission result");
            return false;
        }
        *submission = match outcome {
            Ok(stored) => {
                info!(id = stored.id(), "Score stored");
                ScoreSubmission::Submitted(stored)
            }
            Err(error) => {
                warn!(error = %error, "Score submission failed");
                ScoreSubmission::Open
            }
        };
        true
    }

    /// Immutable snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let seed = Move::seed(self.language);
        let (history, difficulty, time_left) = match self.phase.round() {
            Some(round) => (
                round.history.clone(),
                Some(round.difficulty),
                round.time_left,
            ),
            None => (vec![seed.clone()], None, 0),
        };
        let current = history
            .iter()
            .rev()
            .find(|m| *m.accepted())
            .cloned()
            .unwrap_or(seed);
        let score = self.phase.round().map(Round::score).unwrap_or(0);

        let (game_over_reason, score_submission) = match &self.phase {
            Phase::GameOver {
                reason, submission, ..
            } => (
                Some(*reason),
                match submission {
                    ScoreSubmission::Open => SubmissionStatus::Open,
                    ScoreSubmission::InFlight => SubmissionStatus::InFlight,
                    ScoreSubmission::Submitted(stored) => {
                        SubmissionStatus::Submitted(stored.clone())
                    }
                },
            ),
            _ => (None, SubmissionStatus::Unavailable),
        };
        let pending_word = match &self.phase {
            Phase::AwaitingJudge { ticket, .. } => Some(ticket.word.clone()),
            _ => None,
        };

        SessionView {
            phase: self.phase.kind(),
            language: self.language,
            difficulty,
            time_left,
            score,
            current_word: current.word().clone(),
            current_emoji: current.emoji().clone(),
            history,
            game_over_reason,
            pending_word,
            score_submission,
            notification: None,
        }
    }
}
