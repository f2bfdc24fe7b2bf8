//! Async owner of a [`Session`].
//!
//! The controller runs as a single task that applies commands one at a time,
//! so the countdown and the judge round trip never race: the countdown only
//! exists while the session is [`PhaseKind::Playing`], and judge answers are
//! matched against the ticket the session is waiting on.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::{oneshot, watch};
use tracing::{Instrument, debug, info, info_span, instrument, warn};

use crate::game::countdown::{Countdown, TICK_PERIOD};
use crate::game::{
    CommandError, Difficulty, JudgeTicket, Language, Notification, NotificationKind,
    PendingJudgment, PhaseKind, Resolution, ScoreTicket, Session, SessionView, SubmitError,
    TickOutcome,
};
use crate::judge::{Judge, JudgeError, JudgeResult};
use crate::leaderboard::{LeaderboardStore, StoreError, StoredEntry};

type Reply = oneshot::Sender<Result<(), CommandError>>;

enum Command {
    SetLanguage { language: Language, reply: Reply },
    SelectDifficulty { difficulty: Difficulty, reply: Reply },
    FinishIntro { reply: Reply },
    Submit { input: String, reply: Reply },
    Surrender { reply: Reply },
    Reset { reply: Reply },
    SubmitScore { player_name: String, reply: Reply },
    Tick { epoch: u64 },
    JudgeResolved {
        ticket: JudgeTicket,
        outcome: Result<JudgeResult, JudgeError>,
    },
    ScoreResolved {
        generation: u64,
        outcome: Result<StoredEntry, StoreError>,
    },
}

/// Drives one [`Session`]: owns its countdown, calls the judge and the
/// leaderboard, and publishes a [`SessionView`] after every command.
pub struct SessionController {
    session: Session,
    judge: Arc<dyn Judge>,
    store: Arc<dyn LeaderboardStore>,
    commands: WeakUnboundedSender<Command>,
    countdown: Option<Countdown>,
    next_epoch: u64,
    next_notification: u64,
    notification: Option<Notification>,
    views: watch::Sender<SessionView>,
}

impl SessionController {
    /// Starts a controller task and returns a handle to it.
    ///
    /// The task stops once every [`SessionHandle`] is dropped.
    #[instrument(skip(judge, store))]
    pub fn spawn(
        language: Language,
        judge: Arc<dyn Judge>,
        store: Arc<dyn LeaderboardStore>,
    ) -> SessionHandle {
        let (commands, receiver) = mpsc::unbounded_channel();
        let session = Session::new(language);
        let (views, view_receiver) = watch::channel(session.view());

        let controller = Self {
            session,
            judge,
            store,
            commands: commands.downgrade(),
            countdown: None,
            next_epoch: 0,
            next_notification: 0,
            notification: None,
            views,
        };
        tokio::spawn(controller.run(receiver));

        SessionHandle {
            commands,
            views: view_receiver,
        }
    }

    async fn run(mut self, mut receiver: UnboundedReceiver<Command>) {
        info!("Session controller started");
        while let Some(command) = receiver.recv().await {
            let reply = self.apply(command);
            self.sync_countdown();
            self.publish();
            if let Some((reply, result)) = reply {
                // The caller may have given up waiting.
                let _ = reply.send(result);
            }
        }
        info!("Session controller stopped");
    }

    fn apply(&mut self, command: Command) -> Option<(Reply, Result<(), CommandError>)> {
        match command {
            Command::SetLanguage { language, reply } => {
                let result = self.session.set_language(language).map_err(Into::into);
                Some((reply, result))
            }
            Command::SelectDifficulty { difficulty, reply } => {
                let result = self.session.select_difficulty(difficulty).map_err(Into::into);
                if result.is_ok() {
                    self.notification = None;
                }
                Some((reply, result))
            }
            Command::FinishIntro { reply } => {
                Some((reply, self.session.finish_intro().map_err(Into::into)))
            }
            Command::Submit { input, reply } => {
                let result = match self.session.submit(&input) {
                    Ok(pending) => {
                        self.dispatch_judgment(pending);
                        Ok(())
                    }
                    Err(err) => {
                        if let SubmitError::Invalid(invalid) = &err {
                            self.notify(NotificationKind::Error, invalid.to_string());
                        }
                        Err(err.into())
                    }
                };
                Some((reply, result))
            }
            Command::Surrender { reply } => {
                let was_over = self.session.phase_kind() == PhaseKind::GameOver;
                let result = self.session.surrender().map_err(Into::into);
                if result.is_ok() && !was_over {
                    self.notify(NotificationKind::Error, "You surrendered.".to_string());
                }
                Some((reply, result))
            }
            Command::Reset { reply } => {
                let result = self.session.reset().map_err(Into::into);
                if result.is_ok() {
                    self.notification = None;
                }
                Some((reply, result))
            }
            Command::SubmitScore { player_name, reply } => {
                let result = match self.session.begin_score_submission(&player_name, Utc::now()) {
                    Ok(ticket) => {
                        self.dispatch_score(ticket);
                        Ok(())
                    }
                    Err(err) => {
                        if let SubmitError::Invalid(invalid) = &err {
                            self.notify(NotificationKind::Error, invalid.to_string());
                        }
                        Err(err.into())
                    }
                };
                Some((reply, result))
            }
            Command::Tick { epoch } => {
                self.on_tick(epoch);
                None
            }
            Command::JudgeResolved { ticket, outcome } => {
                self.on_judgment(&ticket, outcome);
                None
            }
            Command::ScoreResolved {
                generation,
                outcome,
            } => {
                self.on_score(generation, outcome);
                None
            }
        }
    }

    fn on_tick(&mut self, epoch: u64) {
        if self.countdown.as_ref().map(Countdown::epoch) != Some(epoch) {
            debug!(epoch, "Dropping tick from a cancelled countdown");
            return;
        }
        if self.session.tick() == TickOutcome::TimedOut {
            self.notify(NotificationKind::Error, "Time is up!".to_string());
        }
    }

    fn on_judgment(&mut self, ticket: &JudgeTicket, outcome: Result<JudgeResult, JudgeError>) {
        match self.session.resolve_judgment(ticket, outcome) {
            Resolution::Accepted(played) => {
                self.notify(NotificationKind::Success, played.explanation().clone());
            }
            Resolution::Rejected(played) => {
                self.notify(NotificationKind::Error, played.explanation().clone());
            }
            Resolution::Failed { word, error } => {
                debug!(error = %error, "Surfacing judge failure");
                self.notify(
                    NotificationKind::Error,
                    format!("The judge could not rule on \"{word}\". Try again."),
                );
            }
            Resolution::Stale => {}
        }
    }

    fn on_score(&mut self, generation: u64, outcome: Result<StoredEntry, StoreError>) {
        let message = match &outcome {
            Ok(stored) => (
                NotificationKind::Success,
                format!("Score saved for {}.", stored.entry().player_name()),
            ),
            Err(error) => (
                NotificationKind::Error,
                format!("Could not save the score: {}", error.message),
            ),
        };
        if self.session.finish_score_submission(generation, outcome) {
            self.notify(message.0, message.1);
        }
    }

    fn dispatch_judgment(&self, pending: PendingJudgment) {
        let (ticket, request) = pending.into_parts();
        let judge = Arc::clone(&self.judge);
        let sink = self.commands.clone();
        let span = info_span!(
            "judge_call",
            word = %ticket.word(),
            generation = ticket.generation()
        );

        tokio::spawn(
            async move {
                let outcome = judge.evaluate(&request).await;
                match sink.upgrade() {
                    Some(sink) => {
                        if sink.send(Command::JudgeResolved { ticket, outcome }).is_err() {
                            debug!("Controller gone, dropping judgment");
                        }
                    }
                    None => debug!("Controller gone, dropping judgment"),
                }
            }
            .instrument(span),
        );
    }

    fn dispatch_score(&self, ticket: ScoreTicket) {
        let (generation, entry) = ticket.into_parts();
        let store = Arc::clone(&self.store);
        let sink = self.commands.clone();
        let span = info_span!("score_submission", generation);

        tokio::spawn(
            async move {
                let outcome = store.submit(entry).await;
                if let Some(sink) = sink.upgrade() {
                    if sink
                        .send(Command::ScoreResolved {
                            generation,
                            outcome,
                        })
                        .is_err()
                    {
                        debug!("Controller gone, dropping score result");
                    }
                }
            }
            .instrument(span),
        );
    }

    /// Starts the countdown on entering play and cancels it on leaving.
    fn sync_countdown(&mut self) {
        let playing = self.session.phase_kind() == PhaseKind::Playing;
        match (self.countdown.is_some(), playing) {
            (false, true) => {
                self.next_epoch += 1;
                let epoch = self.next_epoch;
                self.countdown = Some(Countdown::start(
                    epoch,
                    TICK_PERIOD,
                    self.commands.clone(),
                    move || Command::Tick { epoch },
                ));
            }
            (true, false) => {
                if let Some(countdown) = self.countdown.take() {
                    countdown.cancel();
                }
            }
            _ => {}
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.next_notification += 1;
        debug!(?kind, %message, "Notification");
        self.notification = Some(Notification {
            id: self.next_notification,
            kind,
            message,
        });
    }

    fn publish(&self) {
        let mut view = self.session.view();
        view.notification = self.notification.clone();
        self.views.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}

/// Cloneable handle for driving a [`SessionController`].
///
/// Each command resolves once the controller has applied it and published
/// the resulting [`SessionView`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: UnboundedSender<Command>,
    views: watch::Receiver<SessionView>,
}

impl SessionHandle {
    async fn request(&self, make: impl FnOnce(Reply) -> Command) -> Result<(), CommandError> {
        let (reply, response) = oneshot::channel();
        self.commands.send(make(reply)).map_err(|_| {
            warn!("Session controller has shut down");
            CommandError::Closed
        })?;
        response.await.map_err(|_| CommandError::Closed)?
    }

    /// Changes the game language before a difficulty is picked.
    #[instrument(skip(self))]
    pub async fn set_language(&self, language: Language) -> Result<(), CommandError> {
        self.request(|reply| Command::SetLanguage { language, reply })
            .await
    }

    /// Picks a difficulty and enters the intro.
    #[instrument(skip(self))]
    pub async fn select_difficulty(&self, difficulty: Difficulty) -> Result<(), CommandError> {
        self.request(|reply| Command::SelectDifficulty { difficulty, reply })
            .await
    }

    /// Ends the intro and starts the countdown.
    #[instrument(skip(self))]
    pub async fn finish_intro(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::FinishIntro { reply }).await
    }

    /// Submits a word. Resolves once the word is with the judge, or with the
    /// validation error if it was refused locally.
    #[instrument(skip(self))]
    pub async fn submit(&self, input: &str) -> Result<(), CommandError> {
        let input = input.to_string();
        self.request(|reply| Command::Submit { input, reply }).await
    }

    /// Gives up the current game.
    #[instrument(skip(self))]
    pub async fn surrender(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::Surrender { reply }).await
    }

    /// Returns from game over to difficulty selection.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), CommandError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Sends the finished game's score to the leaderboard under `player_name`.
    /// Resolves once the submission is in flight.
    #[instrument(skip(self))]
    pub async fn submit_score(&self, player_name: &str) -> Result<(), CommandError> {
        let player_name = player_name.to_string();
        self.request(|reply| Command::SubmitScore { player_name, reply })
            .await
    }

    /// The latest snapshot.
    pub fn view(&self) -> SessionView {
        self.views.borrow().clone()
    }

    /// A receiver that wakes on every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.views.clone()
    }
}
