//! Application state and key handling for the terminal game.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;
use tracing::debug;
use word_battle::{
    Difficulty, DifficultyFilter, Language, MAX_PLAYER_NAME_CHARS, Notification, PhaseKind,
    SessionView, StoredEntry, SubmissionStatus,
};

/// How long the intro shows before the clock starts.
pub const INTRO_DURATION: Duration = Duration::from_millis(1500);

/// How long a notification stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Something the event loop must do on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Switch game language.
    SetLanguage(Language),
    /// Start a game.
    SelectDifficulty(Difficulty),
    /// Start the clock.
    FinishIntro,
    /// Send a word.
    Submit(String),
    /// Give up.
    Surrender,
    /// Back to difficulty selection.
    Reset,
    /// Send the score under a name.
    SubmitScore(String),
    /// Fetch the leaderboard for a filter.
    LoadLeaderboard(DifficultyFilter),
    /// Leave.
    Quit,
}

/// Main application state.
pub struct App {
    view: SessionView,
    input: String,
    intro_started: Option<Instant>,
    intro_finishing: bool,
    notification: Option<(Notification, Instant)>,
    leaderboard: Option<(DifficultyFilter, Vec<StoredEntry>)>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    /// Creates the app around the first snapshot.
    pub fn new(view: SessionView) -> Self {
        Self {
            view,
            input: String::new(),
            intro_started: None,
            intro_finishing: false,
            notification: None,
            leaderboard: None,
            status: None,
            should_quit: false,
        }
    }

    /// The latest snapshot.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    /// Text being typed: a word while playing, a name at game over.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The notification to show, if it has not expired.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|(n, _)| n)
    }

    /// The leaderboard overlay, when open.
    pub fn leaderboard(&self) -> Option<&(DifficultyFilter, Vec<StoredEntry>)> {
        self.leaderboard.as_ref()
    }

    /// A status line from the last failed command.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Whether the loop should stop.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Folds a new snapshot in.
    pub fn sync(&mut self, view: SessionView, now: Instant) {
        if view == self.view {
            self.expire(now);
            return;
        }

        let history_grew = view.history.len() > self.view.history.len();
        let phase_changed = view.phase != self.view.phase;
        let left_play = phase_changed
            && matches!(view.phase, PhaseKind::GameOver | PhaseKind::SelectingDifficulty);
        if history_grew || left_play {
            self.input.clear();
        }
        if phase_changed {
            self.status = None;
        }

        if view.phase == PhaseKind::Intro {
            self.intro_started.get_or_insert(now);
        } else {
            self.intro_started = None;
            self.intro_finishing = false;
        }

        if let Some(notification) = &view.notification {
            let is_new = self
                .notification
                .as_ref()
                .is_none_or(|(shown, _)| shown.id != notification.id);
            if is_new {
                debug!(id = notification.id, "Showing notification");
                self.notification = Some((notification.clone(), now));
            }
        }

        self.view = view;
        self.expire(now);
    }

    fn expire(&mut self, now: Instant) {
        let expired = self
            .notification
            .as_ref()
            .is_some_and(|(_, shown_at)| now.duration_since(*shown_at) >= NOTIFICATION_DURATION);
        if expired {
            self.notification = None;
        }
    }

    /// Actions that are due without a key press.
    pub fn due_actions(&mut self, now: Instant) -> Option<Action> {
        let started = self.intro_started?;
        if !self.intro_finishing && now.duration_since(started) >= INTRO_DURATION {
            self.intro_finishing = true;
            return Some(Action::FinishIntro);
        }
        None
    }

    /// Stores a fetched leaderboard and opens the overlay.
    pub fn show_leaderboard(&mut self, filter: DifficultyFilter, entries: Vec<StoredEntry>) {
        self.leaderboard = Some((filter, entries));
    }

    /// Shows a status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Maps a key press to an action.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Some(Action::Quit);
        }

        if let Some((filter, _)) = &self.leaderboard {
            let filter = *filter;
            return match key.code {
                KeyCode::Left => Some(Action::LoadLeaderboard(cycle_filter(filter, false))),
                KeyCode::Right => Some(Action::LoadLeaderboard(cycle_filter(filter, true))),
                KeyCode::Tab | KeyCode::Esc => {
                    self.leaderboard = None;
                    None
                }
                _ => None,
            };
        }

        match self.view.phase {
            PhaseKind::SelectingDifficulty => self.selecting_key(key.code),
            PhaseKind::Intro => match key.code {
                KeyCode::Esc => Some(Action::Surrender),
                _ => None,
            },
            PhaseKind::Playing | PhaseKind::AwaitingJudge => self.playing_key(key.code),
            PhaseKind::GameOver => self.game_over_key(key.code),
        }
    }

    fn selecting_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Char('1') => Some(Action::SelectDifficulty(Difficulty::Easy)),
            KeyCode::Char('2') => Some(Action::SelectDifficulty(Difficulty::Medium)),
            KeyCode::Char('3') => Some(Action::SelectDifficulty(Difficulty::Hard)),
            KeyCode::Char('l') => Some(Action::SetLanguage(next_language(self.view.language))),
            KeyCode::Tab => Some(Action::LoadLeaderboard(DifficultyFilter::All)),
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Some(Action::Quit)
            }
            _ => None,
        }
    }

    fn playing_key(&mut self, code: KeyCode) -> Option<Action> {
        match code {
            KeyCode::Esc => Some(Action::Surrender),
            KeyCode::Enter if self.view.phase == PhaseKind::Playing => {
                Some(Action::Submit(self.input.clone()))
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn game_over_key(&mut self, code: KeyCode) -> Option<Action> {
        let naming = self.view.score_submission == SubmissionStatus::Open;
        match code {
            KeyCode::Esc => Some(Action::Reset),
            KeyCode::Tab => Some(Action::LoadLeaderboard(
                self.view
                    .difficulty
                    .map_or(DifficultyFilter::All, DifficultyFilter::Only),
            )),
            KeyCode::Enter if naming => Some(Action::SubmitScore(self.input.clone())),
            KeyCode::Enter => Some(Action::Reset),
            KeyCode::Backspace if naming => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) if naming && self.input.chars().count() < MAX_PLAYER_NAME_CHARS => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }
}

fn next_language(current: Language) -> Language {
    let languages: Vec<Language> = Language::iter().collect();
    let index = languages.iter().position(|l| *l == current).unwrap_or(0);
    languages[(index + 1) % languages.len()]
}

fn cycle_filter(current: DifficultyFilter, forward: bool) -> DifficultyFilter {
    let mut filters = vec![DifficultyFilter::All];
    filters.extend(Difficulty::iter().map(DifficultyFilter::Only));
    let index = filters.iter().position(|f| *f == current).unwrap_or(0);
    let next = if forward {
        (index + 1) % filters.len()
    } else {
        (index + filters.len() - 1) % filters.len()
    };
    filters[next]
}
