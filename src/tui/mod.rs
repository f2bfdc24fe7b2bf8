//! Terminal UI for Word Battle.

mod app;
mod ui;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::{debug, error, info, instrument, warn};
use word_battle::{CommandError, DEFAULT_LIMIT, LeaderboardStore, SessionHandle};

use app::{Action, App};

/// Runs the game until the player quits.
///
/// Logging must already go to a file; the terminal belongs to the UI.
#[instrument(skip_all)]
pub async fn run_tui(handle: SessionHandle, store: Arc<dyn LeaderboardStore>) -> Result<()> {
    info!("Starting Word Battle TUI");

    let mut terminal = ratatui::init();
    let mut app = App::new(handle.view());
    let result = event_loop(&mut terminal, &mut app, &handle, store.as_ref()).await;
    ratatui::restore();

    if let Err(err) = &result {
        error!(error = ?err, "Game loop error");
    }
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    handle: &SessionHandle,
    store: &dyn LeaderboardStore,
) -> Result<()> {
    loop {
        app.sync(handle.view(), Instant::now());
        terminal.draw(|frame| ui::draw(frame, &*app))?;

        if let Some(action) = app.due_actions(Instant::now()) {
            dispatch(app, handle, store, action).await;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        dispatch(app, handle, store, action).await;
                    }
                }
            }
        }

        if app.should_quit() {
            info!("User quit");
            return Ok(());
        }
    }
}

#[instrument(skip(app, handle, store))]
async fn dispatch(
    app: &mut App,
    handle: &SessionHandle,
    store: &dyn LeaderboardStore,
    action: Action,
) {
    let result = match action {
        Action::SetLanguage(language) => handle.set_language(language).await,
        Action::SelectDifficulty(difficulty) => handle.select_difficulty(difficulty).await,
        Action::FinishIntro => handle.finish_intro().await,
        Action::Submit(word) => handle.submit(&word).await,
        Action::Surrender => handle.surrender().await,
        Action::Reset => handle.reset().await,
        Action::SubmitScore(name) => handle.submit_score(&name).await,
        Action::LoadLeaderboard(filter) => {
            match store.list_top(filter, DEFAULT_LIMIT).await {
                Ok(entries) => app.show_leaderboard(filter, entries),
                Err(err) => {
                    warn!(error = %err, "Could not load leaderboard");
                    app.set_status(format!("Could not load the leaderboard: {}", err.message));
                }
            }
            Ok(())
        }
        Action::Quit => Ok(()),
    };

    match result {
        Ok(()) => {}
        // The controller already published a notification for these.
        Err(CommandError::Invalid(err)) => debug!(error = %err, "Command refused"),
        Err(err) => {
            warn!(error = %err, "Command failed");
            app.set_status(err.to_string());
        }
    }
}
