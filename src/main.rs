//! Word Battle - Unified CLI
//!
//! Serves the judge and leaderboard endpoints, or plays in the terminal.

#![warn(missing_docs)]

mod cli;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use word_battle::{
    AppConfig, AppState, DifficultyFilter, HttpJudge, HttpLeaderboard, Judge, LeaderboardStore,
    LlmJudge, SessionController, SqliteLeaderboard,
};

const DEFAULT_FILTER: &str = "info,word_battle=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve {
            port,
            host,
            db_path,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(db_path) = db_path {
                config = config.with_db_path(db_path);
            }
            run_http_server(config).await
        }
        Command::Play {
            language,
            judge_url,
            leaderboard_url,
            db_path,
            log_file,
        } => {
            let mut config = config;
            if let Some(language) = language {
                config = config.with_language(language);
            }
            if let Some(url) = judge_url {
                config = config.with_judge_url(url);
            }
            if let Some(url) = leaderboard_url {
                config = config.with_leaderboard_url(url);
            }
            if let Some(db_path) = db_path {
                config = config.with_db_path(db_path);
            }
            run_play(config, log_file).await
        }
        Command::Leaderboard {
            difficulty,
            limit,
            leaderboard_url,
            db_path,
        } => {
            let mut config = config;
            if let Some(url) = leaderboard_url {
                config = config.with_leaderboard_url(url);
            }
            if let Some(db_path) = db_path {
                config = config.with_db_path(db_path);
            }
            run_leaderboard(config, difficulty, limit).await
        }
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();
}

/// Opens the leaderboard the config points at.
#[instrument(skip_all)]
fn open_store(config: &AppConfig) -> Result<Arc<dyn LeaderboardStore>> {
    match config.leaderboard_url() {
        Some(url) => {
            info!(url = %url, "Using remote leaderboard");
            Ok(Arc::new(HttpLeaderboard::new(url)?))
        }
        None => {
            info!(db_path = %config.db_path(), "Using SQLite leaderboard");
            Ok(Arc::new(SqliteLeaderboard::open(config.db_path())?))
        }
    }
}

/// Run the HTTP server
async fn run_http_server(config: AppConfig) -> Result<()> {
    init_stderr_logging();
    info!("Starting Word Battle server");

    let judge: Option<Arc<dyn Judge>> = match config.create_llm_config() {
        Ok(llm) => Some(Arc::new(LlmJudge::new(llm))),
        Err(e) => {
            warn!(error = %e.message, "No LLM credentials; /check-word will answer 500");
            None
        }
    };
    let store = open_store(&config)?;

    word_battle::serve(AppState::new(judge, store), config.host(), *config.port())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

/// Run the terminal game
async fn run_play(config: AppConfig, log_file: PathBuf) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let file = std::fs::File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    let judge: Arc<dyn Judge> = match config.judge_url() {
        Some(url) => {
            info!(url = %url, "Using remote judge");
            Arc::new(HttpJudge::new(url.clone()))
        }
        None => Arc::new(LlmJudge::new(config.create_llm_config()?)),
    };
    let store = open_store(&config)?;

    let handle = SessionController::spawn(*config.language(), judge, Arc::clone(&store));
    tui::run_tui(handle, store).await
}

/// Print the top scores
async fn run_leaderboard(
    config: AppConfig,
    filter: DifficultyFilter,
    limit: std::num::NonZeroUsize,
) -> Result<()> {
    init_stderr_logging();
    let store = open_store(&config)?;
    let entries = store.list_top(filter, limit).await?;

    if entries.is_empty() {
        println!("No scores yet ({}).", filter);
        return Ok(());
    }
    println!("{:>3}  {:<20}  {:>5}  {:<6}  {}", "#", "Player", "Score", "Level", "Date");
    for (rank, stored) in entries.iter().enumerate() {
        let entry = stored.entry();
        println!(
            "{:>3}  {:<20}  {:>5}  {:<6}  {}",
            rank + 1,
            entry.player_name(),
            entry.score(),
            entry.difficulty().to_string(),
            entry.date().format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}
