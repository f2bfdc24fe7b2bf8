//! Command-line interface for word_battle.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use word_battle::{DifficultyFilter, Language};

/// Word Battle - beat each word with a stronger one before time runs out
#[derive(Parser, Debug)]
#[command(name = "word_battle")]
#[command(about = "Word battle game judged by a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (default: word_battle.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the /check-word and /leaderboard endpoints
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// SQLite leaderboard file
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Play in the terminal
    Play {
        /// Game language (fr, en, de, es, it)
        #[arg(short, long)]
        language: Option<Language>,

        /// Remote /check-word URL instead of calling the LLM directly
        #[arg(long)]
        judge_url: Option<String>,

        /// Remote /leaderboard URL instead of the local database
        #[arg(long)]
        leaderboard_url: Option<String>,

        /// SQLite leaderboard file
        #[arg(long)]
        db_path: Option<String>,

        /// File the game logs to
        #[arg(long, default_value = "word_battle.log")]
        log_file: PathBuf,
    },

    /// Print the top scores
    Leaderboard {
        /// easy, medium, hard or all
        #[arg(short, long, default_value = "all")]
        difficulty: DifficultyFilter,

        /// Number of entries
        #[arg(short, long, default_value = "10")]
        limit: std::num::NonZeroUsize,

        /// Remote /leaderboard URL instead of the local database
        #[arg(long)]
        leaderboard_url: Option<String>,

        /// SQLite leaderboard file
        #[arg(long)]
        db_path: Option<String>,
    },
}
