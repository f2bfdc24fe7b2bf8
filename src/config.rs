//! Application configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::game::Language;
use crate::llm_client::{LlmConfig, LlmProvider};

/// File read by [`AppConfig::load`] when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "word_battle.toml";

/// Settings for the server, the terminal game and the judge.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// LLM provider (openai or anthropic).
    #[serde(default)]
    llm_provider: LlmProvider,

    /// LLM model name.
    #[serde(default = "default_model")]
    llm_model: String,

    /// Maximum tokens for a ruling.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Sampling temperature for rulings.
    #[serde(default = "default_temperature")]
    llm_temperature: f32,

    /// Address the server binds to.
    #[serde(default = "default_host")]
    host: String,

    /// Port the server binds to.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite leaderboard file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Language of new terminal games.
    #[serde(default)]
    language: Language,

    /// Remote `/check-word` URL. When set, the terminal game uses it instead
    /// of calling the LLM directly.
    #[serde(default)]
    #[setters(strip_option)]
    judge_url: Option<String>,

    /// Remote `/leaderboard` URL. When set, scores go there instead of the
    /// local database.
    #[serde(default)]
    #[setters(strip_option)]
    leaderboard_url: Option<String>,
}

#[instrument]
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[instrument]
fn default_max_tokens() -> u32 {
    100
}

#[instrument]
fn default_temperature() -> f32 {
    0.65
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_db_path() -> String {
    "word_battle.db".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm_provider: LlmProvider::default(),
            llm_model: default_model(),
            llm_max_tokens: default_max_tokens(),
            llm_temperature: default_temperature(),
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            language: Language::default(),
            judge_url: None,
            leaderboard_url: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            provider = %config.llm_provider,
            model = %config.llm_model,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file is named or found but cannot be read
    /// or parsed.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Creates LLM configuration from this config.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY environment variable.
    #[instrument(skip(self), fields(provider = %self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
            self.llm_temperature,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
