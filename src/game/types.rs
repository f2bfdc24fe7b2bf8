//! Core game vocabulary: difficulty, language, moves and outcomes.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::instrument;

/// Emoji recorded for a word the judge refused.
pub const REJECTED_EMOJI: &str = "💀";

/// Explanation attached to the seed move.
pub const SEED_EXPLANATION: &str = "Starting word";

/// Difficulty level, which fixes the time allowed per word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// 60 seconds per word.
    Easy,
    /// 30 seconds per word.
    Medium,
    /// 15 seconds per word.
    Hard,
}

impl Difficulty {
    /// Seconds on the clock at the start of each turn.
    pub fn duration_secs(self) -> u32 {
        match self {
            Self::Easy => 60,
            Self::Medium => 30,
            Self::Hard => 15,
        }
    }
}

/// Language the game is played in. Also selects the judge's reply language.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    /// French.
    #[default]
    Fr,
    /// English.
    En,
    /// German.
    De,
    /// Spanish.
    Es,
    /// Italian.
    It,
}

impl Language {
    /// The word every game in this language starts from.
    pub fn seed_word(self) -> &'static str {
        match self {
            Self::Fr => "Fourmi",
            Self::En => "Ant",
            Self::De => "Ameise",
            Self::Es => "Hormiga",
            Self::It => "Formica",
        }
    }

    /// Emoji paired with the seed word.
    pub fn seed_emoji(self) -> &'static str {
        "🐜"
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GameOverReason {
    /// The countdown reached zero.
    #[strum(serialize = "time is up")]
    TimedOut,
    /// The judge refused a word, or the player gave up.
    #[strum(serialize = "word rejected")]
    RejectedWord,
}

/// One recorded word with the judge's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Move {
    word: String,
    explanation: String,
    emoji: String,
    accepted: bool,
}

impl Move {
    /// The non-scoring first move for a language.
    #[instrument]
    pub fn seed(language: Language) -> Self {
        Self {
            word: language.seed_word().to_string(),
            explanation: SEED_EXPLANATION.to_string(),
            emoji: language.seed_emoji().to_string(),
            accepted: true,
        }
    }

    /// A word the judge accepted.
    pub fn won(word: String, explanation: String, emoji: String) -> Self {
        Self {
            word,
            explanation,
            emoji,
            accepted: true,
        }
    }

    /// A word the judge refused. Always carries [`REJECTED_EMOJI`].
    pub fn lost(word: String, explanation: String) -> Self {
        Self {
            word,
            explanation,
            emoji: REJECTED_EMOJI.to_string(),
            accepted: false,
        }
    }
}
