//! Leaderboard records, wire payloads and database rows.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::game::{Difficulty, Language, validate_player_name};
use crate::leaderboard::{StoreError, schema};

/// One finished game as recorded on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    player_name: String,
    score: u32,
    difficulty: Difficulty,
    date: DateTime<Utc>,
    words: Vec<String>,
    language: String,
}

impl LeaderboardEntry {
    /// Checks the entry against leaderboard rules and returns it with a
    /// trimmed player name.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidEntry`](crate::StoreErrorKind::InvalidEntry) error
    /// for a blank or over-long player name.
    #[instrument(skip(self), fields(player_name = %self.player_name))]
    pub fn validate(mut self) -> Result<Self, StoreError> {
        self.player_name = validate_player_name(&self.player_name).map_err(|e| {
            warn!(error = %e, "Refusing leaderboard entry");
            StoreError::invalid_entry(e.to_string())
        })?;
        Ok(self)
    }
}

/// A [`LeaderboardEntry`] with its store-assigned identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct StoredEntry {
    id: i32,
    #[serde(flatten)]
    entry: LeaderboardEntry,
}

/// Which difficulty a listing is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DifficultyFilter {
    /// Every difficulty.
    #[default]
    All,
    /// Only this difficulty.
    Only(Difficulty),
}

impl DifficultyFilter {
    /// Whether an entry played at `difficulty` passes the filter.
    pub fn admits(self, difficulty: Difficulty) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == difficulty,
        }
    }
}

impl FromStr for DifficultyFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        Difficulty::from_str(&s.to_ascii_lowercase()).map(Self::Only)
    }
}

impl std::fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(difficulty) => write!(f, "{}", difficulty),
        }
    }
}

/// `POST /leaderboard` body: an entry without identity whose required
/// fields may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSubmission {
    /// Required.
    pub player_name: Option<String>,
    /// Required.
    pub score: Option<u32>,
    /// Required.
    pub difficulty: Option<Difficulty>,
    /// Defaults to the time of receipt.
    pub date: Option<DateTime<Utc>>,
    /// Defaults to no words.
    pub words: Option<Vec<String>>,
    /// Defaults to French.
    pub language: Option<String>,
}

impl LeaderboardSubmission {
    /// Fills defaults and checks required fields are present.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidEntry`](crate::StoreErrorKind::InvalidEntry) error
    /// if the player name, score or difficulty is missing.
    #[instrument(skip(self))]
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<LeaderboardEntry, StoreError> {
        let (Some(player_name), Some(score), Some(difficulty)) =
            (self.player_name, self.score, self.difficulty)
        else {
            warn!("Leaderboard submission missing required fields");
            return Err(StoreError::invalid_entry("Missing required fields"));
        };
        Ok(LeaderboardEntry::new(
            player_name,
            score,
            difficulty,
            self.date.unwrap_or(now),
            self.words.unwrap_or_default(),
            self.language
                .unwrap_or_else(|| Language::default().to_string()),
        ))
    }
}

impl From<&LeaderboardEntry> for LeaderboardSubmission {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            player_name: Some(entry.player_name.clone()),
            score: Some(entry.score),
            difficulty: Some(entry.difficulty),
            date: Some(entry.date),
            words: Some(entry.words.clone()),
            language: Some(entry.language.clone()),
        }
    }
}

/// Leaderboard table row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::leaderboard)]
pub struct LeaderboardRow {
    id: i32,
    player_name: String,
    score: i32,
    difficulty: String,
    played_at: String,
    words: String,
    language: String,
}

impl LeaderboardRow {
    /// Decodes the row into a [`StoredEntry`].
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`](crate::StoreErrorKind::Unavailable) error if
    /// a column holds a value this crate never writes.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn into_stored(self) -> Result<StoredEntry, StoreError> {
        let corrupt = |what: &str, detail: String| {
            warn!(id = self.id, what, detail = %detail, "Corrupt leaderboard row");
            StoreError::unavailable(format!("Corrupt {} in row {}: {}", what, self.id, detail))
        };

        let score = u32::try_from(self.score).map_err(|e| corrupt("score", e.to_string()))?;
        let difficulty = Difficulty::from_str(&self.difficulty)
            .map_err(|e| corrupt("difficulty", e.to_string()))?;
        let date = DateTime::parse_from_rfc3339(&self.played_at)
            .map_err(|e| corrupt("date", e.to_string()))?
            .with_timezone(&Utc);
        let words: Vec<String> =
            serde_json::from_str(&self.words).map_err(|e| corrupt("words", e.to_string()))?;

        Ok(StoredEntry::new(
            self.id,
            LeaderboardEntry::new(
                self.player_name,
                score,
                difficulty,
                date,
                words,
                self.language,
            ),
        ))
    }
}

/// Insertable leaderboard row.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::leaderboard)]
pub struct NewLeaderboardRow {
    player_name: String,
    score: i32,
    difficulty: String,
    played_at: String,
    words: String,
    language: String,
}

impl NewLeaderboardRow {
    /// Encodes an entry for insertion.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidEntry`](crate::StoreErrorKind::InvalidEntry) error
    /// if the score does not fit the column.
    #[instrument(skip(entry), fields(player_name = %entry.player_name))]
    pub fn from_entry(entry: &LeaderboardEntry) -> Result<Self, StoreError> {
        let score = i32::try_from(entry.score)
            .map_err(|_| StoreError::invalid_entry(format!("Score {} is too large", entry.score)))?;
        let words = serde_json::to_string(&entry.words)
            .map_err(|e| StoreError::invalid_entry(format!("Unencodable words: {}", e)))?;
        Ok(Self {
            player_name: entry.player_name.clone(),
            score,
            difficulty: entry.difficulty.to_string(),
            played_at: entry.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            words,
            language: entry.language.clone(),
        })
    }
}
