//! SQLite repository for leaderboard entries.

use std::num::NonZeroUsize;

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::leaderboard::{
    DifficultyFilter, LeaderboardEntry, LeaderboardRow, NewLeaderboardRow, StoreError,
    StoredEntry, schema,
};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for leaderboard operations.
///
/// Opens a fresh connection per call, so a repository can be shared across
/// blocking tasks by cloning.
#[derive(Debug, Clone)]
pub struct LeaderboardRepository {
    db_path: String,
}

impl LeaderboardRepository {
    /// Creates a repository for the database at `db_path`.
    ///
    /// Nothing is opened until the first call.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Self {
        info!(path = %db_path, "Creating LeaderboardRepository");
        Self { db_path }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::unavailable(format!("Failed to connect to '{}': {}", self.db_path, e))
        })
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::unavailable(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Stores a validated entry and returns it with its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the entry is invalid or a database error
    /// occurs.
    #[instrument(
        skip(self, entry),
        fields(player_name = %entry.player_name(), score = entry.score())
    )]
    pub fn insert(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError> {
        let entry = entry.validate()?;
        let row = NewLeaderboardRow::from_entry(&entry)?;
        let mut conn = self.connection()?;

        let id = diesel::insert_into(schema::leaderboard::table)
            .values(&row)
            .returning(schema::leaderboard::id)
            .get_result::<i32>(&mut conn)?;

        info!(id, "Leaderboard entry stored");
        Ok(StoredEntry::new(id, entry))
    }

    /// Top entries by score, highest first. Ties go to the earlier game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a database error occurs or a row cannot be
    /// decoded.
    #[instrument(skip(self))]
    pub fn top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        debug!(%filter, limit = limit.get(), "Loading leaderboard");
        let mut conn = self.connection()?;

        let mut query = schema::leaderboard::table
            .select(LeaderboardRow::as_select())
            .into_boxed();
        if let DifficultyFilter::Only(difficulty) = filter {
            query = query.filter(schema::leaderboard::difficulty.eq(difficulty.to_string()));
        }
        let limit = i64::try_from(limit.get()).unwrap_or(i64::MAX);

        let rows = query
            .order((
                schema::leaderboard::score.desc(),
                schema::leaderboard::played_at.asc(),
                schema::leaderboard::id.asc(),
            ))
            .limit(limit)
            .load::<LeaderboardRow>(&mut conn)?;

        let entries = rows
            .into_iter()
            .map(LeaderboardRow::into_stored)
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = entries.len(), "Leaderboard loaded");
        Ok(entries)
    }
}
