//! The leaderboard store contract and its local implementations.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument};

use crate::leaderboard::{
    DifficultyFilter, LeaderboardEntry, LeaderboardRepository, StoreError, StoredEntry,
};

/// Entries returned when no limit is given.
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => unreachable!(),
};

/// A persisted, ranked list of scores.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// At most `limit` entries admitted by `filter`, highest score first,
    /// earlier games first among equal scores.
    async fn list_top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError>;

    /// Stores one entry and returns it with its identity. Entries are never
    /// de-duplicated.
    async fn submit(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError>;
}

/// Store backed by a SQLite file through [`LeaderboardRepository`].
#[derive(Debug, Clone)]
pub struct SqliteLeaderboard {
    repository: LeaderboardRepository,
}

impl SqliteLeaderboard {
    /// Opens the database at `db_path` and applies migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be migrated.
    #[instrument]
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let repository = LeaderboardRepository::new(db_path.to_string());
        repository.run_migrations()?;
        info!("SQLite leaderboard ready");
        Ok(Self { repository })
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(LeaderboardRepository) -> Result<T, StoreError> + Send + 'static,
    {
        let repository = self.repository.clone();
        tokio::task::spawn_blocking(move || work(repository))
            .await
            .map_err(|e| {
                error!(error = ?e, "Leaderboard task failed");
                StoreError::unavailable(format!("Leaderboard task failed: {}", e))
            })?
    }
}

#[async_trait]
impl LeaderboardStore for SqliteLeaderboard {
    #[instrument(skip(self))]
    async fn list_top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        self.blocking(move |repository| repository.top(filter, limit))
            .await
    }

    #[instrument(skip(self, entry), fields(player_name = %entry.player_name()))]
    async fn submit(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError> {
        self.blocking(move |repository| repository.insert(entry))
            .await
    }
}

/// Store that keeps entries in memory for the life of the process.
#[derive(Debug, Default)]
pub struct InMemoryLeaderboard {
    entries: Mutex<Vec<StoredEntry>>,
}

impl InMemoryLeaderboard {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboard {
    #[instrument(skip(self))]
    async fn list_top(
        &self,
        filter: DifficultyFilter,
        limit: NonZeroUsize,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        let entries = self.entries.lock().await;
        let mut ranked: Vec<StoredEntry> = entries
            .iter()
            .filter(|stored| filter.admits(*stored.entry().difficulty()))
            .cloned()
            .collect();
        ranked.sort_by(|a, b| {
            b.entry()
                .score()
                .cmp(a.entry().score())
                .then_with(|| a.entry().date().cmp(b.entry().date()))
                .then_with(|| a.id().cmp(b.id()))
        });
        ranked.truncate(limit.get());
        debug!(count = ranked.len(), "Leaderboard listed");
        Ok(ranked)
    }

    #[instrument(skip(self, entry), fields(player_name = %entry.player_name()))]
    async fn submit(&self, entry: LeaderboardEntry) -> Result<StoredEntry, StoreError> {
        let entry = entry.validate()?;
        let mut entries = self.entries.lock().await;
        let id = i32::try_from(entries.len() + 1)
            .map_err(|_| StoreError::unavailable("Leaderboard is full"))?;
        let stored = StoredEntry::new(id, entry);
        entries.push(stored.clone());
        info!(id, "Leaderboard entry stored");
        Ok(stored)
    }
}
