//! Leaderboard store: a persisted, ranked list of finished games.

mod error;
mod http;
mod models;
mod repository;
mod schema;
mod store;

pub use error::{StoreError, StoreErrorKind};
pub use http::HttpLeaderboard;
pub use models::{
    DifficultyFilter, LeaderboardEntry, LeaderboardRow, LeaderboardSubmission, NewLeaderboardRow,
    StoredEntry,
};
pub use repository::LeaderboardRepository;
pub use store::{DEFAULT_LIMIT, InMemoryLeaderboard, LeaderboardStore, SqliteLeaderboard};
