//! Shared handler state.

use std::sync::Arc;

use crate::judge::Judge;
use crate::leaderboard::LeaderboardStore;

/// What the endpoints need: a judge, when credentials are configured, and
/// the leaderboard store.
#[derive(Clone)]
pub struct AppState {
    judge: Option<Arc<dyn Judge>>,
    store: Arc<dyn LeaderboardStore>,
}

impl AppState {
    /// Creates state with an optional judge.
    pub fn new(judge: Option<Arc<dyn Judge>>, store: Arc<dyn LeaderboardStore>) -> Self {
        Self { judge, store }
    }

    /// The configured judge, if any.
    pub fn judge(&self) -> Option<&Arc<dyn Judge>> {
        self.judge.as_ref()
    }

    /// The leaderboard store.
    pub fn store(&self) -> &Arc<dyn LeaderboardStore> {
        &self.store
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("judge", &self.judge.is_some())
            .finish_non_exhaustive()
    }
}
