//! `GET /leaderboard` and `POST /leaderboard`.

use std::num::NonZeroUsize;
use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::leaderboard::{DEFAULT_LIMIT, DifficultyFilter, LeaderboardSubmission, StoredEntry};
use crate::server::{ApiError, AppState};

/// Query string of `GET /leaderboard`. Both fields are read as text so bad
/// values get a JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// `easy`, `medium`, `hard` or `all`.
    pub difficulty: Option<String>,
    /// Positive entry count.
    pub limit: Option<String>,
}

impl ListParams {
    fn filter(&self) -> Result<DifficultyFilter, ApiError> {
        match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => Ok(DifficultyFilter::All),
            Some(raw) => DifficultyFilter::from_str(raw)
                .map_err(|_| ApiError::bad_request(format!("Invalid difficulty: {}", raw))),
        }
    }

    fn limit(&self) -> Result<NonZeroUsize, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_LIMIT),
            Some(raw) => NonZeroUsize::from_str(raw)
                .map_err(|_| ApiError::bad_request(format!("Invalid limit: {}", raw))),
        }
    }
}

/// Lists top scores.
#[instrument(skip(state))]
pub async fn list_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StoredEntry>>, ApiError> {
    let filter = params.filter()?;
    let limit = params.limit()?;
    debug!(%filter, limit = limit.get(), "Listing leaderboard");

    let entries = state.store().list_top(filter, limit).await?;
    Ok(Json(entries))
}

/// Stores a score.
#[instrument(skip_all)]
pub async fn submit_score(
    State(state): State<AppState>,
    payload: Result<Json<LeaderboardSubmission>, JsonRejection>,
) -> Result<Json<StoredEntry>, ApiError> {
    let Json(submission) = payload
        .map_err(|rejection| ApiError::from_rejection(&rejection, "Missing required fields"))?;
    let entry = submission.into_entry(Utc::now())?;

    let stored = state.store().submit(entry).await?;
    info!(id = stored.id(), player_name = %stored.entry().player_name(), "Score submitted");
    Ok(Json(stored))
}
