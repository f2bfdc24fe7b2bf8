//! `POST /check-word`.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{error, info, instrument};

use crate::judge::{JudgeRequest, Verdict};
use crate::server::{ApiError, AppState};

/// Rules on one word and answers with the wire verdict.
#[instrument(skip_all)]
pub async fn check_word(
    State(state): State<AppState>,
    payload: Result<Json<JudgeRequest>, JsonRejection>,
) -> Result<Json<Verdict>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::from_rejection(&rejection, "Missing or invalid required fields")
    })?;
    if request.word.trim().is_empty() {
        return Err(ApiError::bad_request("Missing or invalid required fields"));
    }

    let Some(judge) = state.judge() else {
        error!("No LLM API key configured");
        return Err(ApiError::internal("Missing LLM API key"));
    };

    let result = judge.evaluate(&request).await?;
    info!(word = %request.word, accepted = result.accepted, "Word checked");
    Ok(Json(Verdict::from_result(&result, &request)))
}
