//! Request and verdict payloads exchanged with the judge endpoint.

use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::game::Language;
use crate::judge::JudgeError;

/// What the judge needs to rule on a word.
///
/// Serialized as the `/check-word` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct JudgeRequest {
    /// The candidate word.
    pub word: String,
    /// Every word already played, seed included.
    pub previous_words: Vec<String>,
    /// The word the candidate must beat.
    pub current_word: String,
    /// Language of the game and of the explanation.
    #[serde(default)]
    pub language: Language,
}

/// The judge's ruling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct JudgeResult {
    /// Whether the candidate beats the current word.
    pub accepted: bool,
    /// Short human-readable reason.
    pub explanation: String,
    /// Emoji for the candidate.
    pub emoji: String,
    /// Whether the judge saw the candidate as already used.
    pub was_duplicate: bool,
}

/// Wire shape of a ruling, as produced by the model and served by
/// `/check-word`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Short reason for or against.
    #[serde(rename = "explication_pour_ou_contre")]
    pub explanation: String,
    /// The word that had to be beaten.
    #[serde(rename = "mot_precedent", default)]
    pub previous_word: String,
    /// The candidate word.
    #[serde(rename = "mot_soumis_par_utilisateur", default)]
    pub submitted_word: String,
    /// Emoji for the candidate.
    #[serde(rename = "smiley_correspondant_au_mot")]
    pub emoji: String,
    /// Whether the candidate had already been played.
    #[serde(rename = "mot_deja_utiliser_precedement", default)]
    pub already_used: bool,
    /// Whether the candidate wins.
    #[serde(rename = "succes")]
    pub success: bool,
}

impl Verdict {
    /// Parses a verdict from raw text.
    ///
    /// Models sometimes wrap the object in prose or code fences, so only the
    /// span from the first `{` to the last `}` is read.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidResponse`](crate::JudgeErrorKind::InvalidResponse)
    /// error if no object is found or required fields are missing.
    #[instrument(skip(raw), fields(raw_length = raw.len()))]
    pub fn parse(raw: &str) -> Result<Self, JudgeError> {
        let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
            warn!(raw = %raw, "No JSON object in judge reply");
            return Err(JudgeError::invalid_response("No JSON object in judge reply"));
        };
        if end < start {
            warn!(raw = %raw, "No JSON object in judge reply");
            return Err(JudgeError::invalid_response("No JSON object in judge reply"));
        }

        let verdict: Self = serde_json::from_str(&raw[start..=end]).map_err(|e| {
            warn!(error = %e, raw = %raw, "Unparseable judge reply");
            JudgeError::invalid_response(format!("Unparseable judge reply: {}", e))
        })?;

        if verdict.explanation.trim().is_empty() {
            return Err(JudgeError::invalid_response("Judge reply has no explanation"));
        }

        debug!(success = verdict.success, already_used = verdict.already_used, "Parsed verdict");
        Ok(verdict)
    }

    /// Builds the wire verdict for a ruling on `request`.
    pub fn from_result(result: &JudgeResult, request: &JudgeRequest) -> Self {
        Self {
            explanation: result.explanation.clone(),
            previous_word: request.current_word.clone(),
            submitted_word: request.word.clone(),
            emoji: result.emoji.clone(),
            already_used: result.was_duplicate,
            success: result.accepted,
        }
    }
}

impl From<Verdict> for JudgeResult {
    fn from(verdict: Verdict) -> Self {
        Self {
            accepted: verdict.success,
            explanation: verdict.explanation,
            emoji: verdict.emoji,
            was_duplicate: verdict.already_used,
        }
    }
}
