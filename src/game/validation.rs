//! Local checks a word must pass before it is sent to the judge.

use tracing::{debug, instrument};

use crate::game::ValidationError;

/// Maximum number of whitespace-separated tokens in a submission.
pub const MAX_WORD_TOKENS: usize = 3;

/// Maximum length of a leaderboard player name, in characters.
pub const MAX_PLAYER_NAME_CHARS: usize = 20;

/// Checks a raw submission and returns the trimmed word.
///
/// # Errors
///
/// Returns [`ValidationError`] if the input is blank, contains a digit, or
/// has more than [`MAX_WORD_TOKENS`] words.
#[instrument]
pub fn validate_word(input: &str) -> Result<String, ValidationError> {
    let word = input.trim();

    if word.is_empty() {
        debug!("Refusing blank submission");
        return Err(ValidationError::Empty);
    }

    if word.chars().any(|c| c.is_ascii_digit()) {
        debug!("Refusing submission containing digits");
        return Err(ValidationError::ContainsDigit);
    }

    let tokens = word.split_whitespace().count();
    if tokens > MAX_WORD_TOKENS {
        debug!(tokens, "Refusing submission with too many words");
        return Err(ValidationError::TooManyWords);
    }

    Ok(word.to_string())
}

/// Checks a leaderboard player name and returns it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPlayerName`] if the trimmed name is empty
/// or longer than [`MAX_PLAYER_NAME_CHARS`].
#[instrument]
pub fn validate_player_name(input: &str) -> Result<String, ValidationError> {
    let name = input.trim();
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_PLAYER_NAME_CHARS {
        debug!(chars, "Refusing player name");
        return Err(ValidationError::InvalidPlayerName);
    }
    Ok(name.to_string())
}
