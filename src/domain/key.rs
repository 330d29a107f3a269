use std::sync::LazyLock;

use regex::Regex;

static KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("key pattern is valid"));

/// Reasons a row key is rejected.
///
/// The [`Display`](std::fmt::Display) output is the message shown beside the
/// row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// The key is empty or only whitespace.
    #[error("Key is required.")]
    Required,

    /// The key contains something other than ASCII letters, digits and `_`.
    #[error("Only letters, digits, and underscore allowed.")]
    InvalidCharacters,
}

/// Checks a candidate key.
///
/// Blankness is judged after trimming, but the character check runs on the
/// key as typed, so `" FOO"` is rejected.
///
/// # Errors
///
/// Returns [`KeyError::Required`] for a blank key and
/// [`KeyError::InvalidCharacters`] for a key outside `[A-Za-z0-9_]+`.
///
/// # Examples
///
/// ```
/// use envpad::{validate_key, KeyError};
///
/// assert!(validate_key("DATABASE_URL").is_ok());
/// assert_eq!(validate_key("  "), Err(KeyError::Required));
/// assert_eq!(validate_key("my-key"), Err(KeyError::InvalidCharacters));
/// ```
pub fn validate_key(key: &str) -> Result<(), KeyError> {
    if key.trim().is_empty() {
        return Err(KeyError::Required);
    }
    if !KEY_PATTERN.is_match(key) {
        return Err(KeyError::InvalidCharacters);
    }
    Ok(())
}
