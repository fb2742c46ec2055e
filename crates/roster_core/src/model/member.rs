//! Member domain model.
//!
//! # Invariants
//! - `username` is unique across all members, compared case-insensitively.
//! - The stored `username` keeps the casing supplied by the caller.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Storage-assigned member identifier.
pub type MemberId = i64;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 50;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid username regex"));

/// A user-like entity identified by a unique username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
}

/// Whole-field replacement payload for `update_member`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUpdate {
    pub username: String,
}

impl MemberUpdate {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Trims and validates a username.
///
/// Only ASCII is accepted so that SQLite `NOCASE` folding covers every
/// character that can appear in a stored username.
pub fn normalize_username(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }

    let chars = trimmed.chars().count();
    if chars > USERNAME_MAX_CHARS {
        return Err(ValidationError::UsernameTooLong {
            max: USERNAME_MAX_CHARS,
            actual: chars,
        });
    }

    if !USERNAME_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidUsernameChars(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_username, USERNAME_MAX_CHARS};
    use crate::model::ValidationError;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize_username("  alice ").unwrap(), "alice");
    }

    #[test]
    fn keeps_caller_casing() {
        assert_eq!(normalize_username("Alice.B-2_x").unwrap(), "Alice.B-2_x");
    }

    #[test]
    fn rejects_blank() {
        assert_eq!(
            normalize_username(" \t ").unwrap_err(),
            ValidationError::EmptyUsername
        );
    }

    #[test]
    fn rejects_inner_whitespace_and_non_ascii() {
        assert!(matches!(
            normalize_username("al ice"),
            Err(ValidationError::InvalidUsernameChars(_))
        ));
        assert!(matches!(
            normalize_username("zoë"),
            Err(ValidationError::InvalidUsernameChars(_))
        ));
    }

    #[test]
    fn rejects_overlong() {
        let long = "a".repeat(USERNAME_MAX_CHARS + 1);
        assert_eq!(
            normalize_username(&long).unwrap_err(),
            ValidationError::UsernameTooLong {
                max: USERNAME_MAX_CHARS,
                actual: USERNAME_MAX_CHARS + 1,
            }
        );
        assert!(normalize_username(&"a".repeat(USERNAME_MAX_CHARS)).is_ok());
    }
}
