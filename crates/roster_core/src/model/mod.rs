//! Roster domain model.
//!
//! # Responsibility
//! - Define in-memory entity shapes independent of the SQL schema.
//! - Own field-level validation performed before any storage access.
//!
//! # Invariants
//! - Entity ids are assigned by storage and never reused.
//! - Validated values are already trimmed; storage never re-normalizes them.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group;
pub mod member;

/// Field-level validation failures raised before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is blank after trimming.
    EmptyUsername,
    /// Username exceeds the maximum character count.
    UsernameTooLong { max: usize, actual: usize },
    /// Username contains a character outside the allowed set.
    InvalidUsernameChars(String),
    /// Group title is blank after trimming.
    EmptyTitle,
    /// Group title exceeds the maximum character count.
    TitleTooLong { max: usize, actual: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be blank"),
            Self::UsernameTooLong { max, actual } => {
                write!(f, "username has {actual} characters; at most {max} allowed")
            }
            Self::InvalidUsernameChars(value) => write!(
                f,
                "username `{value}` may only contain ASCII letters, digits, `_`, `.` and `-`"
            ),
            Self::EmptyTitle => write!(f, "group title must not be blank"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "group title has {actual} characters; at most {max} allowed")
            }
        }
    }
}

impl Error for ValidationError {}
