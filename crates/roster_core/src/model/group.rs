//! Group domain model.
//!
//! # Invariants
//! - `owner_id` referenced an existing member when the group was created.
//! - The participant set is stored separately and never duplicates a member.
//! - Participants are loaded through explicit queries, never through fields
//!   on this struct.

use super::member::MemberId;
use super::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-assigned group identifier.
pub type GroupId = i64;

/// Maximum group title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// A group owned by one member, with a separate participant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub owner_id: MemberId,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
}

/// Whole-field replacement payload for `update_group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub title: String,
}

impl GroupUpdate {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Trims and validates a group title.
pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let chars = trimmed.chars().count();
    if chars > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual: chars,
        });
    }

    Ok(trimmed.to_string())
}
