//! Command handlers. Each returns the JSON text to print on success.

use roster_core::{RosterError, RosterErrorKind};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group;
pub mod member;

pub type Store<'conn> = roster_core::RosterService<roster_core::SqliteRosterRepository<'conn>>;

/// Failure of a single CLI invocation.
#[derive(Debug)]
pub enum CliError {
    Roster(RosterError),
    Output(serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 validation, 3 not found, 4 conflict, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Roster(err) => match err.kind() {
                RosterErrorKind::Validation => 2,
                RosterErrorKind::NotFound => 3,
                RosterErrorKind::Conflict => 4,
                RosterErrorKind::Storage => 1,
            },
            Self::Output(_) => 1,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roster(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to render output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Roster(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<RosterError> for CliError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

pub type CliResult = Result<String, CliError>;

pub fn render<T: Serialize + ?Sized>(value: &T) -> CliResult {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn ok() -> CliResult {
    render(&serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::{ok, render, CliError};
    use roster_core::{EntityRef, RosterError, ValidationError};

    #[test]
    fn exit_codes_follow_error_kind() {
        let not_found = CliError::from(RosterError::NotFound(EntityRef::Member(1)));
        assert_eq!(not_found.exit_code(), 3);
        let invalid = CliError::from(RosterError::Validation(ValidationError::EmptyUsername));
        assert_eq!(invalid.exit_code(), 2);
    }

    #[test]
    fn render_emits_pretty_json() {
        assert_eq!(render(&vec![1, 2]).unwrap(), "[\n  1,\n  2\n]");
        assert!(ok().unwrap().contains("\"status\": \"ok\""));
    }
}
