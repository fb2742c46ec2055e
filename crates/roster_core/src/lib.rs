//! Core entity store for roster members, groups, and memberships.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::group::{Group, GroupId, GroupUpdate};
pub use model::member::{Member, MemberId, MemberUpdate};
pub use model::ValidationError;
pub use repo::group_repo::GroupRepository;
pub use repo::member_repo::MemberRepository;
pub use repo::{RepoError, RepoResult, SqliteRosterRepository};
pub use service::roster_service::{
    ConflictReason, EntityRef, RosterError, RosterErrorKind, RosterResult, RosterService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
