//! Roster entity store service.
//!
//! # Responsibility
//! - Expose member/group CRUD and membership operations to callers.
//! - Trim and validate usernames and titles before repository calls.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Every call re-reads storage; the service keeps no entity state.
//! - Errors are never swallowed and never retried here.
//! - Logged events carry ids and outcome codes only, never usernames or titles.

use crate::model::group::{normalize_title, Group, GroupId, GroupUpdate};
use crate::model::member::{normalize_username, Member, MemberId, MemberUpdate};
use crate::model::ValidationError;
use crate::repo::group_repo::GroupRepository;
use crate::repo::member_repo::MemberRepository;
use crate::repo::RepoError;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Identity of an entity that was referenced but not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Member(MemberId),
    Group(GroupId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member(id) => write!(f, "member {id}"),
            Self::Group(id) => write!(f, "group {id}"),
        }
    }
}

/// Invariant a rejected change would have violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// Username is already held by another member.
    UsernameTaken(String),
    /// Member still owns groups; delete or reassign them first.
    MemberOwnsGroups { member_id: MemberId, owned_groups: u32 },
}

impl Display for ConflictReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UsernameTaken(username) => write!(f, "username already taken: `{username}`"),
            Self::MemberOwnsGroups {
                member_id,
                owned_groups,
            } => write!(f, "member {member_id} still owns {owned_groups} group(s)"),
        }
    }
}

/// Coarse error category for callers translating to response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterErrorKind {
    Validation,
    NotFound,
    Conflict,
    Storage,
}

/// Public error type of the entity store.
#[derive(Debug)]
pub enum RosterError {
    /// Input was rejected before storage was touched.
    Validation(ValidationError),
    /// Referenced entity does not exist.
    NotFound(EntityRef),
    /// Change would violate a uniqueness or state invariant.
    Conflict(ConflictReason),
    /// Persistence layer failure.
    Storage(RepoError),
}

impl RosterError {
    pub fn kind(&self) -> RosterErrorKind {
        match self {
            Self::Validation(_) => RosterErrorKind::Validation,
            Self::NotFound(_) => RosterErrorKind::NotFound,
            Self::Conflict(_) => RosterErrorKind::Conflict,
            Self::Storage(_) => RosterErrorKind::Storage,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::NotFound(EntityRef::Member(_)) => "member_not_found",
            Self::NotFound(EntityRef::Group(_)) => "group_not_found",
            Self::Conflict(ConflictReason::UsernameTaken(_)) => "username_taken",
            Self::Conflict(ConflictReason::MemberOwnsGroups { .. }) => "member_owns_groups",
            Self::Storage(_) => "storage_failed",
        }
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Conflict(reason) => write!(f, "{reason}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) => None,
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RosterError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::MemberNotFound(id) => Self::NotFound(EntityRef::Member(id)),
            RepoError::GroupNotFound(id) => Self::NotFound(EntityRef::Group(id)),
            RepoError::UsernameTaken(username) => {
                Self::Conflict(ConflictReason::UsernameTaken(username))
            }
            RepoError::MemberOwnsGroups {
                member_id,
                owned_groups,
            } => Self::Conflict(ConflictReason::MemberOwnsGroups {
                member_id,
                owned_groups,
            }),
            other => Self::Storage(other),
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Entity store facade over member and group repositories.
pub struct RosterService<R> {
    repo: R,
}

impl<R: MemberRepository + GroupRepository> RosterService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a member with a unique username.
    pub fn create_member(&mut self, username: &str) -> RosterResult<Member> {
        let started_at = Instant::now();
        let result = normalize_username(username)
            .map_err(RosterError::from)
            .and_then(|username| {
                self.repo
                    .create_member(&username)
                    .map_err(RosterError::from)
            });
        log_write("member_create", started_at, &result, |member| member.id);
        result
    }

    /// Loads one member by id.
    pub fn get_member(&self, id: MemberId) -> RosterResult<Member> {
        let result = self
            .repo
            .get_member(id)
            .map_err(RosterError::from)
            .and_then(|member| member.ok_or(RosterError::NotFound(EntityRef::Member(id))));
        log_read("member_get", &result);
        result
    }

    /// Looks up a member by username, ignoring ASCII case.
    ///
    /// Returns `Ok(None)` for unknown names and a validation error for
    /// names that could never be stored.
    pub fn find_member_by_username(&self, username: &str) -> RosterResult<Option<Member>> {
        let result = normalize_username(username)
            .map_err(RosterError::from)
            .and_then(|username| {
                self.repo
                    .find_member_by_username(&username)
                    .map_err(RosterError::from)
            });
        log_read("member_find", &result);
        result
    }

    /// Lists all members ordered by id.
    pub fn list_members(&self) -> RosterResult<Vec<Member>> {
        let result = self.repo.list_members().map_err(RosterError::from);
        log_read("member_list", &result);
        result
    }

    /// Replaces a member's username.
    ///
    /// On any failure the stored member is left unchanged.
    pub fn update_member(&mut self, id: MemberId, update: MemberUpdate) -> RosterResult<Member> {
        let started_at = Instant::now();
        let result = normalize_username(&update.username)
            .map_err(RosterError::from)
            .and_then(|username| {
                self.repo
                    .update_member(id, &MemberUpdate { username })
                    .map_err(RosterError::from)
            });
        log_write("member_update", started_at, &result, |member| member.id);
        result
    }

    /// Deletes a member and its memberships.
    ///
    /// Rejected with [`ConflictReason::MemberOwnsGroups`] while the member
    /// still owns any group.
    pub fn delete_member(&mut self, id: MemberId) -> RosterResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_member(id).map_err(RosterError::from);
        log_write("member_delete", started_at, &result, |_| id);
        result
    }

    /// Creates a group owned by an existing member, with no participants.
    pub fn create_group(&mut self, title: &str, owner_id: MemberId) -> RosterResult<Group> {
        let started_at = Instant::now();
        let result = normalize_title(title)
            .map_err(RosterError::from)
            .and_then(|title| {
                self.repo
                    .create_group(&title, owner_id)
                    .map_err(RosterError::from)
            });
        log_write("group_create", started_at, &result, |group| group.id);
        result
    }

    /// Loads one group by id.
    pub fn get_group(&self, id: GroupId) -> RosterResult<Group> {
        let result = self
            .repo
            .get_group(id)
            .map_err(RosterError::from)
            .and_then(|group| group.ok_or(RosterError::NotFound(EntityRef::Group(id))));
        log_read("group_get", &result);
        result
    }

    /// Lists all groups ordered by id.
    pub fn list_groups(&self) -> RosterResult<Vec<Group>> {
        let result = self.repo.list_groups().map_err(RosterError::from);
        log_read("group_list", &result);
        result
    }

    /// Lists the groups a member created.
    pub fn list_groups_owned_by(&self, owner_id: MemberId) -> RosterResult<Vec<Group>> {
        let result = self
            .repo
            .list_groups_owned_by(owner_id)
            .map_err(RosterError::from);
        log_read("group_list_owned", &result);
        result
    }

    /// Replaces a group's title.
    pub fn update_group(&mut self, id: GroupId, update: GroupUpdate) -> RosterResult<Group> {
        let started_at = Instant::now();
        let result = normalize_title(&update.title)
            .map_err(RosterError::from)
            .and_then(|title| {
                self.repo
                    .update_group(id, &GroupUpdate { title })
                    .map_err(RosterError::from)
            });
        log_write("group_update", started_at, &result, |group| group.id);
        result
    }

    /// Deletes a group and every membership row referencing it.
    pub fn delete_group(&mut self, id: GroupId) -> RosterResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_group(id).map_err(RosterError::from);
        log_write("group_delete", started_at, &result, |_| id);
        result
    }

    /// Adds a member to a group's participant set. Idempotent.
    pub fn enroll(&mut self, member_id: MemberId, group_id: GroupId) -> RosterResult<()> {
        let started_at = Instant::now();
        let result = self.repo.enroll(member_id, group_id);
        if let Ok(inserted) = &result {
            debug!(
                "event=group_enroll module=roster member_id={} group_id={} inserted={}",
                member_id, group_id, inserted
            );
        }
        let result = result.map(|_| ()).map_err(RosterError::from);
        log_write("group_enroll", started_at, &result, |_| group_id);
        result
    }

    /// Removes a member from a group's participant set.
    ///
    /// A member that was never enrolled (or does not exist) is a no-op; the
    /// group itself must exist.
    pub fn unenroll(&mut self, member_id: MemberId, group_id: GroupId) -> RosterResult<()> {
        let started_at = Instant::now();
        let result = self.repo.unenroll(member_id, group_id);
        if let Ok(removed) = &result {
            debug!(
                "event=group_unenroll module=roster member_id={} group_id={} removed={}",
                member_id, group_id, removed
            );
        }
        let result = result.map(|_| ()).map_err(RosterError::from);
        log_write("group_unenroll", started_at, &result, |_| group_id);
        result
    }

    /// Lists all groups the member participates in.
    pub fn list_groups_for_member(&self, member_id: MemberId) -> RosterResult<Vec<Group>> {
        let result = self
            .repo
            .list_groups_for_member(member_id)
            .map_err(RosterError::from);
        log_read("member_groups", &result);
        result
    }

    /// Lists all participants of the group.
    pub fn list_members_for_group(&self, group_id: GroupId) -> RosterResult<Vec<Member>> {
        let result = self
            .repo
            .list_members_for_group(group_id)
            .map_err(RosterError::from);
        log_read("group_members", &result);
        result
    }
}

fn log_write<T>(
    event: &'static str,
    started_at: Instant,
    result: &RosterResult<T>,
    entity_id: impl FnOnce(&T) -> i64,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => info!(
            "event={} module=roster status=ok id={} duration_ms={}",
            event,
            entity_id(value),
            duration_ms
        ),
        Err(err @ RosterError::Storage(_)) => error!(
            "event={} module=roster status=error duration_ms={} error_code={} error={}",
            event,
            duration_ms,
            err.code(),
            err
        ),
        Err(err) => warn!(
            "event={} module=roster status=rejected duration_ms={} error_code={}",
            event,
            duration_ms,
            err.code()
        ),
    }
}

fn log_read<T>(event: &'static str, result: &RosterResult<T>) {
    match result {
        Ok(_) => debug!("event={event} module=roster status=ok"),
        Err(err @ RosterError::Storage(_)) => error!(
            "event={} module=roster status=error error_code={} error={}",
            event,
            err.code(),
            err
        ),
        Err(err) => debug!(
            "event={} module=roster status=rejected error_code={}",
            event,
            err.code()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConflictReason, EntityRef, RosterError, RosterErrorKind};
    use crate::model::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn repo_not_found_maps_to_typed_entity() {
        let err = RosterError::from(RepoError::GroupNotFound(10));
        assert!(matches!(err, RosterError::NotFound(EntityRef::Group(10))));
        assert_eq!(err.kind(), RosterErrorKind::NotFound);
        assert_eq!(err.code(), "group_not_found");
    }

    #[test]
    fn repo_constraint_errors_map_to_conflict() {
        let taken = RosterError::from(RepoError::UsernameTaken("bob".to_string()));
        assert!(matches!(
            taken,
            RosterError::Conflict(ConflictReason::UsernameTaken(ref name)) if name == "bob"
        ));

        let owns = RosterError::from(RepoError::MemberOwnsGroups {
            member_id: 1,
            owned_groups: 2,
        });
        assert_eq!(owns.kind(), RosterErrorKind::Conflict);
        assert_eq!(owns.to_string(), "member 1 still owns 2 group(s)");
    }

    #[test]
    fn schema_errors_map_to_storage() {
        let err = RosterError::from(RepoError::MissingRequiredTable("members"));
        assert_eq!(err.kind(), RosterErrorKind::Storage);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validation_error_keeps_source() {
        let err = RosterError::from(ValidationError::EmptyTitle);
        assert_eq!(err.kind(), RosterErrorKind::Validation);
        assert_eq!(err.to_string(), "group title must not be blank");
    }
}
