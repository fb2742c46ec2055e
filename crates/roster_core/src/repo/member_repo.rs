//! Member repository contract and SQLite implementation.
//!
//! # Invariants
//! - Username uniqueness is decided by the `members_username_unique`
//!   constraint, never by a read-then-insert check.
//! - A member owning any group cannot be deleted.
//! - Deleting a member removes its memberships in the same transaction.

use super::store::{
    is_unique_violation, member_exists, RepoError, RepoResult, SqliteRosterRepository,
};
use crate::model::member::{Member, MemberId, MemberUpdate};
use rusqlite::{params, OptionalExtension, Row};

const MEMBER_COLUMNS: &str = "id, username, created_at";

/// Repository interface for member CRUD operations.
pub trait MemberRepository {
    /// Inserts a member and returns the persisted row.
    fn create_member(&mut self, username: &str) -> RepoResult<Member>;
    /// Loads one member by id.
    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>>;
    /// Loads one member by username, compared case-insensitively.
    fn find_member_by_username(&self, username: &str) -> RepoResult<Option<Member>>;
    /// Lists all members ordered by id.
    fn list_members(&self) -> RepoResult<Vec<Member>>;
    /// Replaces all mutable member fields.
    fn update_member(&mut self, id: MemberId, update: &MemberUpdate) -> RepoResult<Member>;
    /// Deletes one member and its memberships.
    fn delete_member(&mut self, id: MemberId) -> RepoResult<()>;
}

impl MemberRepository for SqliteRosterRepository<'_> {
    fn create_member(&mut self, username: &str) -> RepoResult<Member> {
        let tx = self.write_tx()?;
        let member = tx
            .query_row(
                &format!("INSERT INTO members (username) VALUES (?1) RETURNING {MEMBER_COLUMNS};"),
                [username],
                parse_member_row,
            )
            .map_err(|err| username_conflict_or(err, username))?;
        tx.commit()?;
        Ok(member)
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1;"),
                [id],
                parse_member_row,
            )
            .optional()?;
        Ok(member)
    }

    fn find_member_by_username(&self, username: &str) -> RepoResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE username = ?1;"),
                [username],
                parse_member_row,
            )
            .optional()?;
        Ok(member)
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY id ASC;"))?;
        let members = stmt
            .query_map([], parse_member_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(members)
    }

    fn update_member(&mut self, id: MemberId, update: &MemberUpdate) -> RepoResult<Member> {
        let tx = self.write_tx()?;
        let member = tx
            .query_row(
                &format!(
                    "UPDATE members SET username = ?2 WHERE id = ?1 RETURNING {MEMBER_COLUMNS};"
                ),
                params![id, update.username.as_str()],
                parse_member_row,
            )
            .optional()
            .map_err(|err| username_conflict_or(err, update.username.as_str()))?
            .ok_or(RepoError::MemberNotFound(id))?;
        tx.commit()?;
        Ok(member)
    }

    fn delete_member(&mut self, id: MemberId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        if !member_exists(&tx, id)? {
            return Err(RepoError::MemberNotFound(id));
        }

        let owned_groups: u32 = tx.query_row(
            "SELECT COUNT(*) FROM roster_groups WHERE owner_id = ?1;",
            [id],
            |row| row.get(0),
        )?;
        if owned_groups > 0 {
            return Err(RepoError::MemberOwnsGroups {
                member_id: id,
                owned_groups,
            });
        }

        tx.execute("DELETE FROM group_memberships WHERE member_id = ?1;", [id])?;
        tx.execute("DELETE FROM members WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn parse_member_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get("id")?,
        username: row.get("username")?,
        created_at: row.get("created_at")?,
    })
}

fn username_conflict_or(err: rusqlite::Error, username: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::UsernameTaken(username.to_string())
    } else {
        err.into()
    }
}
