//! Group and membership repository contract and SQLite implementation.
//!
//! # Invariants
//! - A group is only inserted when its owner exists in the same transaction.
//! - `(member_id, group_id)` appears at most once in `group_memberships`.
//! - Membership rows never outlive their group.
//! - Participant and group lists are ordered by id ascending.

use super::member_repo::parse_member_row;
use super::store::{
    group_exists, is_foreign_key_violation, member_exists, RepoError, RepoResult,
    SqliteRosterRepository,
};
use crate::model::group::{Group, GroupId, GroupUpdate};
use crate::model::member::{Member, MemberId};
use rusqlite::{params, OptionalExtension, Row};

const GROUP_COLUMNS: &str = "id, title, owner_id, created_at";

/// Repository interface for groups and their participant sets.
pub trait GroupRepository {
    /// Inserts a group owned by `owner_id` with no participants.
    fn create_group(&mut self, title: &str, owner_id: MemberId) -> RepoResult<Group>;
    /// Loads one group by id.
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Lists all groups ordered by id.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;
    /// Lists groups created by one member.
    fn list_groups_owned_by(&self, owner_id: MemberId) -> RepoResult<Vec<Group>>;
    /// Replaces all mutable group fields.
    fn update_group(&mut self, id: GroupId, update: &GroupUpdate) -> RepoResult<Group>;
    /// Deletes one group together with its membership rows.
    fn delete_group(&mut self, id: GroupId) -> RepoResult<()>;
    /// Adds a membership. Returns `false` when it already existed.
    fn enroll(&mut self, member_id: MemberId, group_id: GroupId) -> RepoResult<bool>;
    /// Removes a membership. Returns `false` when there was none.
    fn unenroll(&mut self, member_id: MemberId, group_id: GroupId) -> RepoResult<bool>;
    /// Lists groups the member participates in.
    fn list_groups_for_member(&self, member_id: MemberId) -> RepoResult<Vec<Group>>;
    /// Lists participants of the group.
    fn list_members_for_group(&self, group_id: GroupId) -> RepoResult<Vec<Member>>;
}

impl GroupRepository for SqliteRosterRepository<'_> {
    fn create_group(&mut self, title: &str, owner_id: MemberId) -> RepoResult<Group> {
        let tx = self.write_tx()?;
        if !member_exists(&tx, owner_id)? {
            return Err(RepoError::MemberNotFound(owner_id));
        }

        let group = tx
            .query_row(
                &format!(
                    "INSERT INTO roster_groups (title, owner_id) VALUES (?1, ?2)
                     RETURNING {GROUP_COLUMNS};"
                ),
                params![title, owner_id],
                parse_group_row,
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::MemberNotFound(owner_id)
                } else {
                    err.into()
                }
            })?;
        tx.commit()?;
        Ok(group)
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let group = self
            .conn
            .query_row(
                &format!("SELECT {GROUP_COLUMNS} FROM roster_groups WHERE id = ?1;"),
                [id],
                parse_group_row,
            )
            .optional()?;
        Ok(group)
    }

    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GROUP_COLUMNS} FROM roster_groups ORDER BY id ASC;"
        ))?;
        let groups = stmt
            .query_map([], parse_group_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn list_groups_owned_by(&self, owner_id: MemberId) -> RepoResult<Vec<Group>> {
        let tx = self.read_tx()?;
        if !member_exists(&tx, owner_id)? {
            return Err(RepoError::MemberNotFound(owner_id));
        }

        let groups = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {GROUP_COLUMNS}
                 FROM roster_groups
                 WHERE owner_id = ?1
                 ORDER BY id ASC;"
            ))?;
            let rows = stmt.query_map([owner_id], parse_group_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(groups)
    }

    fn update_group(&mut self, id: GroupId, update: &GroupUpdate) -> RepoResult<Group> {
        let tx = self.write_tx()?;
        let group = tx
            .query_row(
                &format!(
                    "UPDATE roster_groups SET title = ?2 WHERE id = ?1 RETURNING {GROUP_COLUMNS};"
                ),
                params![id, update.title.as_str()],
                parse_group_row,
            )
            .optional()?
            .ok_or(RepoError::GroupNotFound(id))?;
        tx.commit()?;
        Ok(group)
    }

    fn delete_group(&mut self, id: GroupId) -> RepoResult<()> {
        let tx = self.write_tx()?;
        if !group_exists(&tx, id)? {
            return Err(RepoError::GroupNotFound(id));
        }

        tx.execute("DELETE FROM group_memberships WHERE group_id = ?1;", [id])?;
        tx.execute("DELETE FROM roster_groups WHERE id = ?1;", [id])?;
        tx.commit()?;
        Ok(())
    }

    fn enroll(&mut self, member_id: MemberId, group_id: GroupId) -> RepoResult<bool> {
        let tx = self.write_tx()?;
        if !member_exists(&tx, member_id)? {
            return Err(RepoError::MemberNotFound(member_id));
        }
        if !group_exists(&tx, group_id)? {
            return Err(RepoError::GroupNotFound(group_id));
        }

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO group_memberships (member_id, group_id) VALUES (?1, ?2);",
            params![member_id, group_id],
        )?;
        tx.commit()?;
        Ok(inserted == 1)
    }

    fn unenroll(&mut self, member_id: MemberId, group_id: GroupId) -> RepoResult<bool> {
        let tx = self.write_tx()?;
        if !group_exists(&tx, group_id)? {
            return Err(RepoError::GroupNotFound(group_id));
        }

        let removed = tx.execute(
            "DELETE FROM group_memberships WHERE member_id = ?1 AND group_id = ?2;",
            params![member_id, group_id],
        )?;
        tx.commit()?;
        Ok(removed == 1)
    }

    fn list_groups_for_member(&self, member_id: MemberId) -> RepoResult<Vec<Group>> {
        let tx = self.read_tx()?;
        if !member_exists(&tx, member_id)? {
            return Err(RepoError::MemberNotFound(member_id));
        }

        let groups = {
            let mut stmt = tx.prepare(
                "SELECT
                    g.id AS id,
                    g.title AS title,
                    g.owner_id AS owner_id,
                    g.created_at AS created_at
                 FROM roster_groups g
                 INNER JOIN group_memberships gm ON gm.group_id = g.id
                 WHERE gm.member_id = ?1
                 ORDER BY g.id ASC;",
            )?;
            let rows = stmt.query_map([member_id], parse_group_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(groups)
    }

    fn list_members_for_group(&self, group_id: GroupId) -> RepoResult<Vec<Member>> {
        let tx = self.read_tx()?;
        if !group_exists(&tx, group_id)? {
            return Err(RepoError::GroupNotFound(group_id));
        }

        let members = {
            let mut stmt = tx.prepare(
                "SELECT
                    m.id AS id,
                    m.username AS username,
                    m.created_at AS created_at
                 FROM members m
                 INNER JOIN group_memberships gm ON gm.member_id = m.id
                 WHERE gm.group_id = ?1
                 ORDER BY m.id ASC;",
            )?;
            let rows = stmt.query_map([group_id], parse_member_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        tx.commit()?;
        Ok(members)
    }
}

fn parse_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        title: row.get("title")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
    })
}
