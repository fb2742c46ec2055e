//! Member commands
//!
//! Usage: roster member <add|get|list|find|rename|remove>

use super::{ok, render, CliResult, Store};
use clap::{Args, Subcommand};
use roster_core::MemberUpdate;

#[derive(Debug, Args)]
pub struct MemberArgs {
    #[command(subcommand)]
    pub command: MemberCommand,
}

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Create a member
    Add {
        /// Unique username (case-insensitive)
        username: String,
    },
    /// Show one member
    Get { id: i64 },
    /// List all members
    List,
    /// Look up a member by username
    Find { username: String },
    /// Replace a member's username
    Rename { id: i64, username: String },
    /// Delete a member that owns no groups
    Remove { id: i64 },
}

pub fn execute(service: &mut Store<'_>, args: MemberArgs) -> CliResult {
    match args.command {
        MemberCommand::Add { username } => render(&service.create_member(&username)?),
        MemberCommand::Get { id } => render(&service.get_member(id)?),
        MemberCommand::List => render(&service.list_members()?),
        MemberCommand::Find { username } => render(&service.find_member_by_username(&username)?),
        MemberCommand::Rename { id, username } => {
            render(&service.update_member(id, MemberUpdate::new(username))?)
        }
        MemberCommand::Remove { id } => {
            service.delete_member(id)?;
            ok()
        }
    }
}
