//! Group commands
//!
//! Usage: roster group <add|get|list|rename|remove|members|owned-by>

use super::{ok, render, CliResult, Store};
use clap::{Args, Subcommand};
use roster_core::GroupUpdate;

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a group owned by an existing member
    Add {
        title: String,
        /// Owner member id
        #[arg(long)]
        owner: i64,
    },
    /// Show one group
    Get { id: i64 },
    /// List all groups
    List,
    /// Replace a group's title
    Rename { id: i64, title: String },
    /// Delete a group and all of its memberships
    Remove { id: i64 },
    /// List a group's participants
    Members { id: i64 },
    /// List the groups a member created
    OwnedBy { member_id: i64 },
}

#[derive(Debug, Args)]
pub struct MembershipArgs {
    /// Member id
    #[arg(long)]
    pub member_id: i64,
    /// Group id
    #[arg(long)]
    pub group_id: i64,
}

pub fn execute(service: &mut Store<'_>, args: GroupArgs) -> CliResult {
    match args.command {
        GroupCommand::Add { title, owner } => render(&service.create_group(&title, owner)?),
        GroupCommand::Get { id } => render(&service.get_group(id)?),
        GroupCommand::List => render(&service.list_groups()?),
        GroupCommand::Rename { id, title } => {
            render(&service.update_group(id, GroupUpdate::new(title))?)
        }
        GroupCommand::Remove { id } => {
            service.delete_group(id)?;
            ok()
        }
        GroupCommand::Members { id } => render(&service.list_members_for_group(id)?),
        GroupCommand::OwnedBy { member_id } => render(&service.list_groups_owned_by(member_id)?),
    }
}
