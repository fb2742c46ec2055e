//! Roster CLI.
//!
//! # Responsibility
//! - Provide a thin executable over `roster_core` for local smoke checks.
//! - Map typed store errors onto stable exit codes.

use clap::{Parser, Subcommand};
use commands::{CliError, CliResult};
use roster_core::db::open_db;
use roster_core::{RosterError, RosterService, SqliteRosterRepository};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "roster")]
#[command(about = "Roster - members, groups and memberships", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file; created and migrated on first use
    #[arg(long, env = "ROSTER_DB")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "ROSTER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Member operations
    Member(commands::member::MemberArgs),
    /// Group operations
    Group(commands::group::GroupArgs),
    /// Add a member to a group (no-op when already enrolled)
    Enroll(commands::group::MembershipArgs),
    /// Remove a member from a group (no-op when not enrolled)
    Unenroll(commands::group::MembershipArgs),
    /// List the groups a member participates in
    GroupsOf {
        /// Member id
        member_id: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| roster_core::default_log_level().to_string());
        if let Err(err) = roster_core::init_logging(&level, log_dir) {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    }

    let mut conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Error: failed to open `{}`: {err}", cli.db.display());
            return ExitCode::from(1);
        }
    };

    let result = SqliteRosterRepository::try_new(&mut conn)
        .map_err(|err| CliError::from(RosterError::from(err)))
        .and_then(|repo| run(RosterService::new(repo), cli.command));

    match result {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(
    mut service: RosterService<SqliteRosterRepository<'_>>,
    command: Commands,
) -> CliResult {
    match command {
        Commands::Member(args) => commands::member::execute(&mut service, args),
        Commands::Group(args) => commands::group::execute(&mut service, args),
        Commands::Enroll(args) => {
            service.enroll(args.member_id, args.group_id)?;
            commands::ok()
        }
        Commands::Unenroll(args) => {
            service.unenroll(args.member_id, args.group_id)?;
            commands::ok()
        }
        Commands::GroupsOf { member_id } => {
            commands::render(&service.list_groups_for_member(member_id)?)
        }
    }
}
