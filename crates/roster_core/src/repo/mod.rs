//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for members and groups.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every mutating call runs in its own `BEGIN IMMEDIATE` transaction and
//!   either commits fully or rolls back on drop.
//! - Repository inputs are already validated by the service layer.
//! - Storage constraints (unique username, composite membership key) are the
//!   final arbiter; violations surface as semantic errors, not raw SQLite ones.

pub mod group_repo;
pub mod member_repo;
mod store;

pub use store::{RepoError, RepoResult, SqliteRosterRepository};
