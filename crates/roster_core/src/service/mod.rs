//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before any storage access.
//! - Orchestrate repository calls into the public entity store API.
//! - Map repository failures onto the public error taxonomy.

pub mod roster_service;
