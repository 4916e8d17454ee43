//! Domain model for tracked projects.
//!
//! # Responsibility
//! - Define canonical data structures used by store, views and FFI.
//! - Keep status labels and link kinds as closed enumerations.
//!
//! # Invariants
//! - Every project is identified by a stable `ProjectId`.
//! - Unknown status labels survive a decode/encode cycle untouched.

pub mod project;
pub mod status;
