//! Search-bar filtering over the project list.
//!
//! # Responsibility
//! - Match the list's search text against per-project keywords.
//! - Keep list order untouched while filtering.

pub mod keyword;
