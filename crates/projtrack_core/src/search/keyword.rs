//! Keyword filter behind the "search projects by name or status" bar.
//!
//! # Invariants
//! - Matching is case-insensitive substring matching over `Project::keywords`.
//! - Every whitespace-separated token must match at least one keyword.
//! - A blank query matches everything.
//! - Output preserves input order.

use crate::model::project::Project;

/// Returns whether `project` matches the search text.
pub fn matches_query(project: &Project, query: &str) -> bool {
    let keywords = project
        .keywords()
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>();

    query
        .to_lowercase()
        .split_whitespace()
        .all(|token| keywords.iter().any(|keyword| keyword.contains(token)))
}

/// Filters projects by search text, keeping their order.
pub fn filter_projects<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    query: &str,
) -> Vec<&'a Project> {
    projects
        .into_iter()
        .filter(|project| matches_query(project, query))
        .collect()
}
