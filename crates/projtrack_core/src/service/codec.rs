//! Persisted blob encoding.
//!
//! The whole ordered collection is stored as one JSON array string. There is
//! no schema version; older field sets are absorbed by `Project`'s decoder.

use crate::model::project::Project;

/// Encodes projects, in iteration order, into the persisted blob format.
pub fn encode_projects<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
) -> Result<String, serde_json::Error> {
    let projects = projects.into_iter().collect::<Vec<_>>();
    serde_json::to_string(&projects)
}

/// Decodes a persisted blob into projects, preserving order.
pub fn decode_projects(blob: &str) -> Result<Vec<Project>, serde_json::Error> {
    serde_json::from_str(blob)
}

#[cfg(test)]
mod tests {
    use super::{decode_projects, encode_projects};
    use crate::model::project::{LinkKind, Project};

    #[test]
    fn legacy_blob_without_ids_decodes_with_fresh_ids() {
        let blob = r#"[
            {"title":"Shop","status":"Ongoing","url":"shop-one","repo":"git.example/shop","kanban":"board"},
            {"title":"Site","github":"github.com/acme/site"}
        ]"#;

        let projects = decode_projects(blob).unwrap();
        assert_eq!(projects.len(), 2);
        assert_ne!(projects[0].id, projects[1].id);
        assert_eq!(projects[0].link(LinkKind::Backend), Some("shop-one"));
        assert_eq!(projects[0].link(LinkKind::Repository), Some("git.example/shop"));
        assert_eq!(projects[0].link(LinkKind::Roadmap), Some("board"));
        assert_eq!(
            projects[1].link(LinkKind::Repository),
            Some("github.com/acme/site")
        );
    }

    #[test]
    fn encode_omits_absent_fields_and_keeps_links_flat() {
        let project = Project::new("Acme").with_link(LinkKind::Design, "figma.com/file/1");
        let blob = encode_projects([&project]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();

        assert_eq!(value[0]["title"], "Acme");
        assert_eq!(value[0]["design"], "figma.com/file/1");
        assert!(value[0].get("status").is_none());
        assert!(value[0].get("links").is_none());
    }

    #[test]
    fn missing_title_is_a_decode_error() {
        assert!(decode_projects(r#"[{"status":"Paused"}]"#).is_err());
        assert!(decode_projects("not json").is_err());
    }
}
