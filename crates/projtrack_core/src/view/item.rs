//! List row and detail pane projections.
//!
//! # Responsibility
//! - Shape one project into what the host list and detail pane render.
//!
//! # Invariants
//! - Projections are pure; they never touch storage.
//! - Detail metadata always lists every `LinkKind`, present or not, followed
//!   by any legacy links kept on the record.

use crate::model::project::{LinkKind, Project, ProjectId};
use crate::model::status::{status_icon, StatusDisplay, Tint};
use crate::view::text::{description_preview, resolve_link, resolve_link_as};
use serde::Serialize;

/// One row in the searchable project list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListItem {
    pub id: ProjectId,
    pub title: String,
    /// Secondary text: favorite link, else first link, else description preview.
    pub subtitle: Option<String>,
    pub icon: StatusDisplay,
    pub keywords: Vec<String>,
}

impl ProjectListItem {
    pub fn from_project(project: &Project) -> Self {
        let subtitle = project
            .favorite_link()
            .or_else(|| project.links.iter().next())
            .map(|(_, value)| value.to_string())
            .or_else(|| project.description.as_deref().and_then(description_preview));

        Self {
            id: project.id,
            title: project.title.clone(),
            subtitle,
            icon: status_icon(project.status.as_deref().unwrap_or_default()),
            keywords: project.keywords().into_iter().map(str::to_string).collect(),
        }
    }
}

/// Structured entry in the detail pane's metadata column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataEntry {
    /// Colored status tag.
    Tag {
        title: String,
        text: String,
        color: Option<Tint>,
    },
    /// Clickable link with a resolved target.
    Link {
        title: String,
        text: String,
        target: String,
    },
    /// Plain label, used for absent links.
    Label { title: String, text: String },
    Separator,
}

/// Detail pane content for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    pub id: ProjectId,
    /// Markdown body; empty when the project has no description.
    pub markdown: String,
    pub metadata: Vec<MetadataEntry>,
}

impl ProjectDetail {
    pub fn from_project(project: &Project) -> Self {
        let status_text = project.status.clone().unwrap_or_default();
        let mut metadata = vec![
            MetadataEntry::Tag {
                title: "Status".to_string(),
                color: tag_tint(&status_text),
                text: status_text,
            },
            MetadataEntry::Separator,
        ];

        for kind in LinkKind::ALL {
            let entry = match project.link(kind).and_then(|value| {
                resolve_link_as(kind, value).map(|target| (value.to_string(), target))
            }) {
                Some((text, target)) => MetadataEntry::Link {
                    title: kind.label().to_string(),
                    text,
                    target,
                },
                None => MetadataEntry::Label {
                    title: kind.label().to_string(),
                    text: format!("No {} link", kind.field_name()),
                },
            };
            metadata.push(entry);
        }
        for (name, value) in &project.legacy_links {
            if let Some(target) = resolve_link(value) {
                metadata.push(MetadataEntry::Link {
                    title: name.clone(),
                    text: value.clone(),
                    target,
                });
            }
        }

        Self {
            id: project.id,
            markdown: project.description.clone().unwrap_or_default(),
            metadata,
        }
    }
}

/// Status tag tint. Older records say `Ongoing`, which the tag still
/// colours like `In Progress`; the list icon does not.
fn tag_tint(status: &str) -> Option<Tint> {
    match status.trim() {
        "Ongoing" => Some(Tint::Yellow),
        other => status_icon(other).color,
    }
}

/// Resolved quick-open target for `kind`, if the project carries that link.
pub fn open_target(project: &Project, kind: LinkKind) -> Option<String> {
    project
        .link(kind)
        .and_then(|value| resolve_link_as(kind, value))
}
