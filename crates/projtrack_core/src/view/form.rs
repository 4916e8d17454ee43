//! Create/edit form submission shape.
//!
//! Forms submit every field as a string. Blank strings mean "absent", so an
//! emptied field clears the stored value on edit.

use crate::model::project::{LinkKind, Project};
use crate::model::status::ProjectStatus;
use serde::{Deserialize, Serialize};

/// Raw form values for one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub status: String,
    pub description: String,
    pub website: String,
    pub repository: String,
    pub roadmap: String,
    pub design: String,
    pub backend: String,
    pub extra: String,
    /// Field name of the quick-open link (`website`, `repository`, ...).
    pub favorite: String,
}

impl ProjectInput {
    /// Empty create form with the default status preselected.
    pub fn for_create() -> Self {
        Self {
            status: ProjectStatus::ALL[0].label().to_string(),
            ..Self::default()
        }
    }

    /// Edit form pre-filled from an existing project.
    pub fn from_project(project: &Project) -> Self {
        let link = |kind| project.link(kind).unwrap_or_default().to_string();
        Self {
            title: project.title.clone(),
            status: project.status.clone().unwrap_or_default(),
            description: project.description.clone().unwrap_or_default(),
            website: link(LinkKind::Website),
            repository: link(LinkKind::Repository),
            roadmap: link(LinkKind::Roadmap),
            design: link(LinkKind::Design),
            backend: link(LinkKind::Backend),
            extra: link(LinkKind::Extra),
            favorite: project
                .favorite
                .map(|kind| kind.field_name().to_string())
                .unwrap_or_default(),
        }
    }

    /// Builds a new record with a fresh id. The title is kept verbatim.
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.title);
        project.status = non_blank(self.status);
        project.description = non_blank(self.description);
        project.links.website = non_blank(self.website);
        project.links.repository = non_blank(self.repository);
        project.links.roadmap = non_blank(self.roadmap);
        project.links.design = non_blank(self.design);
        project.links.backend = non_blank(self.backend);
        project.links.extra = non_blank(self.extra);
        project.favorite = LinkKind::parse(&self.favorite);
        project
    }

    /// Builds the replacement for `base` in an edit. The form fields win;
    /// `base`'s id and legacy links, which the form does not show, carry over.
    pub fn into_edit_of(self, base: &Project) -> Project {
        let mut project = self.into_project();
        project.id = base.id;
        project.legacy_links = base.legacy_links.clone();
        project
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
