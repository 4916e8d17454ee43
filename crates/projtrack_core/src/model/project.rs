//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical project record shared by store, views and FFI.
//! - Map every historical link field name onto one enumerated `LinkKind`.
//!
//! # Invariants
//! - `id` is stable for the record lifetime and never reused.
//! - Link values are opaque strings; no URL validation happens here.
//! - Decoding tolerates missing optional fields and legacy field names.
//! - A legacy value that loses to another value for the same slot is kept
//!   under its original field name and written back on encode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

use super::status::ProjectStatus;

/// Stable identifier for one project record.
pub type ProjectId = Uuid;

/// Enumerated external link slots a project can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Public or storefront website.
    Website,
    /// Source repository (GitHub, GitLab, Bitbucket...).
    Repository,
    /// Roadmap or kanban board.
    Roadmap,
    /// Design tool document.
    Design,
    /// Backend or admin console. Bare store handles open in the Shopify admin.
    Backend,
    /// Free slot for anything else.
    Extra,
}

impl LinkKind {
    /// All link kinds in form/detail display order.
    pub const ALL: [LinkKind; 6] = [
        LinkKind::Website,
        LinkKind::Repository,
        LinkKind::Roadmap,
        LinkKind::Design,
        LinkKind::Backend,
        LinkKind::Extra,
    ];

    /// Human-readable label used by form fields and detail metadata.
    pub fn label(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Repository => "Repository",
            Self::Roadmap => "Roadmap",
            Self::Design => "Design",
            Self::Backend => "Backend",
            Self::Extra => "Extra",
        }
    }

    /// Canonical wire field name.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Repository => "repository",
            Self::Roadmap => "roadmap",
            Self::Design => "design",
            Self::Backend => "backend",
            Self::Extra => "extra",
        }
    }

    /// Parses a canonical or legacy field name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "website" => Some(Self::Website),
            "repository" | "repo" | "github" => Some(Self::Repository),
            "roadmap" | "kanban" => Some(Self::Roadmap),
            "design" => Some(Self::Design),
            "backend" | "url" | "admin" => Some(Self::Backend),
            "extra" => Some(Self::Extra),
            _ => None,
        }
    }
}

impl Display for LinkKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Optional link values, one slot per `LinkKind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl ProjectLinks {
    /// Returns the raw value stored for `kind`.
    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        self.slot(kind).as_deref()
    }

    /// Replaces the value stored for `kind`.
    pub fn set(&mut self, kind: LinkKind, value: Option<String>) {
        *self.slot_mut(kind) = value;
    }

    /// Iterates present links in `LinkKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkKind, &str)> + '_ {
        LinkKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|value| (kind, value)))
    }

    fn slot(&self, kind: LinkKind) -> &Option<String> {
        match kind {
            LinkKind::Website => &self.website,
            LinkKind::Repository => &self.repository,
            LinkKind::Roadmap => &self.roadmap,
            LinkKind::Design => &self.design,
            LinkKind::Backend => &self.backend,
            LinkKind::Extra => &self.extra,
        }
    }

    fn slot_mut(&mut self, kind: LinkKind) -> &mut Option<String> {
        match kind {
            LinkKind::Website => &mut self.website,
            LinkKind::Repository => &mut self.repository,
            LinkKind::Roadmap => &mut self.roadmap,
            LinkKind::Design => &mut self.design,
            LinkKind::Backend => &mut self.backend,
            LinkKind::Extra => &mut self.extra,
        }
    }
}

/// Policy applied to project titles on write paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePolicy {
    /// Accept any title, including empty or whitespace-only ones.
    #[default]
    AllowBlank,
    /// Reject titles that are empty after trimming.
    RejectBlank,
}

/// Validation errors for project write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    BlankTitle,
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "project title must not be blank"),
        }
    }
}

impl Error for ProjectValidationError {}

/// Canonical project record.
///
/// Serialized flat: link slots sit next to `title` so older blobs keep
/// decoding. Absent optional fields are omitted on encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredProject")]
pub struct Project {
    pub id: ProjectId,
    /// Display name and primary search key.
    pub title: String,
    /// Status label; unknown labels are preserved verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Markdown body shown in the detail pane.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub links: ProjectLinks,
    /// Link opened by the quick-open action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<LinkKind>,
    /// Legacy link values that lost their slot on decode, keyed by their
    /// original field name.
    #[serde(flatten)]
    pub legacy_links: BTreeMap<String, String>,
}

impl Project {
    /// Creates a project with a generated stable ID and no optional fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates a project with a caller-provided ID.
    pub fn with_id(id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: None,
            description: None,
            links: ProjectLinks::default(),
            favorite: None,
            legacy_links: BTreeMap::new(),
        }
    }

    /// Builder-style status setter.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Builder-style link setter.
    pub fn with_link(mut self, kind: LinkKind, value: impl Into<String>) -> Self {
        self.links.set(kind, Some(value.into()));
        self
    }

    pub fn link(&self, kind: LinkKind) -> Option<&str> {
        self.links.get(kind)
    }

    /// Parsed status, `None` for absent or unrecognized labels.
    pub fn status_kind(&self) -> Option<ProjectStatus> {
        self.status.as_deref().and_then(ProjectStatus::from_label)
    }

    /// Search keywords: title, plus status label when set.
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords = vec![self.title.as_str()];
        if let Some(status) = self.status.as_deref() {
            keywords.push(status);
        }
        keywords
    }

    /// Quick-open target: the favorite link when it holds a value.
    pub fn favorite_link(&self) -> Option<(LinkKind, &str)> {
        let kind = self.favorite?;
        self.link(kind).map(|value| (kind, value))
    }

    /// Validates write-path invariants under the given title policy.
    pub fn validate(&self, policy: TitlePolicy) -> Result<(), ProjectValidationError> {
        if policy == TitlePolicy::RejectBlank && self.title.trim().is_empty() {
            return Err(ProjectValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Decoding shape that accepts every historical field name.
#[derive(Deserialize)]
struct StoredProject {
    #[serde(default)]
    id: Option<ProjectId>,
    title: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default)]
    repo: Option<String>,
    #[serde(default)]
    github: Option<String>,
    #[serde(default)]
    roadmap: Option<String>,
    #[serde(default)]
    kanban: Option<String>,
    #[serde(default)]
    design: Option<String>,
    #[serde(default)]
    backend: Option<String>,
    #[serde(default)]
    extra: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    favorite: Option<String>,
}

impl From<StoredProject> for Project {
    fn from(value: StoredProject) -> Self {
        let mut legacy_links = BTreeMap::new();
        let links = ProjectLinks {
            website: value.website,
            repository: merge_slot(
                value.repository,
                [("repo", value.repo), ("github", value.github)],
                &mut legacy_links,
            ),
            roadmap: merge_slot(value.roadmap, [("kanban", value.kanban)], &mut legacy_links),
            design: value.design,
            backend: merge_slot(value.backend, [("url", value.url)], &mut legacy_links),
            extra: value.extra,
        };

        Self {
            id: value.id.unwrap_or_else(Uuid::new_v4),
            title: value.title,
            status: value.status,
            description: value.description,
            links,
            favorite: value.favorite.as_deref().and_then(LinkKind::parse),
            legacy_links,
        }
    }
}

/// Fills one link slot from its canonical field, then from legacy aliases in
/// order. Aliases that lose keep their value in `spill` unless it repeats
/// the slot value.
fn merge_slot<const N: usize>(
    canonical: Option<String>,
    aliases: [(&'static str, Option<String>); N],
    spill: &mut BTreeMap<String, String>,
) -> Option<String> {
    let mut slot = canonical;
    for (name, value) in aliases {
        let Some(value) = value else {
            continue;
        };
        match slot.as_deref() {
            None => slot = Some(value),
            Some(current) if current == value => {}
            Some(_) => {
                spill.insert(name.to_string(), value);
            }
        }
    }
    slot
}
