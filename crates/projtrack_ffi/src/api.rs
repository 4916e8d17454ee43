//! FFI use-case API for the host launcher UI.
//!
//! # Responsibility
//! - Expose list/detail/form/mutation entry points the host renders.
//! - Own the process-wide project store and its single writer lock.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation is persisted before the function returns.
//! - Projects are addressed by stable id strings, never by row index.

use log::warn;
use projtrack_core::{
    core_version as core_version_inner, filter_projects, init_logging as init_logging_inner,
    open_target, ping as ping_inner, status_icon as status_icon_inner, LinkKind, LoadOutcome,
    MetadataEntry, Project, ProjectDetail, ProjectId, ProjectInput, ProjectListItem,
    ProjectStatus, ProjectStore, SqliteKvRepository, StatusDisplay, StoreConfig, StoreError,
    StoreResult,
};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

const ENTRY_DB_FILE_NAME: &str = "projtrack_entry.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static ENTRY_STORE: Mutex<Option<EntryStore>> = Mutex::new(None);

struct EntryStore {
    store: ProjectStore<SqliteKvRepository>,
    /// Recovery notice shown by the list until the user saves something.
    load_warning: Option<String>,
}

impl EntryStore {
    fn create(&mut self, project: Project) -> StoreResult<ProjectId> {
        let id = self.store.create(project)?;
        self.load_warning = None;
        Ok(id)
    }

    fn edit(&mut self, id: ProjectId, values: ProjectInput) -> StoreResult<()> {
        let base = self.store.get_by_id(id).ok_or(StoreError::NotFound(id))?;
        let replacement = values.into_edit_of(base);
        self.store.edit_by_id(id, replacement)?;
        self.load_warning = None;
        Ok(())
    }

    fn delete(&mut self, id: ProjectId) -> StoreResult<Project> {
        let removed = self.store.delete_by_id(id)?;
        self.load_warning = None;
        Ok(removed)
    }

    fn list_message(&self, matched: usize) -> String {
        match (&self.load_warning, matched) {
            (Some(warning), _) => warning.clone(),
            (None, 0) => "No projects.".to_string(),
            (None, count) => format!("Found {count} project(s)."),
        }
    }
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Icon and tint names for one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    /// Stored label; empty for the default glyph.
    pub label: String,
    pub icon: String,
    pub tint: Option<String>,
}

/// One list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub project_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub icon: String,
    pub tint: Option<String>,
    pub keywords: Vec<String>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListResponse {
    /// Rows matching the query, in stored order.
    pub items: Vec<ProjectRow>,
    /// Total stored projects before filtering.
    pub total: u32,
    /// Human-readable message; carries the recovery warning after a corrupt load.
    pub message: String,
}

/// One detail metadata row. `kind` is `tag|link|label|separator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub kind: String,
    pub title: String,
    pub text: String,
    pub target: Option<String>,
    pub tint: Option<String>,
}

/// Detail pane content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetailView {
    pub project_id: String,
    pub markdown: String,
    pub metadata: Vec<MetadataRow>,
}

/// Form values, one string per field. Blank means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFormValues {
    pub title: String,
    pub status: String,
    pub description: String,
    pub website: String,
    pub repository: String,
    pub roadmap: String,
    pub design: String,
    pub backend: String,
    pub extra: String,
    pub favorite: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectActionResponse {
    pub ok: bool,
    pub project_id: Option<String>,
    pub message: String,
}

impl ProjectActionResponse {
    fn success(message: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            ok: true,
            project_id: Some(project_id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            project_id: None,
            message: message.into(),
        }
    }
}

/// Lists projects matching the search bar text.
#[flutter_rust_bridge::frb(sync)]
pub fn project_list(query: String) -> ProjectListResponse {
    let result = with_entry_store(|entry| {
        let items = filter_projects(entry.store.projects(), &query)
            .into_iter()
            .map(|project| to_project_row(ProjectListItem::from_project(project)))
            .collect::<Vec<_>>();
        let message = entry.list_message(items.len());
        Ok(ProjectListResponse {
            total: u32::try_from(entry.store.len()).unwrap_or(u32::MAX),
            items,
            message,
        })
    });

    result.unwrap_or_else(|err| ProjectListResponse {
        items: Vec::new(),
        total: 0,
        message: format!("project_list failed: {err}"),
    })
}

/// Returns the detail pane for one project, or `None` for unknown ids.
#[flutter_rust_bridge::frb(sync)]
pub fn project_detail(project_id: String) -> Option<ProjectDetailView> {
    let id = parse_project_id(&project_id).ok()?;
    with_entry_store(|entry| {
        Ok(entry
            .store
            .get_by_id(id)
            .map(|project| to_detail_view(ProjectDetail::from_project(project))))
    })
    .ok()
    .flatten()
}

/// Returns form values: create defaults when `project_id` is `None`,
/// pre-filled edit values otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn project_form(project_id: Option<String>) -> Option<ProjectFormValues> {
    let Some(raw_id) = project_id else {
        return Some(to_form_values(ProjectInput::for_create()));
    };
    let id = parse_project_id(&raw_id).ok()?;
    with_entry_store(|entry| {
        Ok(entry
            .store
            .get_by_id(id)
            .map(|project| to_form_values(ProjectInput::from_project(project))))
    })
    .ok()
    .flatten()
}

/// Appends a project built from form values.
#[flutter_rust_bridge::frb(sync)]
pub fn project_create(values: ProjectFormValues) -> ProjectActionResponse {
    let project = from_form_values(values).into_project();
    match with_entry_store(|entry| entry.create(project).map_err(|err| err.to_string())) {
        Ok(id) => ProjectActionResponse::success("Project created.", id),
        Err(err) => ProjectActionResponse::failure(format!("project_create failed: {err}")),
    }
}

/// Replaces one project in full with form values.
#[flutter_rust_bridge::frb(sync)]
pub fn project_edit(project_id: String, values: ProjectFormValues) -> ProjectActionResponse {
    let id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(err) => return ProjectActionResponse::failure(format!("project_edit failed: {err}")),
    };
    let input = from_form_values(values);
    match with_entry_store(|entry| entry.edit(id, input).map_err(|err| err.to_string())) {
        Ok(()) => ProjectActionResponse::success("Project updated.", id),
        Err(err) => ProjectActionResponse::failure(format!("project_edit failed: {err}")),
    }
}

/// Deletes one project.
#[flutter_rust_bridge::frb(sync)]
pub fn project_delete(project_id: String) -> ProjectActionResponse {
    let id = match parse_project_id(&project_id) {
        Ok(id) => id,
        Err(err) => {
            return ProjectActionResponse::failure(format!("project_delete failed: {err}"))
        }
    };
    match with_entry_store(|entry| entry.delete(id).map_err(|err| err.to_string())) {
        Ok(_) => ProjectActionResponse::success("Project deleted.", id),
        Err(err) => ProjectActionResponse::failure(format!("project_delete failed: {err}")),
    }
}

/// Resolves the URL behind an open action.
///
/// `link_kind` names a link field; `None` opens the project's favorite link.
#[flutter_rust_bridge::frb(sync)]
pub fn project_open_target(project_id: String, link_kind: Option<String>) -> Option<String> {
    let id = parse_project_id(&project_id).ok()?;
    with_entry_store(|entry| {
        let Some(project) = entry.store.get_by_id(id) else {
            return Ok(None);
        };
        let kind = match link_kind.as_deref() {
            Some(raw) => LinkKind::parse(raw),
            None => project.favorite,
        };
        Ok(kind.and_then(|kind| open_target(project, kind)))
    })
    .ok()
    .flatten()
}

/// Status choices for the form dropdown, in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn status_options() -> Vec<StatusOption> {
    ProjectStatus::ALL
        .into_iter()
        .map(|status| to_status_option(status.label(), status.display()))
        .collect()
}

/// Maps any status label to icon/tint names. Never fails.
#[flutter_rust_bridge::frb(sync)]
pub fn status_icon(label: String) -> StatusOption {
    let display = status_icon_inner(&label);
    let label = match ProjectStatus::from_label(&label) {
        Some(status) => status.label(),
        None => "",
    };
    to_status_option(label, display)
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PROJTRACK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn with_entry_store<T>(f: impl FnOnce(&mut EntryStore) -> Result<T, String>) -> Result<T, String> {
    let mut guard = ENTRY_STORE
        .lock()
        .map_err(|_| "project store lock poisoned".to_string())?;

    if guard.is_none() {
        *guard = Some(open_entry_store()?);
    }

    match guard.as_mut() {
        Some(entry) => f(entry),
        None => Err("project store unavailable".to_string()),
    }
}

fn open_entry_store() -> Result<EntryStore, String> {
    let db_path = resolve_entry_db_path();
    let repo = SqliteKvRepository::open(&db_path)
        .map_err(|err| format!("project store open failed: {err}"))?;
    let (store, outcome) = ProjectStore::open(repo, StoreConfig::default())
        .map_err(|err| format!("project store load failed: {err}"))?;

    let load_warning = match outcome {
        LoadOutcome::Recovered { error, backup_key } => {
            warn!("event=entry_store_open module=ffi status=degraded backup_key={backup_key}");
            Some(format!(
                "Saved projects could not be read and were reset ({error}); the previous data was kept under `{backup_key}`."
            ))
        }
        LoadOutcome::Empty | LoadOutcome::Loaded { .. } => None,
    };

    Ok(EntryStore {
        store,
        load_warning,
    })
}

fn parse_project_id(raw: &str) -> Result<ProjectId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid project id `{}`", raw.trim()))
}

fn to_status_option(label: &str, display: StatusDisplay) -> StatusOption {
    StatusOption {
        label: label.to_string(),
        icon: display.icon.name().to_string(),
        tint: display.color.map(|tint| tint.name().to_string()),
    }
}

fn to_project_row(item: ProjectListItem) -> ProjectRow {
    ProjectRow {
        project_id: item.id.to_string(),
        title: item.title,
        subtitle: item.subtitle,
        icon: item.icon.icon.name().to_string(),
        tint: item.icon.color.map(|tint| tint.name().to_string()),
        keywords: item.keywords,
    }
}

fn to_detail_view(detail: ProjectDetail) -> ProjectDetailView {
    let metadata = detail
        .metadata
        .into_iter()
        .map(|entry| match entry {
            MetadataEntry::Tag { title, text, color } => MetadataRow {
                kind: "tag".to_string(),
                title,
                text,
                target: None,
                tint: color.map(|tint| tint.name().to_string()),
            },
            MetadataEntry::Link {
                title,
                text,
                target,
            } => MetadataRow {
                kind: "link".to_string(),
                title,
                text,
                target: Some(target),
                tint: None,
            },
            MetadataEntry::Label { title, text } => MetadataRow {
                kind: "label".to_string(),
                title,
                text,
                target: None,
                tint: None,
            },
            MetadataEntry::Separator => MetadataRow {
                kind: "separator".to_string(),
                title: String::new(),
                text: String::new(),
                target: None,
                tint: None,
            },
        })
        .collect();

    ProjectDetailView {
        project_id: detail.id.to_string(),
        markdown: detail.markdown,
        metadata,
    }
}

fn to_form_values(input: ProjectInput) -> ProjectFormValues {
    ProjectFormValues {
        title: input.title,
        status: input.status,
        description: input.description,
        website: input.website,
        repository: input.repository,
        roadmap: input.roadmap,
        design: input.design,
        backend: input.backend,
        extra: input.extra,
        favorite: input.favorite,
    }
}

fn from_form_values(values: ProjectFormValues) -> ProjectInput {
    ProjectInput {
        title: values.title,
        status: values.status,
        description: values.description,
        website: values.website,
        repository: values.repository,
        roadmap: values.roadmap,
        design: values.design,
        backend: values.backend,
        extra: values.extra,
        favorite: values.favorite,
    }
}
