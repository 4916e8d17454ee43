//! Core domain logic for projtrack.
//! This crate is the single source of truth for project store invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::project::{
    LinkKind, Project, ProjectId, ProjectLinks, ProjectValidationError, TitlePolicy,
};
pub use model::status::{status_icon, Icon, ProjectStatus, StatusDisplay, Tint};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use repo::memory_kv::MemoryKvRepository;
pub use search::keyword::{filter_projects, matches_query};
pub use service::codec::{decode_projects, encode_projects};
pub use service::project_store::{
    LoadOutcome, ProjectStore, StoreConfig, StoreError, StoreResult, DEFAULT_STORAGE_KEY,
};
pub use view::form::ProjectInput;
pub use view::item::{open_target, MetadataEntry, ProjectDetail, ProjectListItem};
pub use view::text::{description_preview, resolve_link, resolve_link_as};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
