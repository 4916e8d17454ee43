//! Project store use-case service.
//!
//! # Responsibility
//! - Own the ordered project collection and its stable-id index.
//! - Mirror the whole collection to one key/value entry after every mutation.
//!
//! # Invariants
//! - `order` and `records` always hold the same id set.
//! - Order is insertion order; there is no sort step.
//! - A mutation whose persist step fails is rolled back, so memory never
//!   runs ahead of storage.
//! - Mutations take `&mut self`; writes to the entry are serialized by the
//!   single owner (hosts share the store behind a `Mutex`).

use crate::model::project::{Project, ProjectId, ProjectValidationError, TitlePolicy};
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::service::codec::{decode_projects, encode_projects};
use log::{error, info, warn};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Storage key used by the host integration.
pub const DEFAULT_STORAGE_KEY: &str = "projects";
const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for project store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Positional edit/delete against an index outside `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// Id-keyed edit/delete against an unknown id.
    NotFound(ProjectId),
    /// Persisted blob cannot be decoded.
    CorruptState(String),
    /// Record rejected by the active title policy.
    Validation(ProjectValidationError),
    /// Key/value layer failure.
    Storage(RepoError),
    /// Collection cannot be encoded.
    Encode(serde_json::Error),
    /// Internal order/record index mismatch.
    InconsistentState(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "project index {index} out of range for {len} project(s)")
            }
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::CorruptState(message) => write!(f, "persisted projects are corrupt: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode projects: {err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProjectValidationError> for StoreError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key of the single persisted entry.
    pub storage_key: String,
    /// Title rule applied on create/edit.
    pub title_policy: TitlePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            title_policy: TitlePolicy::default(),
        }
    }
}

/// Result of reading the persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Entry absent; store starts empty.
    Empty,
    /// Entry decoded into `count` projects.
    Loaded { count: usize },
    /// Entry undecodable; store reset to empty and the raw blob copied to
    /// `backup_key`. `error` is meant to be surfaced to the user.
    Recovered { error: String, backup_key: String },
}

/// Ordered project collection mirrored to a key/value repository.
pub struct ProjectStore<R: KvRepository> {
    repo: R,
    config: StoreConfig,
    order: Vec<ProjectId>,
    records: HashMap<ProjectId, Project>,
}

impl<R: KvRepository> ProjectStore<R> {
    /// Creates an empty store with default configuration. Does not load.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, StoreConfig::default())
    }

    /// Creates an empty store with explicit configuration. Does not load.
    pub fn with_config(repo: R, config: StoreConfig) -> Self {
        Self {
            repo,
            config,
            order: Vec::new(),
            records: HashMap::new(),
        }
    }

    /// Creates a store and loads the persisted entry.
    pub fn open(repo: R, config: StoreConfig) -> Result<(Self, LoadOutcome), StoreError> {
        let mut store = Self::with_config(repo, config);
        let outcome = store.load()?;
        Ok((store, outcome))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates projects in display order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> + '_ {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Owned copy of the current sequence.
    pub fn snapshot(&self) -> Vec<Project> {
        self.projects().cloned().collect()
    }

    pub fn get(&self, index: usize) -> Option<&Project> {
        self.order.get(index).and_then(|id| self.records.get(id))
    }

    pub fn get_by_id(&self, id: ProjectId) -> Option<&Project> {
        self.records.get(&id)
    }

    /// Current position of `id` in display order.
    pub fn index_of(&self, id: ProjectId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    /// Reads the persisted entry, recovering from an undecodable blob.
    ///
    /// Replaces the in-memory sequence in every case. On corruption the raw
    /// blob is copied to a backup key before the store resets, so the next
    /// persist cannot destroy the only copy. Backups are never overwritten:
    /// the first is `<storage_key>.corrupt`, later ones `<storage_key>.corrupt.2`,
    /// `.3` and so on. A blob already backed up reuses its key.
    pub fn load(&mut self) -> StoreResult<LoadOutcome> {
        let blob = match self.repo.get_item(&self.config.storage_key)? {
            Some(blob) => blob,
            None => {
                self.clear_memory();
                info!("event=store_load module=store status=ok outcome=empty");
                return Ok(LoadOutcome::Empty);
            }
        };

        match self.replace_from_blob(&blob) {
            Ok(count) => {
                info!("event=store_load module=store status=ok outcome=loaded count={count}");
                Ok(LoadOutcome::Loaded { count })
            }
            Err(StoreError::CorruptState(message)) => {
                let backup_key = self.back_up_corrupt_blob(&blob)?;
                self.clear_memory();
                warn!(
                    "event=store_load module=store status=degraded outcome=recovered bytes={} backup_key={} error={}",
                    blob.len(),
                    backup_key,
                    message
                );
                Ok(LoadOutcome::Recovered {
                    error: message,
                    backup_key,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Reads the persisted entry without recovery.
    ///
    /// Returns `CorruptState` and leaves memory untouched when the blob is
    /// undecodable. Returns the loaded count otherwise (0 when absent).
    pub fn try_load(&mut self) -> StoreResult<usize> {
        match self.repo.get_item(&self.config.storage_key)? {
            Some(blob) => self.replace_from_blob(&blob),
            None => {
                self.clear_memory();
                Ok(0)
            }
        }
    }

    /// Appends `project` and persists. Returns the id it is stored under.
    ///
    /// An id already present in the store is replaced by a fresh one.
    pub fn create(&mut self, mut project: Project) -> StoreResult<ProjectId> {
        project.validate(self.config.title_policy)?;
        if self.records.contains_key(&project.id) {
            project.id = Uuid::new_v4();
        }

        let id = project.id;
        self.order.push(id);
        self.records.insert(id, project);

        if let Err(err) = self.persist() {
            self.order.pop();
            self.records.remove(&id);
            log_mutation_failure("project_create", &err);
            return Err(err);
        }

        info!(
            "event=project_create module=store status=ok index={} count={}",
            self.order.len() - 1,
            self.order.len()
        );
        Ok(id)
    }

    /// Replaces the project at `index` in full and persists.
    ///
    /// The replacement keeps the id of the slot it lands in.
    pub fn edit(&mut self, index: usize, project: Project) -> StoreResult<()> {
        let id = self.id_at(index)?;
        self.replace(index, id, project, "project_edit")
    }

    /// Replaces the project with stable id `id` in full and persists.
    pub fn edit_by_id(&mut self, id: ProjectId, project: Project) -> StoreResult<()> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        self.replace(index, id, project, "project_edit")
    }

    /// Removes the project at `index`, shifting later ones left, and persists.
    pub fn delete(&mut self, index: usize) -> StoreResult<Project> {
        self.id_at(index)?;
        self.remove_at(index)
    }

    /// Removes the project with stable id `id` and persists.
    pub fn delete_by_id(&mut self, id: ProjectId) -> StoreResult<Project> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        self.remove_at(index)
    }

    /// Encodes the whole sequence and overwrites the persisted entry.
    pub fn persist(&self) -> StoreResult<()> {
        let started_at = Instant::now();
        let blob = encode_projects(self.projects()).map_err(StoreError::Encode)?;
        self.repo.set_item(&self.config.storage_key, &blob)?;
        info!(
            "event=store_persist module=store status=ok count={} bytes={} duration_ms={}",
            self.order.len(),
            blob.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn back_up_corrupt_blob(&self, blob: &str) -> StoreResult<String> {
        let base = format!("{}{CORRUPT_BACKUP_SUFFIX}", self.config.storage_key);
        let mut attempt = 1_usize;
        loop {
            let key = if attempt == 1 {
                base.clone()
            } else {
                format!("{base}.{attempt}")
            };
            match self.repo.get_item(&key)? {
                None => {
                    self.repo.set_item(&key, blob)?;
                    return Ok(key);
                }
                Some(existing) if existing == blob => return Ok(key),
                Some(_) => attempt += 1,
            }
        }
    }

    fn id_at(&self, index: usize) -> StoreResult<ProjectId> {
        self.order
            .get(index)
            .copied()
            .ok_or(StoreError::IndexOutOfRange {
                index,
                len: self.order.len(),
            })
    }

    fn replace(
        &mut self,
        index: usize,
        id: ProjectId,
        mut project: Project,
        event: &'static str,
    ) -> StoreResult<()> {
        project.validate(self.config.title_policy)?;
        project.id = id;

        let previous = self
            .records
            .insert(id, project)
            .ok_or(StoreError::InconsistentState("ordered id without record"))?;

        if let Err(err) = self.persist() {
            self.records.insert(id, previous);
            log_mutation_failure(event, &err);
            return Err(err);
        }

        info!("event={event} module=store status=ok index={index}");
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> StoreResult<Project> {
        let id = self.order.remove(index);
        let removed = match self.records.remove(&id) {
            Some(project) => project,
            None => {
                self.order.insert(index, id);
                return Err(StoreError::InconsistentState("ordered id without record"));
            }
        };

        if let Err(err) = self.persist() {
            self.order.insert(index, id);
            self.records.insert(id, removed);
            log_mutation_failure("project_delete", &err);
            return Err(err);
        }

        info!(
            "event=project_delete module=store status=ok index={index} count={}",
            self.order.len()
        );
        Ok(removed)
    }

    fn replace_from_blob(&mut self, blob: &str) -> StoreResult<usize> {
        let projects =
            decode_projects(blob).map_err(|err| StoreError::CorruptState(err.to_string()))?;

        self.clear_memory();
        let mut seen = HashSet::with_capacity(projects.len());
        for mut project in projects {
            // Hand-edited blobs may repeat ids; identity must stay unique.
            if !seen.insert(project.id) {
                project.id = Uuid::new_v4();
                seen.insert(project.id);
            }
            self.order.push(project.id);
            self.records.insert(project.id, project);
        }
        Ok(self.order.len())
    }

    fn clear_memory(&mut self) {
        self.order.clear();
        self.records.clear();
    }
}

fn log_mutation_failure(event: &str, err: &StoreError) {
    error!("event={event} module=store status=error error_code=persist_failed error={err}");
}
