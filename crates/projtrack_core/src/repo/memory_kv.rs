//! In-memory key/value repository.
//!
//! Used by tests and by hosts that keep state only for the process lifetime.

use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Mutex-guarded map implementing `KvRepository`.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Returns sorted keys currently stored.
    pub fn keys(&self) -> RepoResult<Vec<String>> {
        let entries = self.entries.lock().map_err(|_| RepoError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

impl KvRepository for MemoryKvRepository {
    fn get_item(&self, key: &str) -> RepoResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| RepoError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> RepoResult<()> {
        let mut entries = self.entries.lock().map_err(|_| RepoError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> RepoResult<()> {
        let mut entries = self.entries.lock().map_err(|_| RepoError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
