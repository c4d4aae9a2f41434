//! UUID Mapping Store
//!
//! Maps a filesystem entry, identified by (repo_id, parent_dir, name, is_dir),
//! to a durable UUID assigned exactly once per key. Smart links are anchored
//! to these UUIDs so they survive renames and moves.

pub mod memory;
pub mod persistence;

pub use memory::MemoryUuidMapStore;
pub use persistence::SledUuidMapStore;

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lookup key identifying one directory entry within a repository.
///
/// Two keys are equal iff all four fields are equal after normalization;
/// the constructor enforces the normalization invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirentKey {
    pub repo_id: String,
    /// Normalized absolute path of the parent directory: starts with `/`,
    /// never ends with `/` except for the root `/` itself.
    pub parent_dir: String,
    /// Entry basename, non-empty, no path separators.
    pub name: String,
    pub is_dir: bool,
}

impl DirentKey {
    /// Build a key, validating the invariants the store relies on.
    pub fn new(
        repo_id: impl Into<String>,
        parent_dir: impl Into<String>,
        name: impl Into<String>,
        is_dir: bool,
    ) -> Result<Self, StoreError> {
        let key = Self {
            repo_id: repo_id.into(),
            parent_dir: parent_dir.into(),
            name: name.into(),
            is_dir,
        };
        key.validate()?;
        Ok(key)
    }

    /// Check the key invariants. Store implementations call this before any
    /// mutation, since the fields are public.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.repo_id.is_empty() {
            return Err(StoreError::InvalidKey("repo_id is empty".to_string()));
        }
        if self.name.is_empty() {
            return Err(StoreError::InvalidKey("entry name is empty".to_string()));
        }
        if self.name.contains('/') {
            return Err(StoreError::InvalidKey(format!(
                "entry name '{}' contains a path separator",
                self.name
            )));
        }
        if !self.parent_dir.starts_with('/') {
            return Err(StoreError::InvalidKey(format!(
                "parent_dir '{}' is not absolute",
                self.parent_dir
            )));
        }
        if self.parent_dir != "/" && self.parent_dir.ends_with('/') {
            return Err(StoreError::InvalidKey(format!(
                "parent_dir '{}' has a trailing slash",
                self.parent_dir
            )));
        }
        if self.parent_dir.contains("//") {
            return Err(StoreError::InvalidKey(format!(
                "parent_dir '{}' has duplicate slashes",
                self.parent_dir
            )));
        }
        Ok(())
    }

    /// Deterministic byte encoding used as the persistent lookup key.
    pub(crate) fn encode(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }
}

/// A durable UUID assignment for one directory entry.
///
/// The uuid is immutable once assigned and never reused for another key,
/// even after the entry is renamed away or the mapping row removed by the
/// backend's entry-removal workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirentUuidMapping {
    pub uuid: Uuid,
    pub repo_id: String,
    pub parent_dir: String,
    pub name: String,
    pub is_dir: bool,
    pub created_at: DateTime<Utc>,
}

impl DirentUuidMapping {
    pub(crate) fn assign(key: &DirentKey) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            repo_id: key.repo_id.clone(),
            parent_dir: key.parent_dir.clone(),
            name: key.name.clone(),
            is_dir: key.is_dir,
            created_at: Utc::now(),
        }
    }

    /// The key this mapping is currently filed under.
    pub fn key(&self) -> Result<DirentKey, StoreError> {
        DirentKey::new(
            self.repo_id.clone(),
            self.parent_dir.clone(),
            self.name.clone(),
            self.is_dir,
        )
    }
}

/// UUID Mapping Store interface.
///
/// `get_or_create` is the single mutation primitive for first-time
/// assignment: concurrent callers for the same key, including callers in
/// separate processes, converge on one persisted mapping. `update_path`
/// supports the external rename workflow and preserves the uuid.
pub trait UuidMapStore: Send + Sync {
    /// Look up an existing mapping. No side effects.
    fn get(&self, key: &DirentKey) -> Result<Option<DirentUuidMapping>, StoreError>;

    /// Return the mapping for `key`, creating it with a fresh uuid if none
    /// exists. At most one mapping is ever created per key; racing callers
    /// all receive the winner's mapping.
    fn get_or_create(&self, key: &DirentKey) -> Result<DirentUuidMapping, StoreError>;

    /// Re-file the mapping for `key` under a new parent directory and name,
    /// preserving its uuid. Returns the updated mapping, or `None` when no
    /// mapping exists for `key`. A target key already owned by a different
    /// uuid is a uniqueness violation and fails.
    fn update_path(
        &self,
        key: &DirentKey,
        new_parent_dir: &str,
        new_name: &str,
    ) -> Result<Option<DirentUuidMapping>, StoreError>;
}
