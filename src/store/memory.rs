//! In-process UUID mapping store.
//!
//! Backs the same contract as the sled store with a parking_lot-guarded map.
//! Suitable for embedding and tests; it cannot provide cross-process
//! uniqueness, so deployments with multiple instances use the persistent
//! store instead.

use crate::error::StoreError;
use crate::store::{DirentKey, DirentUuidMapping, UuidMapStore};
use parking_lot::RwLock;
use std::collections::HashMap;

/// HashMap-backed mapping store.
#[derive(Default)]
pub struct MemoryUuidMapStore {
    mappings: RwLock<HashMap<DirentKey, DirentUuidMapping>>,
}

impl MemoryUuidMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mappings currently held.
    pub fn len(&self) -> usize {
        self.mappings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.read().is_empty()
    }
}

impl UuidMapStore for MemoryUuidMapStore {
    fn get(&self, key: &DirentKey) -> Result<Option<DirentUuidMapping>, StoreError> {
        Ok(self.mappings.read().get(key).cloned())
    }

    fn get_or_create(&self, key: &DirentKey) -> Result<DirentUuidMapping, StoreError> {
        key.validate()?;

        // Fast path under the read lock.
        if let Some(existing) = self.mappings.read().get(key) {
            return Ok(existing.clone());
        }

        // Double-check under the write lock: another caller may have won
        // between the two acquisitions.
        let mut mappings = self.mappings.write();
        let mapping = mappings
            .entry(key.clone())
            .or_insert_with(|| DirentUuidMapping::assign(key));
        Ok(mapping.clone())
    }

    fn update_path(
        &self,
        key: &DirentKey,
        new_parent_dir: &str,
        new_name: &str,
    ) -> Result<Option<DirentUuidMapping>, StoreError> {
        let new_key = DirentKey::new(
            key.repo_id.clone(),
            new_parent_dir,
            new_name,
            key.is_dir,
        )?;

        let mut mappings = self.mappings.write();
        if new_key != *key {
            if let Some(existing) = mappings.get(&new_key) {
                let moving_uuid = mappings.get(key).map(|m| m.uuid);
                if moving_uuid != Some(existing.uuid) {
                    return Err(StoreError::Internal(format!(
                        "uniqueness violation: target key {}/{} already mapped",
                        new_parent_dir, new_name
                    )));
                }
            }
        }

        let mut mapping = match mappings.remove(key) {
            Some(m) => m,
            None => return Ok(None),
        };
        mapping.parent_dir = new_key.parent_dir.clone();
        mapping.name = new_key.name.clone();
        mappings.insert(new_key, mapping.clone());
        Ok(Some(mapping))
    }
}
