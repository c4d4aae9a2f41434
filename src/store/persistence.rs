//! Sled-backed UUID mapping store.
//!
//! Uniqueness under concurrency rests on sled's atomic compare-and-swap:
//! creation inserts only if the key is still vacant, so racing callers from
//! any thread or process sharing the database converge on a single row. No
//! advisory in-process lock is involved.

use crate::error::StoreError;
use crate::store::{DirentKey, DirentUuidMapping, UuidMapStore};
use sled::transaction::ConflictableTransactionError;
use std::path::Path;

const MAPPING_TREE: &str = "dirent_uuid_map";

/// Durable mapping store on top of a sled tree.
pub struct SledUuidMapStore {
    tree: sled::Tree,
}

impl SledUuidMapStore {
    /// Open (or create) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path.as_ref())?;
        Self::from_db(&db)
    }

    /// Build the store on an already-open database, e.g. one shared with
    /// other trees.
    pub fn from_db(db: &sled::Db) -> Result<Self, StoreError> {
        let tree = db.open_tree(MAPPING_TREE)?;
        Ok(Self { tree })
    }

    fn decode(bytes: &[u8]) -> Result<DirentUuidMapping, StoreError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl UuidMapStore for SledUuidMapStore {
    fn get(&self, key: &DirentKey) -> Result<Option<DirentUuidMapping>, StoreError> {
        let key_bytes = key.encode()?;
        match self.tree.get(&key_bytes)? {
            Some(value) => Ok(Some(Self::decode(&value)?)),
            None => Ok(None),
        }
    }

    fn get_or_create(&self, key: &DirentKey) -> Result<DirentUuidMapping, StoreError> {
        key.validate()?;
        let key_bytes = key.encode()?;

        // Fast path: mapping already assigned.
        if let Some(value) = self.tree.get(&key_bytes)? {
            return Self::decode(&value);
        }

        let candidate = DirentUuidMapping::assign(key);
        let value_bytes = bincode::serialize(&candidate)?;

        // The store never deletes rows itself, but an external removal
        // workflow may; loop so a lost race followed by a removal still
        // terminates with a consistent answer.
        let mut value_bytes = Some(value_bytes);
        loop {
            let insert = value_bytes
                .take()
                .map(Ok)
                .unwrap_or_else(|| bincode::serialize(&DirentUuidMapping::assign(key)))?;
            match self
                .tree
                .compare_and_swap(&key_bytes, None as Option<&[u8]>, Some(insert.clone()))?
            {
                Ok(()) => {
                    self.tree.flush()?;
                    tracing::debug!(
                        repo_id = %key.repo_id,
                        parent_dir = %key.parent_dir,
                        name = %key.name,
                        "assigned new dirent uuid"
                    );
                    return Self::decode(&insert);
                }
                // Lost the race: discard our candidate and return the
                // winner's persisted mapping.
                Err(cas) => {
                    if let Some(current) = cas.current {
                        return Self::decode(&current);
                    }
                }
            }
        }
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
        let old_bytes = key.encode()?;
        let new_bytes = new_key.encode()?;

        if old_bytes == new_bytes {
            return self.get(key);
        }

        let result = self
            .tree
            .transaction(|tree| {
                let current = match tree.get(&old_bytes)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                let mut mapping = Self::decode(&current)
                    .map_err(ConflictableTransactionError::Abort)?;

                if let Some(existing) = tree.get(&new_bytes)? {
                    let existing = Self::decode(&existing)
                        .map_err(ConflictableTransactionError::Abort)?;
                    if existing.uuid != mapping.uuid {
                        return Err(ConflictableTransactionError::Abort(StoreError::Internal(
                            format!(
                                "uniqueness violation: target key {}/{} already mapped",
                                new_parent_dir, new_name
                            ),
                        )));
                    }
                }

                mapping.parent_dir = new_key.parent_dir.clone();
                mapping.name = new_key.name.clone();
                let value = bincode::serialize(&mapping)
                    .map_err(StoreError::from)
                    .map_err(ConflictableTransactionError::Abort)?;

                tree.remove(old_bytes.as_slice())?;
                tree.insert(new_bytes.as_slice(), value)?;
                Ok(Some(mapping))
            })
            .map_err(|err| match err {
                sled::transaction::TransactionError::Abort(e) => e,
                sled::transaction::TransactionError::Storage(e) => e.into(),
            })?;

        if result.is_some() {
            self.tree.flush()?;
        }
        Ok(result)
    }
}
