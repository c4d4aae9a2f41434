//! Integration tests for the durable UUID mapping store.

use smartlink::store::{DirentKey, SledUuidMapStore, UuidMapStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn key(repo: &str, parent: &str, name: &str, is_dir: bool) -> DirentKey {
    DirentKey::new(repo, parent, name, is_dir).unwrap()
}

#[test]
fn sequential_lookups_return_the_same_uuid() {
    let dir = TempDir::new().unwrap();
    let store = SledUuidMapStore::open(dir.path()).unwrap();
    let k = key("repo-1", "/docs", "readme.md", false);

    let first = store.get_or_create(&k).unwrap();
    let second = store.get_or_create(&k).unwrap();
    assert_eq!(first.uuid, second.uuid);
}

#[test]
fn two_handles_on_one_database_converge() {
    // Two store handles over the same database stand in for independent
    // callers that share only the persistence layer.
    let dir = TempDir::new().unwrap();
    let db = sled::open(dir.path()).unwrap();
    let store_a = SledUuidMapStore::from_db(&db).unwrap();
    let store_b = SledUuidMapStore::from_db(&db).unwrap();

    let k = key("repo-1", "/docs", "shared.md", false);
    let a = store_a.get_or_create(&k).unwrap();
    let b = store_b.get_or_create(&k).unwrap();
    assert_eq!(a.uuid, b.uuid);
}

#[test]
fn racing_handles_observe_at_most_one_creation() {
    let dir = TempDir::new().unwrap();
    let db = sled::open(dir.path()).unwrap();

    let mut handles = vec![];
    for _ in 0..8 {
        let store = SledUuidMapStore::from_db(&db).unwrap();
        handles.push(thread::spawn(move || {
            let k = key("repo-1", "/docs", "hot.md", false);
            store.get_or_create(&k).unwrap().uuid
        }));
    }

    let uuids: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(uuids.len(), 1);
}

#[test]
fn uuids_are_unique_across_many_keys() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SledUuidMapStore::open(dir.path()).unwrap());

    let mut handles = vec![];
    for t in 0..4 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            let mut uuids = Vec::new();
            for i in 0..64 {
                let k = key("repo-1", "/dir", &format!("f-{}-{}", t, i), false);
                uuids.push(store.get_or_create(&k).unwrap().uuid);
            }
            uuids
        }));
    }

    let all: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
}

#[test]
fn rename_tracking_keeps_links_stable() {
    let dir = TempDir::new().unwrap();
    let store = SledUuidMapStore::open(dir.path()).unwrap();

    let before = store
        .get_or_create(&key("repo-1", "/docs", "draft.md", false))
        .unwrap();

    // External rename workflow moves the entry; the mapping follows it.
    store
        .update_path(
            &key("repo-1", "/docs", "draft.md", false),
            "/published",
            "article.md",
        )
        .unwrap()
        .unwrap();

    let after = store
        .get_or_create(&key("repo-1", "/published", "article.md", false))
        .unwrap();
    assert_eq!(before.uuid, after.uuid);

    // The vacated key is a fresh dirent if something new appears there.
    let replacement = store
        .get_or_create(&key("repo-1", "/docs", "draft.md", false))
        .unwrap();
    assert_ne!(replacement.uuid, before.uuid);
}
