//! End-to-end resolution over a durable store and fixture collaborators.

use async_trait::async_trait;
use smartlink::backend::{PermissionChecker, StorageBackend, StaticBaseUrl};
use smartlink::error::BackendError;
use smartlink::store::{DirentKey, SledUuidMapStore, UuidMapStore};
use smartlink::{ErrorCategory, ResolveError, SmartLinkRequest, SmartLinkResolver};
use std::sync::Arc;
use tempfile::TempDir;

const REPO: &str = "7f3b6a84-51d2-47f9-b6cd-03a1f2a2a9e4";
const BASE: &str = "https://cloud.example.com";

struct FixtureBackend;

#[async_trait]
impl StorageBackend for FixtureBackend {
    async fn repo_exists(&self, repo_id: &str) -> Result<bool, BackendError> {
        Ok(repo_id == REPO)
    }

    async fn dir_exists(&self, repo_id: &str, path: &str) -> Result<bool, BackendError> {
        Ok(repo_id == REPO && path == "/docs")
    }

    async fn file_exists(&self, repo_id: &str, path: &str) -> Result<bool, BackendError> {
        Ok(repo_id == REPO && path == "/docs/readme.md")
    }
}

struct AllowAll;

#[async_trait]
impl PermissionChecker for AllowAll {
    async fn has_folder_permission(
        &self,
        _caller: &str,
        _repo_id: &str,
        _parent_dir: &str,
    ) -> Result<bool, BackendError> {
        Ok(true)
    }
}

fn resolver(store: Arc<dyn UuidMapStore>) -> SmartLinkResolver {
    SmartLinkResolver::new(
        Arc::new(FixtureBackend),
        Arc::new(AllowAll),
        store,
        Arc::new(StaticBaseUrl::new(BASE)),
    )
}

fn readme_request() -> SmartLinkRequest {
    SmartLinkRequest::from_raw(Some(REPO), Some("/docs/readme.md"), Some("false")).unwrap()
}

#[tokio::test]
async fn link_embeds_the_stored_uuid() {
    let dir = TempDir::new().unwrap();
    let store: Arc<SledUuidMapStore> = Arc::new(SledUuidMapStore::open(dir.path()).unwrap());

    let link = resolver(store.clone())
        .resolve("alice", &readme_request())
        .await
        .unwrap();

    let key = DirentKey::new(REPO, "/docs", "readme.md", false).unwrap();
    let mapping = store.get_or_create(&key).unwrap();
    assert_eq!(
        link,
        format!("{}/smart-link/{}/readme.md", BASE, mapping.uuid)
    );
}

#[tokio::test]
async fn resolution_is_idempotent_across_resolver_instances() {
    let dir = TempDir::new().unwrap();
    let db = sled::open(dir.path()).unwrap();

    // Separate resolver and store handles sharing only the database, the
    // way independent service instances would.
    let first = resolver(Arc::new(SledUuidMapStore::from_db(&db).unwrap()))
        .resolve("alice", &readme_request())
        .await
        .unwrap();
    let second = resolver(Arc::new(SledUuidMapStore::from_db(&db).unwrap()))
        .resolve("bob", &readme_request())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn error_kinds_map_to_response_categories() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn UuidMapStore> =
        Arc::new(SledUuidMapStore::open(dir.path()).unwrap());
    let resolver = resolver(store);

    // Unknown repository.
    let request = SmartLinkRequest::from_raw(
        Some("00000000-0000-0000-0000-000000000000"),
        Some("/docs/readme.md"),
        Some("false"),
    )
    .unwrap();
    let err = resolver.resolve("alice", &request).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);

    // Entry absent at the declared type.
    let request =
        SmartLinkRequest::from_raw(Some(REPO), Some("/docs/readme.md"), Some("true")).unwrap();
    let err = resolver.resolve("alice", &request).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);

    // Malformed is_dir never reaches the resolver.
    let err =
        SmartLinkRequest::from_raw(Some(REPO), Some("/docs/readme.md"), Some("maybe")).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidArgument(_)));
    assert_eq!(err.category(), ErrorCategory::BadInput);
}
