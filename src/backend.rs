//! External collaborator interfaces.
//!
//! The resolver consumes these and implements none of them: the storage
//! backend owns repositories and dirents, the permission layer owns access
//! decisions, and the base-URL provider owns service addressing. All paths
//! passed to these traits are already in canonical form (see `crate::path`).

use crate::error::BackendError;
use async_trait::async_trait;

/// File-storage backend existence checks.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn repo_exists(&self, repo_id: &str) -> Result<bool, BackendError>;
    async fn dir_exists(&self, repo_id: &str, path: &str) -> Result<bool, BackendError>;
    async fn file_exists(&self, repo_id: &str, path: &str) -> Result<bool, BackendError>;
}

/// Folder-level permission decisions for a caller.
#[async_trait]
pub trait PermissionChecker: Send + Sync {
    async fn has_folder_permission(
        &self,
        caller: &str,
        repo_id: &str,
        parent_dir: &str,
    ) -> Result<bool, BackendError>;
}

/// Source of the service base URL used when formatting links.
pub trait BaseUrlProvider: Send + Sync {
    fn service_base_url(&self) -> String;
}

/// Fixed base URL, typically loaded from configuration.
pub struct StaticBaseUrl {
    url: String,
}

impl StaticBaseUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl BaseUrlProvider for StaticBaseUrl {
    fn service_base_url(&self) -> String {
        self.url.clone()
    }
}
