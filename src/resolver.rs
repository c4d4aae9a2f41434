//! Smart Link Resolver
//!
//! Orchestrates one resolution: validate the request, confirm the entry
//! exists at the declared type, check folder permission, get-or-create the
//! durable uuid, format the link. Every step is fail-fast and nothing is
//! retried here; retry policy belongs to the caller.

use crate::backend::{BaseUrlProvider, PermissionChecker, StorageBackend};
use crate::error::ResolveError;
use crate::path::{normalize_file_path, split_parent_name};
use crate::store::{DirentKey, UuidMapStore};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::sync::Arc;
use uuid::Uuid;

/// Characters escaped in the link's name segment: everything a URL path
/// segment cannot carry literally.
const NAME_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Whether the requested dirent is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirentKind {
    File,
    Dir,
}

impl DirentKind {
    /// Parse the boundary literal. Only `"true"` and `"false"` are
    /// recognized, case-insensitively.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(DirentKind::Dir),
            "false" => Ok(DirentKind::File),
            _ => Err(ResolveError::InvalidArgument(
                "is_dir can only be 'true' or 'false'".to_string(),
            )),
        }
    }

    pub fn is_dir(self) -> bool {
        matches!(self, DirentKind::Dir)
    }
}

/// A validated smart-link request.
///
/// `from_raw` performs all argument validation once at the boundary; a value
/// of this type always carries a well-formed repo id, a non-empty path and a
/// recognized dirent kind.
#[derive(Debug, Clone)]
pub struct SmartLinkRequest {
    pub repo_id: String,
    pub path: String,
    pub kind: DirentKind,
}

impl SmartLinkRequest {
    /// Validate raw request arguments, typically query parameters.
    pub fn from_raw(
        repo_id: Option<&str>,
        path: Option<&str>,
        is_dir: Option<&str>,
    ) -> Result<Self, ResolveError> {
        let repo_id = repo_id
            .filter(|id| is_valid_repo_id_format(id))
            .ok_or_else(|| ResolveError::InvalidArgument("repo_id invalid".to_string()))?;

        let path = path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ResolveError::InvalidArgument("path invalid".to_string()))?;

        let kind = match is_dir {
            Some(raw) => DirentKind::parse(raw)?,
            None => {
                return Err(ResolveError::InvalidArgument("is_dir invalid".to_string()));
            }
        };

        Ok(Self {
            repo_id: repo_id.to_string(),
            path: path.to_string(),
            kind,
        })
    }
}

/// A repository id is the canonical hyphenated rendering of a UUID.
pub fn is_valid_repo_id_format(repo_id: &str) -> bool {
    repo_id.len() == 36 && Uuid::parse_str(repo_id).is_ok()
}

/// Format a smart link from a durable uuid and the raw entry name.
///
/// The base URL loses any trailing slash; the name is escaped for use as a
/// URL path segment.
pub fn gen_smart_link(base_url: &str, uuid: &Uuid, name: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!(
        "{}/smart-link/{}/{}",
        base,
        uuid,
        utf8_percent_encode(name, NAME_SEGMENT)
    )
}

/// End-to-end smart-link resolution over external collaborators and the
/// UUID mapping store.
pub struct SmartLinkResolver {
    backend: Arc<dyn StorageBackend>,
    permissions: Arc<dyn PermissionChecker>,
    store: Arc<dyn UuidMapStore>,
    base_url: Arc<dyn BaseUrlProvider>,
}

impl SmartLinkResolver {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        permissions: Arc<dyn PermissionChecker>,
        store: Arc<dyn UuidMapStore>,
        base_url: Arc<dyn BaseUrlProvider>,
    ) -> Self {
        Self {
            backend,
            permissions,
            store,
            base_url,
        }
    }

    /// Resolve a validated request into a smart-link string for `caller`.
    ///
    /// No lock is held across the external calls, and an already-committed
    /// mapping stays valid even if the caller abandons the request.
    pub async fn resolve(
        &self,
        caller: &str,
        request: &SmartLinkRequest,
    ) -> Result<String, ResolveError> {
        // Resource checks: repository first, then the entry at its declared
        // type. A type mismatch is a not-found condition.
        if !self.backend.repo_exists(&request.repo_id).await? {
            return Err(ResolveError::NotFound(format!(
                "library {} not found",
                request.repo_id
            )));
        }

        let path = normalize_file_path(&request.path);
        if path == "/" {
            // The repository root has no entry name to anchor a link to.
            return Err(ResolveError::InvalidArgument(
                "path refers to the repository root".to_string(),
            ));
        }

        let exists = match request.kind {
            DirentKind::Dir => self.backend.dir_exists(&request.repo_id, &path).await?,
            DirentKind::File => self.backend.file_exists(&request.repo_id, &path).await?,
        };
        if !exists {
            let what = match request.kind {
                DirentKind::Dir => "folder",
                DirentKind::File => "file",
            };
            return Err(ResolveError::NotFound(format!(
                "{} {} not found",
                what, request.path
            )));
        }

        let (parent_dir, name) = split_parent_name(&path);

        if !self
            .permissions
            .has_folder_permission(caller, &request.repo_id, &parent_dir)
            .await?
        {
            return Err(ResolveError::PermissionDenied);
        }

        let key = DirentKey::new(
            request.repo_id.clone(),
            parent_dir,
            name.clone(),
            request.kind.is_dir(),
        )
        .map_err(ResolveError::from)?;
        let mapping = self.store.get_or_create(&key)?;

        tracing::debug!(
            repo_id = %request.repo_id,
            path = %path,
            uuid = %mapping.uuid,
            "resolved smart link"
        );

        Ok(gen_smart_link(
            &self.base_url.service_base_url(),
            &mapping.uuid,
            &name,
        ))
    }
}
