//! Error types for the smart-link core.
//!
//! Each layer has its own error enum; the resolver maps lower-layer failures
//! into the externally visible `ResolveError` taxonomy. Internal causes are
//! logged at the mapping site and never surfaced verbatim to callers.

use thiserror::Error;

/// Errors from the UUID mapping store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key violates the DirentKey invariants (empty name, separator in
    /// name, non-normalized parent directory).
    #[error("invalid mapping key: {0}")]
    InvalidKey(String),

    /// The persistence layer cannot be reached.
    #[error("mapping store unavailable: {0}")]
    Unavailable(String),

    /// Any other persistence failure. The store never returns a partial or
    /// fabricated mapping in this case.
    #[error("mapping store failure: {0}")]
    Internal(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        match err {
            sled::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Internal(other.to_string()),
        }
    }
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        StoreError::Internal(format!("mapping codec failure: {}", err))
    }
}

/// Failure reported by an external collaborator (storage backend or
/// permission layer).
#[derive(Debug, Error)]
#[error("backend failure: {0}")]
pub struct BackendError(pub String);

/// Externally visible response category for a `ResolveError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadInput,
    NotFound,
    Forbidden,
    InternalFailure,
}

/// Errors surfaced by smart-link resolution.
///
/// `StorageUnavailable` and `Internal` deliberately carry no detail: the
/// originating cause is logged where the mapping happens, and callers only
/// see a generic message.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("storage unavailable")]
    StorageUnavailable,

    #[error("internal error")]
    Internal,
}

impl ResolveError {
    /// Response category exposed to external callers.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolveError::InvalidArgument(_) => ErrorCategory::BadInput,
            ResolveError::NotFound(_) => ErrorCategory::NotFound,
            ResolveError::PermissionDenied => ErrorCategory::Forbidden,
            ResolveError::StorageUnavailable | ResolveError::Internal => {
                ErrorCategory::InternalFailure
            }
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "uuid mapping store failure");
        match err {
            StoreError::Unavailable(_) => ResolveError::StorageUnavailable,
            // An invalid key past resolver validation is a logic error, not
            // caller input.
            StoreError::InvalidKey(_) | StoreError::Internal(_) => ResolveError::Internal,
        }
    }
}

impl From<BackendError> for ResolveError {
    fn from(err: BackendError) -> Self {
        tracing::error!(error = %err, "storage backend failure");
        ResolveError::Internal
    }
}
