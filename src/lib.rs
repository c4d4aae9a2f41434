//! Smartlink: Durable Smart-Link Resolution
//!
//! Resolves a (repository id, path) pair inside a content-addressed file-storage
//! service into a stable smart-link URL anchored to a durable per-dirent UUID,
//! so the link stays valid after the entry is renamed or moved within the same
//! repository.

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;
pub mod resolver;
pub mod store;

pub use error::{ErrorCategory, ResolveError};
pub use resolver::{DirentKind, SmartLinkRequest, SmartLinkResolver};
pub use store::{DirentKey, DirentUuidMapping, UuidMapStore};
