//! Service configuration.
//!
//! Layered sources, lowest precedence first: built-in defaults, an optional
//! TOML file, then environment variables with the `SMARTLINK` prefix and `__`
//! as the separator for nested keys (e.g. `SMARTLINK__LOGGING__LEVEL=debug`).

use crate::logging::LoggingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the smart-link service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartLinkConfig {
    /// Base URL links are formatted against; any trailing slash is stripped
    /// at formatting time.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Directory of the sled database holding the uuid mappings. None means
    /// the platform data directory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for SmartLinkConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            store_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_service_url() -> String {
    "http://localhost:8000".to_string()
}

impl SmartLinkConfig {
    /// Load configuration from the given file (if present) and environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("SMARTLINK")
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }

    /// Resolve the mapping-store directory, falling back to the platform
    /// data directory.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "smartlink", "smartlink").ok_or_else(
            || ConfigError::Message("could not determine platform data directory".to_string()),
        )?;
        Ok(dirs.data_dir().join("uuidmap"))
    }
}
