//! Logging setup.
//!
//! Structured logging over the `tracing` crate: level comes from the config
//! (overridable via `RUST_LOG`), output is text or json on stderr.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Initialize the global tracing subscriber from the config.
///
/// `RUST_LOG` takes precedence over the configured level. Safe to call only
/// once per process.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("invalid log level")?;

    match config.format.as_str() {
        "json" => {
            Registry::default()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("failed to install logging subscriber")?;
        }
        "text" => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(config.color)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .context("failed to install logging subscriber")?;
        }
        other => anyhow::bail!("unknown log format '{}', expected 'text' or 'json'", other),
    }

    Ok(())
}
