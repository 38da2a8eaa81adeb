//! File logging setup.
//!
//! The sign-in screen owns the terminal, so log output goes to
//! `${MINDMOOD_HOME}/logs/mindmood.log` instead of stderr.
//! `MINDMOOD_LOG` overrides the configured filter.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, paths};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "MINDMOOD_LOG";

const LOG_FILE_NAME: &str = "mindmood.log";

/// Installs the global subscriber writing to the default log directory.
///
/// Returns the writer guard; dropping it flushes pending lines.
/// Returns `None` when logging is disabled.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    init_in(config, &paths::logs_dir())
}

/// Installs the global subscriber writing into `dir`.
///
/// # Errors
/// Returns an error if the log directory cannot be created or a subscriber
/// is already installed.
pub fn init_in(config: &LoggingConfig, dir: &Path) -> Result<Option<WorkerGuard>> {
    if !config.enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.level))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(Some(guard))
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
