//! Configuration management for MindMood.
//!
//! Loads configuration from ${MINDMOOD_HOME}/config.toml with sensible defaults,
//! then applies environment overrides for the backend secrets.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::supabase::{ClientError, ClientOptions, SupabaseConfig};

/// Environment variables consulted for the service URL, in priority order.
pub const URL_ENV_VARS: &[&str] = &["SUPABASE_URL", "EXPO_PUBLIC_SUPABASE_URL"];

/// Environment variables consulted for the public API key, in priority order.
pub const ANON_KEY_ENV_VARS: &[&str] = &["SUPABASE_ANON_KEY", "EXPO_PUBLIC_SUPABASE_ANON_KEY"];

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for MindMood configuration and data files.
    //!
    //! MINDMOOD_HOME resolution order:
    //! 1. MINDMOOD_HOME environment variable (if set)
    //! 2. ~/.config/mindmood (default)

    use std::path::PathBuf;

    /// Returns the MindMood home directory.
    pub fn mindmood_home() -> PathBuf {
        if let Ok(home) = std::env::var("MINDMOOD_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".mindmood"),
            |h| h.join(".config").join("mindmood"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        mindmood_home().join("config.toml")
    }

    /// Returns the path of the persisted auth session.
    pub fn session_path() -> PathBuf {
        mindmood_home().join("session.json")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        mindmood_home().join("logs")
    }
}

/// Backend service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupabaseSection {
    /// Project URL. Overridden by `SUPABASE_URL`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Public anon key. Overridden by `SUPABASE_ANON_KEY`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    pub auto_refresh_token: bool,
    pub persist_session: bool,
    pub detect_session_in_url: bool,
}

impl Default for SupabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            auto_refresh_token: true,
            persist_session: true,
            detect_session_in_url: false,
        }
    }
}

/// Sign-in flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    /// Upper bound on a single sign-in / sign-up round-trip.
    pub submit_timeout_secs: u64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            submit_timeout_secs: Config::DEFAULT_SUBMIT_TIMEOUT_SECS,
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// `tracing` filter directive, e.g. "info" or "mindmood_core=debug".
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
        }
    }
}

/// MindMood configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub supabase: SupabaseSection,
    pub auth: AuthSection,
    pub logging: LoggingConfig,
}

impl Config {
    const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path and applies
    /// environment overrides.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Overlays backend secrets from the environment.
    ///
    /// Blank values are ignored so an exported-but-empty variable does not
    /// shadow the config file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let first_set = |names: &[&str]| {
            names.iter().find_map(|name| {
                lookup(name)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
        };

        if let Some(url) = first_set(URL_ENV_VARS) {
            self.supabase.url = Some(url);
        }
        if let Some(key) = first_set(ANON_KEY_ENV_VARS) {
            self.supabase.anon_key = Some(key);
        }
    }

    /// Builds the explicit backend configuration handed to the client.
    ///
    /// # Errors
    /// Returns `ClientError::MissingSetting` when the URL or anon key is absent.
    pub fn supabase_config(&self) -> Result<SupabaseConfig, ClientError> {
        let url = non_blank(self.supabase.url.as_deref())
            .ok_or(ClientError::MissingSetting("SUPABASE_URL"))?;
        let anon_key = non_blank(self.supabase.anon_key.as_deref())
            .ok_or(ClientError::MissingSetting("SUPABASE_ANON_KEY"))?;

        Ok(SupabaseConfig {
            url: url.to_string(),
            anon_key: anon_key.to_string(),
            options: ClientOptions {
                auto_refresh_token: self.supabase.auto_refresh_token,
                persist_session: self.supabase.persist_session,
                detect_session_in_url: self.supabase.detect_session_in_url,
                session_path: self
                    .supabase
                    .persist_session
                    .then(paths::session_path),
            },
        })
    }

    /// Returns the submit timeout, or `None` when set to zero.
    pub fn submit_timeout(&self) -> Option<Duration> {
        match self.auth.submit_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
