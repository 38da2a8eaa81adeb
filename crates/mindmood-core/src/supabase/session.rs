//! Auth session types and their on-disk store.
//!
//! The session is stored in `<home>/session.json` with restricted
//! permissions (0600). Tokens are never logged or displayed in full.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ClientError;

/// Seconds before the real expiry at which a session counts as expired.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// The signed-in account, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: Value,
}

/// An authenticated session.
///
/// `Debug` masks both tokens.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub refresh_token: String,
    /// Lifetime in seconds at issue time.
    pub expires_in: i64,
    /// Unix timestamp (seconds) of expiry.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &mask_token(&self.access_token))
            .field("token_type", &self.token_type)
            .field("refresh_token", &mask_token(&self.refresh_token))
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fills in `expires_at` from `expires_in` when the server omitted it.
    #[must_use]
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now.timestamp() + self.expires_in);
        }
        self
    }

    pub fn expires_at_time(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now.timestamp() + EXPIRY_MARGIN_SECS >= at,
            None => false,
        }
    }
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored session. Returns `None` if nothing is stored.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Session>, ClientError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            ClientError::SessionStore(format!("failed to read {}: {e}", self.path.display()))
        })?;

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            ClientError::SessionStore(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    /// Saves the session with restricted permissions (0600).
    ///
    /// Writes a sibling temp file and renames it over the old one, so a
    /// crash mid-write never leaves a truncated session behind.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), ClientError> {
        let store_err = |what: &str, e: &dyn std::fmt::Display| {
            ClientError::SessionStore(format!("failed to {what} {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| store_err("create directory for", &e))?;
        }

        let contents =
            serde_json::to_string_pretty(session).map_err(|e| store_err("serialize", &e))?;

        let tmp_path = self.path.with_extension("json.tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let written = options
            .open(&tmp_path)
            .and_then(|mut file| {
                file.write_all(contents.as_bytes())?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(store_err("write", &e));
        }

        Ok(())
    }

    /// Removes the stored session. Returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, ClientError> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|e| {
            ClientError::SessionStore(format!("failed to remove {}: {e}", self.path.display()))
        })?;
        Ok(true)
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let head: String = token.chars().take(12).collect();
    format!("{head}...")
}
