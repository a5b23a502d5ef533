//! Cookie session persistence between CLI invocations.
//!
//! A browser keeps the backend's session cookie between page loads. The CLI
//! does the same by writing the jar's `Cookie` header to a small JSON file
//! after login and loading it back on start-up.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;

/// What is written to disk: the API the cookie belongs to, and the cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub base_url: String,
    pub cookie: String,
}

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

    /// `<config_dir>/dora/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dora").join("session.json"))
    }

    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    /// Remove the stored session. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display())),
        }
    }

    /// Load the stored cookie into `client` when it was issued by the same API.
    ///
    /// Returns whether a cookie was restored. An unreadable file is logged and
    /// treated as "no session" so a corrupt file never blocks `login`.
    pub fn restore_into(&self, client: &ApiClient) -> bool {
        match self.load() {
            Ok(Some(session)) if session.base_url == client.base_url().as_str() => {
                client.restore_cookies(&session.cookie);
                tracing::debug!(path = %self.path.display(), "restored session cookie");
                true
            }
            Ok(Some(session)) => {
                tracing::debug!(
                    stored = %session.base_url,
                    current = %client.base_url(),
                    "ignoring session for a different API"
                );
                false
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("ignoring unreadable session file: {:#}", e);
                false
            }
        }
    }

    /// Save whatever cookie `client` currently holds. Returns `false` when
    /// the backend set no cookie.
    pub fn persist_from(&self, client: &ApiClient) -> Result<bool> {
        let Some(cookie) = client.cookie_header() else {
            return Ok(false);
        };
        self.save(&StoredSession {
            base_url: client.base_url().to_string(),
            cookie,
        })?;
        Ok(true)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
