//! # Durable Session Store
//!
//! One JSON file holding the currently-authenticated supervisor, so a
//! login survives application restarts. An absent or unreadable file means
//! logged out.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use shared::Supervisor;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The supervisor persisted by the last successful login, if any
    pub fn load(&self) -> Option<Supervisor> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Persist the authenticated supervisor
    pub fn save(&self, user: &Supervisor) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string(user)?)?;
        Ok(())
    }

    /// Forget the persisted session
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
