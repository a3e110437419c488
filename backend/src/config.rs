//! # Application Configuration
//!
//! Environment-driven settings with usable defaults, so the binary runs
//! with no setup at all.

use std::path::PathBuf;

/// Default database backing the record store
const DEFAULT_DATABASE_URL: &str = "sqlite:club_manager.db";

/// Default location of the durable session file
const DEFAULT_SESSION_FILE: &str = "club_session.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection URL for the SQLite record store
    pub database_url: String,
    /// Path of the file persisting the authenticated session
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Read configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("CLUB_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            session_file: std::env::var("CLUB_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}
