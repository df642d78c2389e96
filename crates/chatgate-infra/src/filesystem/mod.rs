//! Data directory layout for chatgate.
//!
//! Everything the gateway persists lives under one data directory:
//!
//! ```text
//! {data_dir}/
//!   config.json      admins, command timeout
//!   userData.json    session state
//!   commands/        one JSON manifest per template command
//! ```

use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "CHATGATE_DATA_DIR";

/// Session state file name.
pub const SESSION_FILE: &str = "userData.json";

/// Template command directory name.
pub const COMMANDS_DIR: &str = "commands";

/// Paths derived from a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{data_dir}/config.json`
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `{data_dir}/userData.json`
    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    /// `{data_dir}/commands/`
    pub fn commands_dir(&self) -> PathBuf {
        self.root.join(COMMANDS_DIR)
    }

    /// Create the data directory if needed.
    pub async fn ensure(&self) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(&self.root).await
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATGATE_DATA_DIR` environment variable
/// 2. `~/.chatgate`
/// 3. `.chatgate` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatgate");
    }

    PathBuf::from(".chatgate")
}
