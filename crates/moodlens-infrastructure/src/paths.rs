//! Unified path management for moodlens files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/moodlens/          # Config directory
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── logs/                    # Application logs
//!     └── moodlens.log.YYYY-MM-DD
//!
//! ~/.local/share/moodlens/     # Data directory
//! └── chat_history.json        # Saved session log
//! ```
//!
//! A base directory override puts all of the above directly under one root,
//! which is what tests and portable installs use.

use moodlens_core::config::DEFAULT_HISTORY_FILE;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "moodlens";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Resolves every file location the application uses.
#[derive(Debug, Clone, Default)]
pub struct MoodlensPaths {
    base: Option<PathBuf>,
}

impl MoodlensPaths {
    /// Creates a resolver; `base` overrides the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/moodlens/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/moodlens/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// This file should only be readable by its owner.
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Default location of the saved session log.
    pub fn history_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join(DEFAULT_HISTORY_FILE))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
