//! Application configuration file storage (config.toml).

use crate::paths::MoodlensPaths;
use moodlens_core::config::AppConfig;
use moodlens_core::error::{MoodlensError, Result};
use std::path::{Path, PathBuf};

/// Loads [`AppConfig`] from a TOML file.
///
/// A missing or blank file yields the default configuration.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(paths: &MoodlensPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| MoodlensError::config(e.to_string()))?;
        Ok(Self { path })
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!("No config file at {:?}, using defaults", self.path);
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodlens_core::config::ApplyOrder;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_loads_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "model = \"gemini-pro\"\nrequest_timeout_secs = 20\napply_order = \"completion\"\n",
        )
        .unwrap();

        let config = ConfigStorage::with_path(&path).load().unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-pro"));
        assert_eq!(config.request_timeout_secs, Some(20));
        assert_eq!(config.apply_order, ApplyOrder::Completion);
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "model = [unterminated").unwrap();

        let err = ConfigStorage::with_path(&path).load().unwrap_err();
        assert!(err.is_serialization());
    }
}
