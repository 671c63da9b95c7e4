//! Secret configuration file storage.
//!
//! Provides loading of the Gemini API key from `secret.json`, with the
//! `GEMINI_API_KEY` environment variable taking precedence over the file.

use crate::paths::MoodlensPaths;
use moodlens_core::config::{DEFAULT_GEMINI_MODEL, GeminiConfig, SecretConfig};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that overrides the file's API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Errors that can occur during secret storage operations.
#[derive(Debug, Error)]
pub enum SecretStorageError {
    /// Configuration file not found.
    #[error("Configuration file not found at: {}", .0.display())]
    NotFound(PathBuf),
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    /// Config directory not found.
    #[error("Could not determine home directory")]
    ConfigDirNotFound,
}

/// Storage for the secret configuration file (secret.json).
///
/// Read-only apart from [`SecretStorage::ensure_template`]; keys are never
/// validated here, only loaded.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a SecretStorage at the location resolved by `paths`.
    pub fn new(paths: &MoodlensPaths) -> Result<Self, SecretStorageError> {
        let path = paths
            .secret_file()
            .map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Loads the file (a missing file counts as empty) and applies the
    /// `GEMINI_API_KEY` override.
    pub fn load_with_env(&self) -> Result<SecretConfig, SecretStorageError> {
        let config = match self.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(path)) => {
                tracing::debug!("No secret file at {:?}", path);
                SecretConfig::default()
            }
            Err(err) => return Err(err),
        };
        Ok(apply_env_override(config, std::env::var(API_KEY_ENV).ok()))
    }

    /// Writes a template secret.json if none exists and returns its path.
    ///
    /// On Unix the file is created with mode 600.
    pub fn ensure_template(&self) -> Result<PathBuf, SecretStorageError> {
        if self.path.exists() {
            return Ok(self.path.clone());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: String::new(),
                model_name: Some(DEFAULT_GEMINI_MODEL.to_string()),
            }),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&template)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(self.path.clone())
    }
}

/// Replaces the Gemini key with `env_key` when it is set and non-blank.
fn apply_env_override(mut config: SecretConfig, env_key: Option<String>) -> SecretConfig {
    let Some(key) = env_key.filter(|key| !key.trim().is_empty()) else {
        return config;
    };

    match config.gemini.as_mut() {
        Some(gemini) => gemini.api_key = key,
        None => {
            config.gemini = Some(GeminiConfig {
                api_key: key,
                model_name: None,
            })
        }
    }
    config
}
