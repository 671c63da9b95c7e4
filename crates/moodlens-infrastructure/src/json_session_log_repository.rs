//! JSON file implementation of the session log repository.
//!
//! The file holds a single JSON array of interaction records, indented with
//! four spaces. Saves go through a temporary sibling file and a rename so a
//! failed write never leaves a truncated history behind.

use async_trait::async_trait;
use moodlens_core::error::{MoodlensError, Result};
use moodlens_core::session::{SessionLog, SessionLogRepository};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};

pub struct JsonSessionLogRepository {
    path: PathBuf,
}

impl JsonSessionLogRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| MoodlensError::io(format!("Invalid history path: {:?}", self.path)))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

fn to_indented_json(log: &SessionLog) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    log.serialize(&mut serializer)?;
    Ok(buf)
}

#[async_trait]
impl SessionLogRepository for JsonSessionLogRepository {
    async fn save(&self, log: &SessionLog) -> Result<()> {
        let bytes = to_indented_json(log)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp_path = self.temp_path()?;
        tokio::fs::write(&tmp_path, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }

        tracing::info!(
            records = log.len(),
            "Saved session log to {:?}",
            self.path
        );
        Ok(())
    }

    async fn load(&self) -> Result<SessionLog> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionLog::new());
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(SessionLog::new());
        }

        let log: SessionLog = serde_json::from_str(&content)?;
        tracing::debug!(records = log.len(), "Loaded session log from {:?}", self.path);
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodlens_core::session::InteractionRecord;
    use tempfile::TempDir;

    fn record(input: &str, confidence: u32) -> InteractionRecord {
        InteractionRecord {
            timestamp: "2024-03-02T10:15:00+00:00".to_string(),
            input: input.to_string(),
            response: "Sentiment: neutral\n\nAnalysis: flat".to_string(),
            confidence,
        }
    }

    #[test]
    fn test_four_space_indent() {
        let log = SessionLog::from_records(vec![record("hi", 40)]);
        let text = String::from_utf8(to_indented_json(&log).unwrap()).unwrap();
        assert!(text.starts_with("[\n    {\n        \""));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let repo = JsonSessionLogRepository::new("/data/chat_history.json");
        assert_eq!(
            repo.temp_path().unwrap(),
            PathBuf::from("/data/chat_history.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonSessionLogRepository::new(temp_dir.path().join("none.json"));
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_history.json");
        let repo = JsonSessionLogRepository::new(&path);
        assert_eq!(repo.path(), path.as_path());

        repo.save(&SessionLog::from_records(vec![record("a", 1), record("b", 2)]))
            .await
            .unwrap();
        repo.save(&SessionLog::from_records(vec![record("c", 3)]))
            .await
            .unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records()[0].input, "c");
        assert!(!temp_dir.path().join("chat_history.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_history.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let err = JsonSessionLogRepository::new(&path).load().await.unwrap_err();
        assert!(err.is_serialization());
    }
}
