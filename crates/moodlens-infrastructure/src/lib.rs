pub mod json_session_log_repository;
pub mod paths;
pub mod storage;

pub use crate::json_session_log_repository::JsonSessionLogRepository;
pub use crate::paths::{MoodlensPaths, PathError};
pub use crate::storage::{ConfigStorage, SecretStorage, SecretStorageError};
