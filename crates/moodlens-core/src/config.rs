use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Model used when neither config nor secrets name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// File name of the persisted session log.
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.json";
/// Per-request limit applied under [`ApplyOrder::Submission`] when none is
/// configured, so one unanswered call cannot hold back every later result.
pub const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 60;

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Order in which completed analyses are applied to the transcript and log.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplyOrder {
    /// Results are held back until every earlier submission has been applied.
    #[default]
    Submission,
    /// Results are applied as soon as their remote call returns.
    Completion,
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_path: Option<String>,
    /// Per-request limit in seconds. When absent, submission order falls back
    /// to [`DEFAULT_SUBMISSION_TIMEOUT_SECS`] and completion order waits
    /// indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub apply_order: ApplyOrder,
}

impl AppConfig {
    /// Model to use: config first, then the secrets file, then the default.
    pub fn resolve_model(&self, secrets: &SecretConfig) -> String {
        self.model
            .clone()
            .or_else(|| secrets.gemini.as_ref().and_then(|g| g.model_name.clone()))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
    }
}
