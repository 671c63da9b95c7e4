//! Validated user submission.

use crate::error::{MoodlensError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw text submitted by the user for sentiment analysis.
///
/// The only way to build one is [`AnalysisRequest::new`], which trims the
/// input and rejects empty text, so every request that reaches the prompt
/// builder is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnalysisRequest(String);

impl AnalysisRequest {
    /// Validates and trims user input.
    ///
    /// # Errors
    ///
    /// Returns [`MoodlensError::InvalidInput`] when the text is empty after
    /// trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MoodlensError::invalid_input(
                "text to analyze must not be empty",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AnalysisRequest {
    type Error = MoodlensError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AnalysisRequest> for String {
    fn from(request: AnalysisRequest) -> Self {
        request.0
    }
}

impl AsRef<str> for AnalysisRequest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
