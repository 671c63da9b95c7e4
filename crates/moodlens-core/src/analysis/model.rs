//! Analysis result types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// Confidence assumed when the reply carries no usable score.
pub const DEFAULT_CONFIDENCE: u32 = 50;
/// Confidence reported when the remote call failed.
pub const FAILURE_CONFIDENCE: u32 = 0;

/// Prefix of the display text produced for a failed remote call.
const FAILURE_PREFIX: &str = "Sorry, I encountered an error: ";

/// Categorical polarity of the analyzed text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Coarse banding of a confidence score, used to color the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfidenceLevel {
    /// 80 and above
    High,
    /// 50 to 79
    Medium,
    /// Below 50
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Self::High
        } else if score >= 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Whether a result came from a parsed model reply or a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Parsed,
    Failed { reason: String },
}

/// The renderable result of one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Score reported by the model. Not clamped to 0-100.
    pub confidence: u32,
    /// Text following `SENTIMENT:` in the reply, if present.
    pub sentiment_label: Option<String>,
    /// Text following `ANALYSIS:` in the reply, if present.
    pub analysis_text: Option<String>,
    /// Cleaned multi-line text shown to the user.
    pub display_text: String,
    pub outcome: AnalysisOutcome,
}

impl AnalysisResult {
    /// Builds the fail-soft result for a remote call that did not succeed.
    pub fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            confidence: FAILURE_CONFIDENCE,
            sentiment_label: None,
            analysis_text: None,
            display_text: format!("{FAILURE_PREFIX}{reason}"),
            outcome: AnalysisOutcome::Failed { reason },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, AnalysisOutcome::Failed { .. })
    }

    /// Typed sentiment, when the reply's label is one of the known ones.
    ///
    /// Surrounding punctuation and case are ignored, so `"Positive."` maps
    /// to [`Sentiment::Positive`].
    pub fn sentiment(&self) -> Option<Sentiment> {
        let label = self.sentiment_label.as_deref()?;
        let word = label.trim().trim_matches(|c: char| !c.is_alphanumeric());
        Sentiment::from_str(word).ok()
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }
}
