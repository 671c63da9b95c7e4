//! Parser for the model's semi-structured reply.
//!
//! Expected grammar (line oriented, every line optional):
//!
//! ```text
//! CONFIDENCE_SCORE: <integer>
//! SENTIMENT: <positive|negative|neutral>
//! ANALYSIS: <free text, may span multiple lines>
//! ```

use super::model::{AnalysisOutcome, AnalysisResult, DEFAULT_CONFIDENCE};
use once_cell::sync::Lazy;
use regex::Regex;

static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CONFIDENCE_SCORE:\s*(\d+)").expect("valid confidence regex"));

static CONFIDENCE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CONFIDENCE_SCORE:\s*\d+\s*(?:\n|$)").expect("valid confidence line regex")
});

static SENTIMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SENTIMENT:\s*").expect("valid sentiment regex"));

static ANALYSIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ANALYSIS:\s*").expect("valid analysis regex"));

static SENTIMENT_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SENTIMENT:[ \t]*([^\n]*)").expect("valid sentiment value regex"));

static ANALYSIS_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)ANALYSIS:\s*(.*)").expect("valid analysis value regex"));

/// Parses a raw model reply into a renderable result.
///
/// Never fails. A missing or unparseable score yields
/// [`DEFAULT_CONFIDENCE`]; scores above 100 are passed through as-is.
/// The display text drops every confidence line and rewrites the first
/// `SENTIMENT:` and `ANALYSIS:` markers into `Sentiment: ` and
/// `\nAnalysis: `; later repeats of a marker are left untouched.
pub fn parse_response(raw: &str) -> AnalysisResult {
    let confidence = CONFIDENCE_RE
        .captures(raw)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(DEFAULT_CONFIDENCE);

    let sentiment_label = SENTIMENT_VALUE_RE
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|label| !label.is_empty());

    let analysis_text = ANALYSIS_VALUE_RE
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|text| !text.is_empty());

    let cleaned = CONFIDENCE_LINE_RE.replace_all(raw, "");
    let cleaned = SENTIMENT_RE.replacen(&cleaned, 1, "Sentiment: ");
    let cleaned = ANALYSIS_RE.replacen(&cleaned, 1, "\nAnalysis: ");

    AnalysisResult {
        confidence,
        sentiment_label,
        analysis_text,
        display_text: cleaned.trim().to_string(),
        outcome: AnalysisOutcome::Parsed,
    }
}
