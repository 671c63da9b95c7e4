//! Fixed-template prompt construction.

use super::request::AnalysisRequest;
use std::fmt;

/// Field marker carrying the model's certainty, 0-100.
pub const CONFIDENCE_MARKER: &str = "CONFIDENCE_SCORE:";
/// Field marker carrying the sentiment label.
pub const SENTIMENT_MARKER: &str = "SENTIMENT:";
/// Field marker carrying the free-text explanation.
pub const ANALYSIS_MARKER: &str = "ANALYSIS:";

/// An instruction string ready to be sent to the remote model.
///
/// Opaque on purpose: it can only be produced by [`build_prompt`], so the
/// template and the user text never get concatenated ad hoc elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Embeds the request text into the sentiment instruction template.
///
/// The text is inserted verbatim; the three field markers appear in the
/// template before the text, in the order the parser expects them back.
pub fn build_prompt(request: &AnalysisRequest) -> Prompt {
    let text = request.as_str();
    Prompt(format!(
        "Analyze the sentiment of the following text and provide a detailed response in this exact format:\n\
         {CONFIDENCE_MARKER} [number between 0-100]\n\
         {SENTIMENT_MARKER} [positive/negative/neutral]\n\
         {ANALYSIS_MARKER} [Your detailed analysis including key emotional indicators and explanation]\n\
         \n\
         Text to analyze: \"{text}\"\n\
         \n\
         Note: Ensure the confidence score is a single number between 0 and 100, based on how clear and strong the sentiment signals are.\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_for(text: &str) -> Prompt {
        build_prompt(&AnalysisRequest::new(text).unwrap())
    }

    #[test]
    fn test_contains_input_verbatim() {
        let text = "The \"service\" was {awful}, 100% not coming back";
        let prompt = prompt_for(text);
        assert!(prompt.as_str().contains(text));
    }

    #[test]
    fn test_markers_in_order() {
        let prompt = prompt_for("ANALYSIS: sneaky SENTIMENT: input");
        let body = prompt.as_str();
        let confidence = body.find(CONFIDENCE_MARKER).unwrap();
        let sentiment = body.find(SENTIMENT_MARKER).unwrap();
        let analysis = body.find(ANALYSIS_MARKER).unwrap();
        assert!(confidence < sentiment);
        assert!(sentiment < analysis);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(prompt_for("same text"), prompt_for("same text"));
        assert_ne!(prompt_for("one"), prompt_for("two"));
    }

    #[test]
    fn test_multiline_input_is_contiguous() {
        let text = "first line\nsecond line";
        assert!(prompt_for(text).to_string().contains(text));
    }
}
