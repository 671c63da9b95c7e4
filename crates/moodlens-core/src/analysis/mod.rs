//! Sentiment analysis domain: validated input, prompt construction and
//! response parsing.

pub mod model;
pub mod parser;
pub mod prompt;
pub mod request;

pub use model::{
    AnalysisOutcome, AnalysisResult, ConfidenceLevel, DEFAULT_CONFIDENCE, FAILURE_CONFIDENCE,
    Sentiment,
};
pub use parser::parse_response;
pub use prompt::{Prompt, build_prompt};
pub use request::AnalysisRequest;
