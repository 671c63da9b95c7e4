//! Remote model agents and the fail-soft analyzer built on top of them.

pub mod analyzer;
pub mod gemini_api_agent;

pub use analyzer::SentimentAnalyzer;
pub use gemini_api_agent::GeminiApiAgent;
