//! Fail-soft sentiment analysis over a remote classifier.

use moodlens_core::analysis::{AnalysisRequest, AnalysisResult, build_prompt, parse_response};
use moodlens_core::classifier::{ClassifierError, SentimentClassifier};
use std::sync::Arc;
use std::time::Duration;

/// Runs one request through prompt building, the remote call and parsing.
///
/// [`SentimentAnalyzer::analyze`] never returns an error: any failure of the
/// remote call becomes an [`AnalysisResult::failed`] with confidence 0, so
/// the caller always has something to render.
#[derive(Clone)]
pub struct SentimentAnalyzer {
    classifier: Arc<dyn SentimentClassifier>,
    timeout: Option<Duration>,
}

impl SentimentAnalyzer {
    pub fn new(classifier: Arc<dyn SentimentClassifier>) -> Self {
        Self {
            classifier,
            timeout: None,
        }
    }

    /// Bounds every remote call; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let prompt = build_prompt(request);

        let reply = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, self.classifier.classify(&prompt)).await
            {
                Ok(reply) => reply,
                Err(_) => Err(ClassifierError::Timeout(limit)),
            },
            None => self.classifier.classify(&prompt).await,
        };

        match reply {
            Ok(text) => {
                let result = parse_response(&text);
                tracing::info!(
                    classifier = self.classifier.name(),
                    confidence = result.confidence,
                    sentiment = result.sentiment_label.as_deref().unwrap_or("-"),
                    "Analysis completed"
                );
                result
            }
            Err(err) => {
                tracing::warn!(
                    classifier = self.classifier.name(),
                    retryable = err.is_retryable(),
                    "Remote classification failed: {}",
                    err
                );
                AnalysisResult::failed(err.to_string())
            }
        }
    }
}
