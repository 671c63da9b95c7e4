//! Transcript entries and the events the session emits to its surface.

use chrono::{DateTime, Local};
use moodlens_core::analysis::ConfidenceLevel;
use moodlens_core::session::InteractionRecord;
use std::fmt;

/// Greeting shown by the assistant when a session starts.
pub const WELCOME_MESSAGE: &str = "Welcome! I can help you analyze the sentiment of any text. \
Type your message and press Enter. I'll provide detailed sentiment analysis with confidence scoring.";

/// Placeholder shown while a request is in flight.
pub const PENDING_MESSAGE: &str = "Analyzing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSender {
    User,
    Assistant,
}

impl fmt::Display for MessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("You"),
            Self::Assistant => f.write_str("Assistant"),
        }
    }
}

/// One sender-tagged, timestamped message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub sender: MessageSender,
    /// Wall-clock time as `HH:MM`.
    pub time: String,
    pub message: String,
}

impl TranscriptEntry {
    pub fn now(sender: MessageSender, message: impl Into<String>) -> Self {
        Self::at(Local::now(), sender, message)
    }

    pub fn at(time: DateTime<Local>, sender: MessageSender, message: impl Into<String>) -> Self {
        Self {
            sender,
            time: time.format("%H:%M").to_string(),
            message: message.into(),
        }
    }
}

/// Everything the interactive surface needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A message to append as-is (welcome text, user echo).
    Message(TranscriptEntry),
    /// A request was accepted and is being analyzed.
    Pending { sequence: u64 },
    /// A result was applied to the log; replaces the matching placeholder.
    Completed {
        sequence: u64,
        entry: TranscriptEntry,
        confidence: u32,
        level: ConfidenceLevel,
        record: InteractionRecord,
    },
}
