//! Terminal rendering of transcript entries and the confidence meter.

use colored::{ColoredString, Colorize};
use moodlens_application::{MessageSender, PENDING_MESSAGE, TranscriptEntry};
use moodlens_core::analysis::ConfidenceLevel;
use moodlens_core::session::InteractionRecord;

pub const METER_WIDTH: usize = 20;

/// Fixed-width bar; scores above 100 render as a full bar.
pub fn meter_bar(confidence: u32) -> String {
    let filled = (confidence.min(100) as usize * METER_WIDTH) / 100;
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(METER_WIDTH - filled)
    )
}

pub fn confidence_label(confidence: u32) -> String {
    format!("Confidence Score: {confidence}%")
}

fn tint(text: String, level: ConfidenceLevel) -> ColoredString {
    match level {
        ConfidenceLevel::High => text.green(),
        ConfidenceLevel::Medium => text.yellow(),
        ConfidenceLevel::Low => text.red(),
    }
}

pub fn render_meter(confidence: u32, level: ConfidenceLevel) -> String {
    format!(
        "[{}] {}",
        tint(meter_bar(confidence), level),
        confidence_label(confidence).bold()
    )
}

fn entry_header(entry: &TranscriptEntry) -> String {
    let sender = match entry.sender {
        MessageSender::User => entry.sender.to_string().bright_blue().bold(),
        MessageSender::Assistant => entry.sender.to_string().green().bold(),
    };
    format!("{} {}", sender, format!("({})", entry.time).bright_black())
}

/// One-based tag shared by a submission's placeholder and its result.
pub fn submission_tag(sequence: u64) -> String {
    format!("#{}", sequence + 1)
}

pub fn render_entry(entry: &TranscriptEntry) -> String {
    format!("{}\n{}", entry_header(entry), entry.message)
}

pub fn render_pending(sequence: u64) -> String {
    format!("{} {}", PENDING_MESSAGE.bright_black(), submission_tag(sequence))
}

pub fn render_completed(sequence: u64, entry: &TranscriptEntry) -> String {
    format!(
        "{} {}\n{}",
        entry_header(entry),
        submission_tag(sequence).bright_black(),
        entry.message
    )
}

pub fn render_record(index: usize, record: &InteractionRecord) -> String {
    format!(
        "{:>3}. {} {:>3}%  {}",
        index + 1,
        record.timestamp.bright_black(),
        record.confidence,
        record.input
    )
}

pub fn help_text() -> &'static str {
    "Type any text to analyze its sentiment.\n\
     /save [path]  write the session history (default: configured history file)\n\
     /history      list analyses recorded this session\n\
     /help         show this help\n\
     quit, exit    leave"
}
