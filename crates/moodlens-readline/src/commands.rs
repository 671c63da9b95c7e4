//! REPL line classification.

use std::path::PathBuf;

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &["/save", "/history", "/help"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text to analyze.
    Analyze(String),
    /// Save the log, optionally to a different file.
    Save(Option<PathBuf>),
    History,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            return Self::Analyze(trimmed.to_string());
        }

        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        match command {
            "/save" if rest.is_empty() => Self::Save(None),
            "/save" => Self::Save(Some(PathBuf::from(rest))),
            "/history" => Self::History,
            "/help" => Self::Help,
            other => Self::Unknown(other.to_string()),
        }
    }
}
