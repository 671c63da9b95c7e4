mod commands;
mod render;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use moodlens_application::{AnalysisSession, SessionEvent};
use moodlens_core::config::ApplyOrder;
use moodlens_core::session::{SessionLog, SessionLogRepository};
use moodlens_infrastructure::{ConfigStorage, JsonSessionLogRepository, MoodlensPaths, SecretStorage};
use moodlens_interaction::{GeminiApiAgent, SentimentAnalyzer};

use crate::commands::{COMMANDS, ReplCommand};

/// Terminal sentiment analysis assistant backed by Gemini.
#[derive(Parser, Debug)]
#[command(name = "moodlens", version, about)]
struct Args {
    /// Use this directory for config, secrets, history and logs
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// History file written by /save
    #[arg(long)]
    history: Option<PathBuf>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    timeout: Option<u64>,

    /// Order results are applied in: submission or completion
    #[arg(long)]
    apply_order: Option<ApplyOrder>,

    /// Load the existing history file into this session
    #[arg(long)]
    resume: bool,

    /// Save the history when the session ends
    #[arg(long)]
    save_on_exit: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Routes tracing output to a daily log file so it never interleaves with
/// the REPL.
fn init_logging(paths: &MoodlensPaths, verbose: bool) -> Result<WorkerGuard> {
    let logs_dir = paths.logs_dir()?;
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create log directory {logs_dir:?}"))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "moodlens.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

fn print_event(event: SessionEvent) {
    match event {
        SessionEvent::Message(entry) => {
            println!("{}\n", render::render_entry(&entry));
        }
        SessionEvent::Pending { sequence } => {
            println!("{}\n", render::render_pending(sequence));
        }
        SessionEvent::Completed {
            sequence,
            entry,
            confidence,
            level,
            ..
        } => {
            println!("{}", render::render_completed(sequence, &entry));
            println!("{}\n", render::render_meter(confidence, level));
        }
    }
}

/// The main entry point for the moodlens REPL.
///
/// Sets up configuration and the Gemini agent, starts an analysis session,
/// prints session events from a background task and feeds user lines into
/// the session until the user quits.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let paths = MoodlensPaths::new(args.base_dir.as_deref());
    let _log_guard = init_logging(&paths, args.verbose)?;

    let config_storage = match &args.config {
        Some(path) => ConfigStorage::with_path(path),
        None => ConfigStorage::new(&paths)?,
    };
    let config = config_storage.load()?;

    let secret_storage = SecretStorage::new(&paths)?;
    let secrets = secret_storage.load_with_env()?;
    let agent = match GeminiApiAgent::from_secrets(&secrets) {
        Ok(agent) => agent,
        Err(err) => {
            let template = secret_storage.ensure_template()?;
            return Err(anyhow!(
                "{err}. Add your Gemini API key to {} or set GEMINI_API_KEY.",
                template.display()
            ));
        }
    };
    let agent = agent.with_model(
        args.model
            .clone()
            .unwrap_or_else(|| config.resolve_model(&secrets)),
    );

    let timeout = args
        .timeout
        .or(config.request_timeout_secs)
        .map(Duration::from_secs);
    let apply_order = args.apply_order.unwrap_or(config.apply_order);
    let history_path = match args.history.clone().or(config.history_path.clone().map(PathBuf::from)) {
        Some(path) => path,
        None => paths.history_file()?,
    };

    tracing::info!(
        model = agent.model(),
        ?timeout,
        %apply_order,
        "Starting moodlens with history file {:?}",
        history_path
    );

    // ===== Session =====
    let repository = Arc::new(JsonSessionLogRepository::new(&history_path));
    let initial = if args.resume {
        repository.load().await?
    } else {
        SessionLog::new()
    };
    let analyzer = SentimentAnalyzer::new(Arc::new(agent)).with_timeout(timeout);
    let (session, mut events) =
        AnalysisSession::start(analyzer, repository.clone(), apply_order, initial);

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            print_event(event);
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Sentiment Analysis Assistant ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands or 'quit' to exit.".bright_black());
    println!();

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            ReplCommand::Analyze(text) => {
                let _ = rl.add_history_entry(&line);
                if let Err(err) = session.submit(&text) {
                    eprintln!("{}", err.to_string().red());
                }
            }
            ReplCommand::Save(path) => {
                let save_as = path.map(JsonSessionLogRepository::new);
                let target = save_as.as_ref().unwrap_or(repository.as_ref());
                match session.save_to(target).await {
                    Ok(()) => println!(
                        "{}",
                        format!("History saved to {}", target.path().display()).green()
                    ),
                    Err(err) => eprintln!("{}", format!("Failed to save history: {err}").red()),
                }
            }
            ReplCommand::History => {
                let log = session.snapshot().await;
                if log.is_empty() {
                    println!("{}", "No analyses yet.".bright_black());
                }
                for (index, record) in log.iter().enumerate() {
                    println!("{}", render::render_record(index, record));
                }
            }
            ReplCommand::Help => println!("{}", render::help_text()),
            ReplCommand::Unknown(command) => {
                println!("{}", format!("Unknown command: {command}").bright_black());
            }
        }
    }

    // ===== Shutdown =====
    if args.save_on_exit {
        println!("{}", "Waiting for pending analyses...".bright_black());
        let final_log = session.shutdown().await;
        repository
            .save(&final_log)
            .await
            .with_context(|| format!("Failed to save history to {:?}", repository.path()))?;
        println!("{}", format!("History saved to {}", repository.path().display()).green());
        let _ = printer.await;
    } else {
        drop(session);
        printer.abort();
    }

    Ok(())
}
