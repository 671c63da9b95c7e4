//! Analysis session use case.
//!
//! Coordinates one interactive surface with any number of in-flight
//! analyses. Every submission runs on its own tokio task; finished results
//! funnel through a single consumer task, which is the only writer of the
//! session log.

use crate::sequencer::{CompletedAnalysis, ResultSequencer};
use crate::transcript::{MessageSender, SessionEvent, TranscriptEntry, WELCOME_MESSAGE};
use moodlens_core::analysis::{AnalysisRequest, AnalysisResult};
use moodlens_core::config::{ApplyOrder, DEFAULT_SUBMISSION_TIMEOUT_SECS};
use moodlens_core::error::Result;
use moodlens_core::session::{InteractionRecord, SessionLog, SessionLogRepository};
use moodlens_interaction::SentimentAnalyzer;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub struct AnalysisSession {
    analyzer: SentimentAnalyzer,
    repository: Arc<dyn SessionLogRepository>,
    log: Arc<Mutex<SessionLog>>,
    next_sequence: AtomicU64,
    completed_tx: UnboundedSender<CompletedAnalysis>,
    events_tx: UnboundedSender<SessionEvent>,
    consumer: JoinHandle<()>,
}

impl AnalysisSession {
    /// Starts a session and its result consumer.
    ///
    /// Must be called from within a tokio runtime. `initial` seeds the log,
    /// e.g. with a previously saved history. The returned receiver yields
    /// the welcome message first, then every event in render order.
    ///
    /// Under [`ApplyOrder::Submission`] an analyzer without a timeout gets
    /// [`DEFAULT_SUBMISSION_TIMEOUT_SECS`], since a call that never returns
    /// would otherwise hold back every later result and block `shutdown`.
    pub fn start(
        analyzer: SentimentAnalyzer,
        repository: Arc<dyn SessionLogRepository>,
        order: ApplyOrder,
        initial: SessionLog,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let log = Arc::new(Mutex::new(initial));
        let analyzer = bound_for_order(analyzer, order);

        let _ = events_tx.send(SessionEvent::Message(TranscriptEntry::now(
            MessageSender::Assistant,
            WELCOME_MESSAGE,
        )));

        let consumer = tokio::spawn(apply_results(
            completed_rx,
            ResultSequencer::new(order),
            Arc::clone(&log),
            events_tx.clone(),
        ));

        tracing::info!(%order, "[AnalysisSession] Session started");

        let session = Self {
            analyzer,
            repository,
            log,
            next_sequence: AtomicU64::new(0),
            completed_tx,
            events_tx,
            consumer,
        };
        (session, events_rx)
    }

    /// Accepts one user submission and starts analyzing it in the background.
    ///
    /// Returns the submission's sequence number. Empty or blank text is
    /// rejected with `InvalidInput` before anything is emitted.
    pub fn submit(&self, text: &str) -> Result<u64> {
        let request = AnalysisRequest::new(text)?;
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);

        let _ = self.events_tx.send(SessionEvent::Message(TranscriptEntry::now(
            MessageSender::User,
            request.as_str(),
        )));
        let _ = self.events_tx.send(SessionEvent::Pending { sequence });

        tracing::debug!(sequence, "[AnalysisSession] Submission accepted");

        let analyzer = self.analyzer.clone();
        let completed_tx = self.completed_tx.clone();
        tokio::spawn(async move {
            let task_request = request.clone();
            let result = tokio::spawn(async move { analyzer.analyze(&task_request).await })
                .await
                .unwrap_or_else(|err| {
                    tracing::error!(sequence, "[AnalysisSession] Analysis task aborted: {}", err);
                    AnalysisResult::failed(format!("analysis task aborted: {err}"))
                });

            let _ = completed_tx.send(CompletedAnalysis {
                sequence,
                request,
                result,
            });
        });

        Ok(sequence)
    }

    /// Copy of the log as it stands now.
    pub async fn snapshot(&self) -> SessionLog {
        self.log.lock().await.clone()
    }

    /// Writes the current log through the session's repository.
    pub async fn save(&self) -> Result<()> {
        self.save_to(self.repository.as_ref()).await
    }

    /// Writes the current log through another repository (e.g. "save as").
    pub async fn save_to(&self, repository: &dyn SessionLogRepository) -> Result<()> {
        let snapshot = self.snapshot().await;
        repository.save(&snapshot).await.inspect_err(|err| {
            tracing::error!("[AnalysisSession] Failed to save session log: {}", err);
        })
    }

    /// Waits for every in-flight analysis to be applied and returns the
    /// final log.
    pub async fn shutdown(self) -> SessionLog {
        let Self {
            log,
            completed_tx,
            events_tx,
            consumer,
            ..
        } = self;

        drop(completed_tx);
        drop(events_tx);
        if let Err(err) = consumer.await {
            tracing::error!("[AnalysisSession] Result consumer failed: {}", err);
        }

        let final_log = log.lock().await.clone();
        tracing::info!(records = final_log.len(), "[AnalysisSession] Session closed");
        final_log
    }
}

fn bound_for_order(analyzer: SentimentAnalyzer, order: ApplyOrder) -> SentimentAnalyzer {
    if order != ApplyOrder::Submission || analyzer.timeout().is_some() {
        return analyzer;
    }
    tracing::debug!(
        secs = DEFAULT_SUBMISSION_TIMEOUT_SECS,
        "[AnalysisSession] Applying default request timeout"
    );
    analyzer.with_timeout(Some(Duration::from_secs(DEFAULT_SUBMISSION_TIMEOUT_SECS)))
}

async fn apply_results(
    mut completed_rx: UnboundedReceiver<CompletedAnalysis>,
    mut sequencer: ResultSequencer,
    log: Arc<Mutex<SessionLog>>,
    events_tx: UnboundedSender<SessionEvent>,
) {
    while let Some(completed) = completed_rx.recv().await {
        for ready in sequencer.push(completed) {
            let record = InteractionRecord::new(&ready.request, &ready.result);
            log.lock().await.append(record.clone());

            tracing::debug!(
                sequence = ready.sequence,
                confidence = ready.result.confidence,
                "[AnalysisSession] Result applied"
            );

            let _ = events_tx.send(SessionEvent::Completed {
                sequence: ready.sequence,
                entry: TranscriptEntry::now(MessageSender::Assistant, ready.result.display_text.clone()),
                confidence: ready.result.confidence,
                level: ready.result.confidence_level(),
                record,
            });
        }
    }

    if sequencer.held_len() > 0 {
        tracing::warn!(
            held = sequencer.held_len(),
            "[AnalysisSession] Results left unapplied at shutdown"
        );
    }
}
