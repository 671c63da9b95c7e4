use async_trait::async_trait;
use moodlens_application::{AnalysisSession, MessageSender, SessionEvent, WELCOME_MESSAGE};
use moodlens_core::analysis::Prompt;
use moodlens_core::classifier::{ClassifierError, SentimentClassifier};
use moodlens_core::config::ApplyOrder;
use moodlens_core::session::{SessionLog, SessionLogRepository};
use moodlens_infrastructure::JsonSessionLogRepository;
use moodlens_interaction::SentimentAnalyzer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::oneshot;

/// Classifier whose replies are released one by one by the test.
struct GatedClassifier {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<String, ClassifierError>>>>,
}

impl GatedClassifier {
    fn new() -> Self {
        Self {
            gates: Mutex::new(HashMap::new()),
        }
    }

    fn gate(&self, text: &str) -> oneshot::Sender<Result<String, ClassifierError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(text.to_string(), rx);
        tx
    }
}

#[async_trait]
impl SentimentClassifier for GatedClassifier {
    fn name(&self) -> &str {
        "gated"
    }

    async fn classify(&self, prompt: &Prompt) -> Result<String, ClassifierError> {
        let gate = {
            let mut gates = self.gates.lock().unwrap();
            let key = gates
                .keys()
                .find(|key| prompt.as_str().contains(&format!("\"{key}\"")))
                .cloned()
                .expect("every submitted text has a gate");
            gates.remove(&key).unwrap()
        };
        gate.await.unwrap_or(Err(ClassifierError::EmptyResponse))
    }
}

fn reply(confidence: u32, sentiment: &str) -> Result<String, ClassifierError> {
    Ok(format!(
        "CONFIDENCE_SCORE: {confidence}\nSENTIMENT: {sentiment}\nANALYSIS: scripted"
    ))
}

async fn next_completed(events: &mut UnboundedReceiver<SessionEvent>) -> (u64, u32) {
    loop {
        match events.recv().await.expect("event stream ended early") {
            SessionEvent::Completed {
                sequence,
                confidence,
                ..
            } => return (sequence, confidence),
            _ => continue,
        }
    }
}

fn start_session(
    classifier: Arc<GatedClassifier>,
    order: ApplyOrder,
    dir: &TempDir,
) -> (AnalysisSession, UnboundedReceiver<SessionEvent>) {
    let repository = Arc::new(JsonSessionLogRepository::new(
        dir.path().join("chat_history.json"),
    ));
    AnalysisSession::start(
        SentimentAnalyzer::new(classifier),
        repository,
        order,
        SessionLog::new(),
    )
}

fn inputs(log: &SessionLog) -> Vec<String> {
    log.iter().map(|record| record.input.clone()).collect()
}

#[tokio::test]
async fn test_submission_order_is_preserved_when_second_finishes_first() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(GatedClassifier::new());
    let first_gate = classifier.gate("first message");
    let second_gate = classifier.gate("second message");
    let (session, mut events) = start_session(classifier, ApplyOrder::Submission, &dir);

    assert_eq!(session.submit("first message").unwrap(), 0);
    assert_eq!(session.submit("second message").unwrap(), 1);

    second_gate.send(reply(20, "negative")).unwrap();
    tokio::task::yield_now().await;
    first_gate.send(reply(90, "positive")).unwrap();

    assert_eq!(next_completed(&mut events).await, (0, 90));
    assert_eq!(next_completed(&mut events).await, (1, 20));

    let log = session.shutdown().await;
    assert_eq!(inputs(&log), vec!["first message", "second message"]);
}

#[tokio::test]
async fn test_completion_order_reproduces_reordering_hazard() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(GatedClassifier::new());
    let first_gate = classifier.gate("first message");
    let second_gate = classifier.gate("second message");
    let (session, mut events) = start_session(classifier, ApplyOrder::Completion, &dir);

    session.submit("first message").unwrap();
    session.submit("second message").unwrap();

    second_gate.send(reply(20, "negative")).unwrap();
    assert_eq!(next_completed(&mut events).await, (1, 20));

    first_gate.send(reply(90, "positive")).unwrap();
    assert_eq!(next_completed(&mut events).await, (0, 90));

    let log = session.shutdown().await;
    assert_eq!(inputs(&log), vec!["second message", "first message"]);
}

#[tokio::test]
async fn test_events_follow_render_order() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(GatedClassifier::new());
    let gate = classifier.gate("hello there");
    let (session, mut events) = start_session(classifier, ApplyOrder::Submission, &dir);

    match events.recv().await.unwrap() {
        SessionEvent::Message(entry) => {
            assert_eq!(entry.sender, MessageSender::Assistant);
            assert_eq!(entry.message, WELCOME_MESSAGE);
        }
        other => panic!("Expected welcome message, got {other:?}"),
    }

    session.submit("  hello there  ").unwrap();

    match events.recv().await.unwrap() {
        SessionEvent::Message(entry) => {
            assert_eq!(entry.sender, MessageSender::User);
            assert_eq!(entry.message, "hello there");
        }
        other => panic!("Expected user echo, got {other:?}"),
    }
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Pending { sequence: 0 }
    );

    gate.send(reply(81, "positive")).unwrap();
    match events.recv().await.unwrap() {
        SessionEvent::Completed { entry, record, .. } => {
            assert_eq!(entry.sender, MessageSender::Assistant);
            assert!(entry.message.starts_with("Sentiment: positive"));
            assert_eq!(record.input, "hello there");
            assert_eq!(record.confidence, 81);
        }
        other => panic!("Expected completion, got {other:?}"),
    }

    session.shutdown().await;
}

#[tokio::test]
async fn test_empty_submission_is_rejected_without_events() {
    let dir = TempDir::new().unwrap();
    let (session, mut events) =
        start_session(Arc::new(GatedClassifier::new()), ApplyOrder::Submission, &dir);
    events.recv().await.unwrap(); // welcome

    let err = session.submit("   ").unwrap_err();
    assert!(err.is_invalid_input());

    let log = session.shutdown().await;
    assert!(log.is_empty());
    assert!(events.recv().await.is_none());
}

#[tokio::test]
async fn test_remote_failure_is_logged_with_zero_confidence_and_saved() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(GatedClassifier::new());
    let gate = classifier.gate("doomed");
    let (session, mut events) = start_session(classifier, ApplyOrder::Submission, &dir);

    session.submit("doomed").unwrap();
    gate.send(Err(ClassifierError::Request {
        message: "dns failure".into(),
        is_retryable: true,
    }))
    .unwrap();
    assert_eq!(next_completed(&mut events).await, (0, 0));

    session.save().await.unwrap();
    let saved = JsonSessionLogRepository::new(dir.path().join("chat_history.json"))
        .load()
        .await
        .unwrap();
    assert_eq!(saved, session.snapshot().await);
    assert!(saved.records()[0].response.contains("dns failure"));

    session.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_call_does_not_hold_back_later_results() {
    let dir = TempDir::new().unwrap();
    let classifier = Arc::new(GatedClassifier::new());
    // Kept alive and never answered.
    let _hung_gate = classifier.gate("hung");
    let fast_gate = classifier.gate("fast");
    let (session, mut events) = start_session(classifier, ApplyOrder::Submission, &dir);

    session.submit("hung").unwrap();
    session.submit("fast").unwrap();
    fast_gate.send(reply(75, "positive")).unwrap();

    assert_eq!(next_completed(&mut events).await, (0, 0));
    assert_eq!(next_completed(&mut events).await, (1, 75));

    let log = session.shutdown().await;
    assert_eq!(inputs(&log), vec!["hung", "fast"]);
    assert!(log.records()[0].response.contains("timed out"));
}
