use moodlens_core::analysis::{AnalysisRequest, AnalysisResult, parse_response};
use moodlens_core::session::{InteractionRecord, SessionLog, SessionLogRepository};
use moodlens_infrastructure::JsonSessionLogRepository;
use tempfile::TempDir;

#[tokio::test]
async fn test_append_save_reload_reproduces_sequence() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonSessionLogRepository::new(temp_dir.path().join("chat_history.json"));

    let mut log = SessionLog::new();
    let inputs = [
        ("I adore this café ☕", "CONFIDENCE_SCORE: 93\nSENTIMENT: positive\nANALYSIS: Warm."),
        ("It is Tuesday.", "SENTIMENT: neutral\nANALYSIS: Factual statement."),
        ("Worst. Day. Ever.", "CONFIDENCE_SCORE: 150\nSENTIMENT: negative\nANALYSIS: \"Emphatic\"\nline two"),
    ];
    for (text, reply) in inputs {
        let request = AnalysisRequest::new(text).unwrap();
        log.append(InteractionRecord::new(&request, &parse_response(reply)));
    }
    let request = AnalysisRequest::new("offline attempt").unwrap();
    log.append(InteractionRecord::new(
        &request,
        &AnalysisResult::failed("network unreachable"),
    ));

    repo.save(&log).await.unwrap();
    let reloaded = repo.load().await.unwrap();

    assert_eq!(reloaded, log);
    let confidences: Vec<_> = reloaded.iter().map(|r| r.confidence).collect();
    assert_eq!(confidences, vec![93, 50, 150, 0]);
}

#[tokio::test]
async fn test_save_to_unwritable_path_propagates() {
    let temp_dir = TempDir::new().unwrap();
    // A regular file where a directory is expected.
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "file").unwrap();
    let repo = JsonSessionLogRepository::new(blocker.join("chat_history.json"));

    let err = repo.save(&SessionLog::new()).await.unwrap_err();
    assert!(err.is_io());
}

#[tokio::test]
async fn test_file_is_plain_json_array_of_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("chat_history.json");
    let repo = JsonSessionLogRepository::new(&path);

    let request = AnalysisRequest::new("ok").unwrap();
    let log = SessionLog::from_records(vec![InteractionRecord::new(
        &request,
        &parse_response("CONFIDENCE_SCORE: 61\nSENTIMENT: neutral\nANALYSIS: fine"),
    )]);
    repo.save(&log).await.unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["input"], "ok");
    assert_eq!(array[0]["confidence"], 61);
    assert!(array[0]["timestamp"].is_string());
}
