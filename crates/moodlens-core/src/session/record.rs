use crate::analysis::{AnalysisRequest, AnalysisResult};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One logged round of user input plus system response.
///
/// Field names are the on-disk schema of the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// ISO-8601 timestamp of when the result was applied.
    pub timestamp: String,
    pub input: String,
    /// Rendered display text of the analysis.
    pub response: String,
    pub confidence: u32,
}

impl InteractionRecord {
    /// Builds a record stamped with the current local time.
    pub fn new(request: &AnalysisRequest, result: &AnalysisResult) -> Self {
        Self::at(Local::now(), request, result)
    }

    /// Builds a record with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Local>,
        request: &AnalysisRequest,
        result: &AnalysisResult,
    ) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339(),
            input: request.as_str().to_string(),
            response: result.display_text.clone(),
            confidence: result.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_response;
    use chrono::TimeZone;

    #[test]
    fn test_record_copies_result_fields() {
        let request = AnalysisRequest::new(" great day ").unwrap();
        let result = parse_response("CONFIDENCE_SCORE: 91\nSENTIMENT: positive\nANALYSIS: upbeat");
        let stamp = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        let record = InteractionRecord::at(stamp, &request, &result);

        assert_eq!(record.input, "great day");
        assert_eq!(record.confidence, 91);
        assert_eq!(record.response, result.display_text);
        assert!(record.timestamp.starts_with("2024-05-01T09:30:00"));
    }

    #[test]
    fn test_serialized_field_names() {
        let request = AnalysisRequest::new("meh").unwrap();
        let record = InteractionRecord::new(&request, &AnalysisResult::failed("offline"));
        let value = serde_json::to_value(&record).unwrap();

        let object = value.as_object().unwrap();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["confidence", "input", "response", "timestamp"]);
        assert_eq!(object["confidence"], 0);
    }
}
