use super::record::InteractionRecord;
use serde::{Deserialize, Serialize};

/// Append-only, insertion-ordered sequence of interaction records.
///
/// Records are never edited, removed or deduplicated once appended.
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    records: Vec<InteractionRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a log from previously persisted records, keeping their order.
    pub fn from_records(records: Vec<InteractionRecord>) -> Self {
        Self { records }
    }

    /// Adds a record to the end of the log.
    pub fn append(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
