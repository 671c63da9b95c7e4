//! Ordering of completed analyses before they are applied.

use moodlens_core::analysis::{AnalysisRequest, AnalysisResult};
use moodlens_core::config::ApplyOrder;
use std::collections::BTreeMap;

/// A finished background analysis, tagged with its submission number.
#[derive(Debug, Clone)]
pub struct CompletedAnalysis {
    pub sequence: u64,
    pub request: AnalysisRequest,
    pub result: AnalysisResult,
}

/// Decides when each completed analysis may be applied.
///
/// With [`ApplyOrder::Submission`] a completion is held until every lower
/// sequence number has been released, so the log always matches the order
/// in which the user submitted. [`ApplyOrder::Completion`] releases
/// everything immediately.
#[derive(Debug)]
pub struct ResultSequencer {
    order: ApplyOrder,
    next_sequence: u64,
    held: BTreeMap<u64, CompletedAnalysis>,
}

impl ResultSequencer {
    pub fn new(order: ApplyOrder) -> Self {
        Self {
            order,
            next_sequence: 0,
            held: BTreeMap::new(),
        }
    }

    /// Accepts one completion and returns those now ready, in apply order.
    pub fn push(&mut self, completed: CompletedAnalysis) -> Vec<CompletedAnalysis> {
        if self.order == ApplyOrder::Completion {
            return vec![completed];
        }

        if completed.sequence < self.next_sequence {
            tracing::warn!(
                sequence = completed.sequence,
                "Dropping completion for an already applied sequence"
            );
            return Vec::new();
        }

        self.held.insert(completed.sequence, completed);

        let mut ready = Vec::new();
        while let Some(next) = self.held.remove(&self.next_sequence) {
            ready.push(next);
            self.next_sequence += 1;
        }

        if !self.held.is_empty() {
            tracing::debug!(
                waiting_for = self.next_sequence,
                held = self.held.len(),
                "Holding out-of-order completions"
            );
        }
        ready
    }

    /// Number of completions waiting on an earlier submission.
    pub fn held_len(&self) -> usize {
        self.held.len()
    }
}
