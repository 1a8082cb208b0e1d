//! Bounded analysis history
//!
//! Ring buffer of recent `Analysis` records backing the analytics queries.
//! Capacity and trim level are configuration values; eviction is
//! oldest-first. Analytics intentionally sample this buffer rather than full
//! historical data.

use guardline_core::Analysis;
use parking_lot::RwLock;
use std::collections::{BTreeSet, VecDeque};

/// Outcome of a false-positive report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FalsePositiveOutcome {
    /// First report for this hash; the counter should be incremented
    Recorded,
    /// Hash already reported; accepted but not re-counted
    AlreadyReported,
    /// Hash not present in history; rejected
    UnknownHash,
}

/// Bounded, append-mostly history of analyses
pub struct AnalysisHistory {
    inner: RwLock<HistoryInner>,
    capacity: usize,
    trim_to: usize,
}

struct HistoryInner {
    analyses: VecDeque<Analysis>,
    false_positive_hashes: BTreeSet<String>,
}

impl AnalysisHistory {
    /// Create a history buffer. `trim_to` is clamped to `capacity`.
    pub fn new(capacity: usize, trim_to: usize) -> Self {
        Self {
            inner: RwLock::new(HistoryInner {
                analyses: VecDeque::with_capacity(capacity.min(4096)),
                false_positive_hashes: BTreeSet::new(),
            }),
            capacity: capacity.max(1),
            trim_to: trim_to.min(capacity).max(1),
        }
    }

    /// Append an analysis, evicting oldest-first past capacity
    pub fn push(&self, analysis: Analysis) {
        let mut inner = self.inner.write();
        inner.analyses.push_back(analysis);

        if inner.analyses.len() > self.capacity {
            while inner.analyses.len() > self.trim_to {
                inner.analyses.pop_front();
            }
        }
    }

    /// Whether a message hash is present in the buffer
    pub fn contains_hash(&self, message_hash: &str) -> bool {
        self.inner
            .read()
            .analyses
            .iter()
            .any(|a| a.message_hash == message_hash)
    }

    /// Record a false-positive report for a hash.
    ///
    /// Idempotent per hash: only the first report yields `Recorded`.
    pub fn record_false_positive(&self, message_hash: &str) -> FalsePositiveOutcome {
        let mut inner = self.inner.write();

        if !inner
            .analyses
            .iter()
            .any(|a| a.message_hash == message_hash)
        {
            return FalsePositiveOutcome::UnknownHash;
        }

        if inner.false_positive_hashes.insert(message_hash.to_string()) {
            FalsePositiveOutcome::Recorded
        } else {
            FalsePositiveOutcome::AlreadyReported
        }
    }

    /// Clone the current buffer contents. The lock is held only for the copy.
    pub fn snapshot(&self) -> Vec<Analysis> {
        self.inner.read().analyses.iter().cloned().collect()
    }

    /// Number of buffered analyses
    pub fn len(&self) -> usize {
        self.inner.read().analyses.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
