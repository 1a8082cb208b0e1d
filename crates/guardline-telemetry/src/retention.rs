//! Compliance retention lifecycle
//!
//! Hashed records of unsafe content held for a bounded review window. Only a
//! content hash and metadata are stored, never raw message text. The purge
//! cutoff is a hard compliance invariant: records past their TTL are deleted
//! regardless of review status.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use guardline_core::{Analysis, Category, Severity};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Review workflow state of a retention record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Reviewed,
    Dismissed,
}

/// A hashed, metadata-only record of unsafe content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionRecord {
    /// Unique record ID
    pub id: String,

    /// SHA-256 digest of the flagged content
    pub content_hash: String,

    /// User the content belonged to, if known
    pub user_id: Option<String>,

    /// Risk level at flag time
    pub risk_level: Severity,

    /// Categories detected at flag time
    pub categories: BTreeSet<Category>,

    /// When the content was flagged
    pub flagged_at: DateTime<Utc>,

    /// Review workflow state
    pub review_status: ReviewStatus,

    /// Hard deletion deadline
    pub auto_delete_after: DateTime<Utc>,
}

/// In-memory retention store with TTL-based purging
pub struct RetentionStore {
    records: RwLock<BTreeMap<String, RetentionRecord>>,
    ttl_days: i64,
}

impl RetentionStore {
    /// Create a store with the given TTL in days
    pub fn new(ttl_days: u32) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            ttl_days: i64::from(ttl_days),
        }
    }

    /// Default retention TTL in days
    pub const DEFAULT_TTL_DAYS: u32 = 30;

    /// Schedule an analysis for compliance review.
    ///
    /// Only High/Critical analyses are recorded; anything milder is ignored.
    /// Returns the stored record, if one was created.
    pub fn schedule_review(
        &self,
        analysis: &Analysis,
        user_id: Option<&str>,
    ) -> Option<RetentionRecord> {
        if !analysis.needs_review() {
            return None;
        }

        let now = Utc::now();
        let record = RetentionRecord {
            id: format!("ret_{}", uuid::Uuid::new_v4()),
            content_hash: analysis.message_hash.clone(),
            user_id: user_id.map(str::to_string),
            risk_level: analysis.risk_level,
            categories: analysis.categories.clone(),
            flagged_at: now,
            review_status: ReviewStatus::Pending,
            auto_delete_after: now + Duration::days(self.ttl_days),
        };

        self.records
            .write()
            .insert(record.content_hash.clone(), record.clone());

        debug!(
            hash = %record.content_hash,
            risk = record.risk_level.label(),
            "retention record scheduled for review"
        );
        Some(record)
    }

    /// Delete records flagged more than `days` days ago, and anything past
    /// its hard deadline. Returns the number purged.
    pub fn purge_older_than(&self, days: u32) -> usize {
        let now = Utc::now();
        let cutoff = now - Duration::days(i64::from(days));

        let mut records = self.records.write();
        let before = records.len();
        records.retain(|_, r| r.flagged_at > cutoff && r.auto_delete_after > now);
        let purged = before - records.len();

        if purged > 0 {
            info!(purged, days, "retention records purged");
        }
        purged
    }

    /// Mark a record reviewed. Returns whether the hash was present.
    pub fn mark_reviewed(&self, content_hash: &str) -> bool {
        self.set_status(content_hash, ReviewStatus::Reviewed)
    }

    /// Mark a record dismissed. Returns whether the hash was present.
    pub fn mark_dismissed(&self, content_hash: &str) -> bool {
        self.set_status(content_hash, ReviewStatus::Dismissed)
    }

    fn set_status(&self, content_hash: &str, status: ReviewStatus) -> bool {
        match self.records.write().get_mut(content_hash) {
            Some(record) => {
                record.review_status = status;
                true
            }
            None => false,
        }
    }

    /// Clone all current records
    pub fn records(&self) -> Vec<RetentionRecord> {
        self.records.read().values().cloned().collect()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no records are held
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Spawn the periodic purge task.
///
/// Purging is idempotent and defined by a time cutoff, so the task is safely
/// restartable if interrupted mid-run. It holds the store lock only for the
/// retain pass, never across an await.
pub fn spawn_purge_task(
    store: Arc<RetentionStore>,
    ttl_days: u32,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so startup stays cheap
        interval.tick().await;

        loop {
            interval.tick().await;
            store.purge_older_than(ttl_days);
        }
    })
}

/// Sink notified of every record scheduled for review.
///
/// Implementations may page an on-call reviewer, write to an external case
/// system, or just log.
#[async_trait]
pub trait ReviewSink: Send + Sync {
    /// Handle a newly scheduled record
    async fn notify(&self, record: &RetentionRecord);
}

/// Default sink: structured log lines only
pub struct TracingReviewSink;

#[async_trait]
impl ReviewSink for TracingReviewSink {
    async fn notify(&self, record: &RetentionRecord) {
        match record.risk_level {
            Severity::Critical => error!(
                hash = %record.content_hash,
                categories = ?record.categories,
                "CRITICAL content flagged for review"
            ),
            _ => warn!(
                hash = %record.content_hash,
                risk = record.risk_level.label(),
                "content flagged for review"
            ),
        }
    }
}

/// Commands sent to the background notifier
enum ReviewCommand {
    Notify(Box<RetentionRecord>),
    Shutdown,
}

/// Asynchronous bridge between the synchronous classification path and a
/// [`ReviewSink`]. Records are queued on an unbounded channel and drained by
/// a dedicated writer thread, so notification never blocks classification.
pub struct ReviewNotifier {
    sender: mpsc::UnboundedSender<ReviewCommand>,
}

impl ReviewNotifier {
    /// Start the notifier with the given sink
    pub fn new(sink: Arc<dyn ReviewSink>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            run_notifier(sink, receiver);
        });

        Self { sender }
    }

    /// Queue a record for notification
    pub fn notify(&self, record: RetentionRecord) {
        if let Err(e) = self.sender.send(ReviewCommand::Notify(Box::new(record))) {
            warn!("failed to queue review notification: {}", e);
        }
    }

    /// Stop the background thread after draining queued notifications
    pub fn shutdown(&self) {
        let _ = self.sender.send(ReviewCommand::Shutdown);
    }
}

impl Drop for ReviewNotifier {
    fn drop(&mut self) {
        let _ = self.sender.send(ReviewCommand::Shutdown);
    }
}

fn run_notifier(sink: Arc<dyn ReviewSink>, mut receiver: mpsc::UnboundedReceiver<ReviewCommand>) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("review notifier runtime failed to start: {}", e);
            return;
        }
    };

    rt.block_on(async {
        while let Some(cmd) = receiver.recv().await {
            match cmd {
                ReviewCommand::Notify(record) => sink.notify(&record).await,
                ReviewCommand::Shutdown => {
                    debug!("review notifier shutting down");
                    break;
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn analysis(hash: &str, risk_level: Severity, is_safe: bool) -> Analysis {
        Analysis {
            message_hash: hash.to_string(),
            is_safe,
            risk_level,
            confidence: 0.9,
            categories: [Category::Dangerous].into_iter().collect(),
            keywords_matched: Default::default(),
            patterns_matched: Default::default(),
            ml_score: 0.9,
            analysis_duration_us: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_only_high_and_critical_scheduled() {
        let store = RetentionStore::new(30);

        assert!(store
            .schedule_review(&analysis("low", Severity::Low, false), None)
            .is_none());
        assert!(store
            .schedule_review(&analysis("med", Severity::Medium, false), None)
            .is_none());
        assert!(store
            .schedule_review(&analysis("high", Severity::High, false), Some("u1"))
            .is_some());
        assert!(store
            .schedule_review(&analysis("crit", Severity::Critical, false), None)
            .is_some());

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_safe_analysis_never_scheduled() {
        let store = RetentionStore::new(30);
        assert!(store
            .schedule_review(&analysis("safe", Severity::High, true), None)
            .is_none());
    }

    #[test]
    fn test_record_holds_hash_not_content() {
        let store = RetentionStore::new(30);
        let record = store
            .schedule_review(&analysis("deadbeef", Severity::Critical, false), Some("u1"))
            .unwrap();

        assert_eq!(record.content_hash, "deadbeef");
        assert_eq!(record.user_id.as_deref(), Some("u1"));
        assert_eq!(record.review_status, ReviewStatus::Pending);
    }

    #[test]
    fn test_purge_zero_days_removes_everything() {
        let store = RetentionStore::new(30);
        store.schedule_review(&analysis("a", Severity::High, false), None);
        store.schedule_review(&analysis("b", Severity::Critical, false), None);

        assert_eq!(store.purge_older_than(0), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_keeps_young_records() {
        let store = RetentionStore::new(30);
        store.schedule_review(&analysis("young", Severity::High, false), None);

        assert_eq!(store.purge_older_than(30), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_ignores_review_status() {
        let store = RetentionStore::new(30);
        store.schedule_review(&analysis("a", Severity::High, false), None);
        store.mark_reviewed("a");

        assert_eq!(store.purge_older_than(0), 1);
    }

    #[test]
    fn test_review_status_transitions() {
        let store = RetentionStore::new(30);
        store.schedule_review(&analysis("a", Severity::High, false), None);

        assert!(store.mark_reviewed("a"));
        assert_eq!(store.records()[0].review_status, ReviewStatus::Reviewed);

        assert!(store.mark_dismissed("a"));
        assert!(!store.mark_reviewed("missing"));
    }

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
        notify_tx: mpsc::UnboundedSender<()>,
    }

    #[async_trait]
    impl ReviewSink for RecordingSink {
        async fn notify(&self, record: &RetentionRecord) {
            self.seen.lock().push(record.content_hash.clone());
            let _ = self.notify_tx.send(());
        }
    }

    #[tokio::test]
    async fn test_notifier_delivers_to_sink() {
        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
        let sink = Arc::new(RecordingSink {
            seen: Mutex::new(Vec::new()),
            notify_tx,
        });

        let notifier = ReviewNotifier::new(sink.clone());
        let store = RetentionStore::new(30);
        let record = store
            .schedule_review(&analysis("notify-me", Severity::Critical, false), None)
            .unwrap();

        notifier.notify(record);
        notify_rx.recv().await.unwrap();

        assert_eq!(sink.seen.lock().as_slice(), ["notify-me".to_string()]);
        notifier.shutdown();
    }
}
