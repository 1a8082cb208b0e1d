//! The `ContentFilter` facade
//!
//! One explicitly constructed filter instance serves the whole process; it is
//! passed by handle, never reached through a global. Classification is
//! synchronous and non-cancellable: the verdict must resolve before the
//! caller can answer the end user. Only the retention purge and review
//! notification run in the background.

use chrono::Utc;
use guardline_classify::{
    matcher, ContextDisambiguator, PatternSpec, PatternStore, RiskModel, WeightedHeuristicModel,
};
use guardline_core::{content_hash, Analysis, Category, Result};
use guardline_telemetry::{
    export_analyses, export_retention, optimize_thresholds, pattern_effectiveness, report,
    AnalysisHistory, AnalyticsReport, ExportFormat, FalsePositiveOutcome, FilterMetrics,
    MetricsSnapshot, PatternStats, RetentionStore, ReviewNotifier, ReviewSink,
    ThresholdRecommendation, TracingReviewSink,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::{EngineConfig, EngineLimits};
use crate::decision::{self, DecisionKind, DecisionThresholds};
use crate::responses::ResponseCatalog;

/// Outcome of one classification call
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Whether the content passes
    pub is_safe: bool,

    /// Replacement message for blocked/crisis content; `None` when safe
    pub response: Option<String>,

    /// The full analysis record
    pub analysis: Analysis,
}

/// The content risk classification and crisis-escalation engine
pub struct ContentFilter {
    store: PatternStore,
    model: Box<dyn RiskModel>,
    disambiguator: ContextDisambiguator,
    thresholds: DecisionThresholds,
    responses: ResponseCatalog,
    metrics: FilterMetrics,
    history: AnalysisHistory,
    retention: Arc<RetentionStore>,
    notifier: ReviewNotifier,
    purge_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
    limits: EngineLimits,
}

impl ContentFilter {
    /// Construct with the default scoring model and a logging review sink
    pub fn new(config: EngineConfig) -> Result<Self> {
        let model = Box::new(WeightedHeuristicModel::new(&config.classify));
        Self::with_parts(config, model, Arc::new(TracingReviewSink))
    }

    /// Construct with a substituted scoring model and review sink
    pub fn with_parts(
        config: EngineConfig,
        model: Box<dyn RiskModel>,
        sink: Arc<dyn ReviewSink>,
    ) -> Result<Self> {
        let store = PatternStore::load(&config.classify)?;
        let disambiguator = ContextDisambiguator::new(&config.classify);
        let responses = ResponseCatalog::new(config.responses)?;
        let limits = config.limits;

        info!(
            keywords = store.keyword_count(),
            patterns = store.pattern_count(),
            model = model.name(),
            "content filter initialized"
        );

        Ok(Self {
            store,
            model,
            disambiguator,
            thresholds: config.thresholds,
            responses,
            metrics: FilterMetrics::new(),
            history: AnalysisHistory::new(limits.history_capacity, limits.history_trim_to),
            retention: Arc::new(RetentionStore::new(limits.retention_ttl_days)),
            notifier: ReviewNotifier::new(sink),
            purge_task: Mutex::new(None),
            limits,
        })
    }

    /// Classify a message. Applied symmetrically to inbound user text and
    /// outbound generated text.
    pub fn classify(&self, message: &str, persona: &str, user_id: Option<&str>) -> Verdict {
        let start = Instant::now();

        let scanned = truncate_chars(message, self.limits.max_message_chars);
        if scanned.len() < message.len() {
            warn!(
                original_chars = message.chars().count(),
                cap = self.limits.max_message_chars,
                "oversized message truncated before scanning"
            );
        }

        let snapshot = self.store.snapshot();
        let matches = matcher::scan(scanned, &snapshot);

        // Crisis bypasses scoring and disambiguation entirely
        let (ml_score, override_allowed) = if matches.has_crisis() {
            (1.0, false)
        } else {
            (
                self.model.score(scanned, &matches),
                self.disambiguator
                    .allows_override(scanned, &matches, &snapshot.context_categories),
            )
        };

        let decision = decision::decide(&matches, ml_score, override_allowed, &self.thresholds);

        let analysis = Analysis {
            message_hash: content_hash(message),
            is_safe: decision.is_safe(),
            risk_level: decision.risk_level(),
            confidence: decision.confidence(ml_score),
            categories: matches.categories,
            keywords_matched: matches.keywords,
            patterns_matched: matches.patterns,
            ml_score,
            analysis_duration_us: start.elapsed().as_micros() as u64,
            created_at: Utc::now(),
        };

        match decision.kind() {
            DecisionKind::Crisis => error!(
                hash = %analysis.message_hash,
                "crisis intervention triggered"
            ),
            DecisionKind::Blocked => warn!(
                hash = %analysis.message_hash,
                risk = analysis.risk_level.label(),
                "content blocked"
            ),
            DecisionKind::Safe => {}
        }

        self.metrics.record(&analysis);
        self.history.push(analysis.clone());

        if let Some(record) = self.retention.schedule_review(&analysis, user_id) {
            self.notifier.notify(record);
        }

        let response = self.responses.select(decision.kind(), persona);

        Verdict {
            is_safe: analysis.is_safe,
            response,
            analysis,
        }
    }

    /// Classify possibly-invalid UTF-8. Malformed bytes are replaced, never
    /// an error: scanning a degraded message is preferable to failing open.
    pub fn classify_bytes(&self, bytes: &[u8], persona: &str, user_id: Option<&str>) -> Verdict {
        self.classify(&String::from_utf8_lossy(bytes), persona, user_id)
    }

    // ---- admin surface -------------------------------------------------

    /// Add keywords to a category
    pub fn add_keywords(&self, category: Category, words: &[String]) -> Result<()> {
        self.store.add_keywords(category, words)
    }

    /// Remove keywords from a category
    pub fn remove_keywords(&self, category: Category, words: &[String]) -> Result<()> {
        self.store.remove_keywords(category, words)
    }

    /// Add a regex pattern; invalid regex is rejected, store unchanged
    pub fn add_pattern(&self, spec: PatternSpec) -> Result<()> {
        self.store.add_pattern(spec)
    }

    /// Remove a pattern by expression
    pub fn remove_pattern(&self, expression: &str) -> bool {
        self.store.remove_pattern(expression)
    }

    /// Report a blocked message as a false positive.
    ///
    /// Returns false when the hash is unknown. Idempotent per hash: the
    /// false-positive counter is incremented at most once.
    pub fn report_false_positive(&self, message_hash: &str, feedback: Option<&str>) -> bool {
        match self.history.record_false_positive(message_hash) {
            FalsePositiveOutcome::Recorded => {
                self.metrics.record_false_positive();
                info!(
                    hash = %message_hash,
                    feedback = feedback.unwrap_or(""),
                    "false positive reported"
                );
                true
            }
            FalsePositiveOutcome::AlreadyReported => true,
            FalsePositiveOutcome::UnknownHash => false,
        }
    }

    /// Export buffered analyses as JSON or CSV
    pub fn export_analysis(&self, format: ExportFormat) -> Result<String> {
        export_analyses(&self.history.snapshot(), format)
    }

    /// Export retention records as JSON or CSV
    pub fn export_retention(&self, format: ExportFormat) -> Result<String> {
        export_retention(&self.retention.records(), format)
    }

    /// Analytics over the last `hours` from the history buffer
    pub fn get_analytics(&self, hours: i64) -> Result<AnalyticsReport> {
        report(&self.history, chrono::Duration::hours(hours))
    }

    /// Per-pattern match/block effectiveness from the history buffer
    pub fn get_pattern_effectiveness(&self) -> BTreeMap<String, PatternStats> {
        pattern_effectiveness(&self.history)
    }

    /// Threshold tuning recommendation; requires a minimum sample size
    pub fn optimize_thresholds(&self) -> Result<ThresholdRecommendation> {
        optimize_thresholds(
            &self.history,
            self.metrics.snapshot().false_positive_count,
        )
    }

    /// Purge retention records flagged more than `days` days ago
    pub fn purge_old_moderation_data(&self, days: u32) -> usize {
        self.retention.purge_older_than(days)
    }

    /// Current metrics snapshot
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Reset all metrics counters
    pub fn reset_metrics(&self) {
        self.metrics.reset()
    }

    // ---- lifecycle -----------------------------------------------------

    /// Start the periodic retention purge. Must be called from within a
    /// tokio runtime; calling twice is a no-op.
    pub fn start_purge_task(&self) {
        let mut task = self.purge_task.lock();
        if task.is_some() {
            warn!("purge task already running");
            return;
        }

        *task = Some(guardline_telemetry::spawn_purge_task(
            self.retention.clone(),
            self.limits.retention_ttl_days,
            Duration::from_secs(self.limits.purge_interval_secs),
        ));
    }

    /// Stop background work. The filter remains usable for classification.
    pub fn shutdown(&self) {
        if let Some(task) = self.purge_task.lock().take() {
            task.abort();
        }
        self.notifier.shutdown();
        info!("content filter shut down");
    }
}

/// Truncate on a character boundary
fn truncate_chars(message: &str, max_chars: usize) -> &str {
    match message.char_indices().nth(max_chars) {
        Some((index, _)) => &message[..index],
        None => message,
    }
}
