//! Guardline Telemetry
//!
//! Observability and compliance plumbing for the moderation engine:
//! - Atomic metrics aggregate with snapshot/reset
//! - Bounded analysis history ring buffer
//! - Rolling analytics, pattern effectiveness, threshold tuning
//! - Retention store with TTL purge and review notification
//! - JSON/CSV export

pub mod analytics;
pub mod export;
pub mod history;
pub mod metrics;
pub mod retention;

pub use analytics::{
    optimize_thresholds, pattern_effectiveness, report, AnalyticsReport, PatternStats,
    ThresholdRecommendation, MIN_OPTIMIZATION_SAMPLES,
};
pub use export::{export_analyses, export_retention, ExportFormat};
pub use history::{AnalysisHistory, FalsePositiveOutcome};
pub use metrics::{FilterMetrics, MetricsSnapshot};
pub use retention::{
    spawn_purge_task, RetentionRecord, RetentionStore, ReviewNotifier, ReviewSink, ReviewStatus,
    TracingReviewSink,
};
