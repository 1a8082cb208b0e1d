//! Metrics collection and reporting
//!
//! Process-wide aggregate updated after every classification. Counters never
//! decrease except on explicit reset. Persistence, if required, is an
//! external collaborator's responsibility.

use guardline_core::{Analysis, Category};
use metrics::{counter, histogram};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector for the moderation engine
#[derive(Clone)]
pub struct FilterMetrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    total_checks: AtomicU64,
    blocked_count: AtomicU64,
    false_positive_count: AtomicU64,
    total_analysis_time_us: AtomicU64,
    category_blocks: Mutex<BTreeMap<Category, u64>>,
}

impl FilterMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                total_checks: AtomicU64::new(0),
                blocked_count: AtomicU64::new(0),
                false_positive_count: AtomicU64::new(0),
                total_analysis_time_us: AtomicU64::new(0),
                category_blocks: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Record one completed analysis
    pub fn record(&self, analysis: &Analysis) {
        self.inner.total_checks.fetch_add(1, Ordering::Relaxed);
        self.inner
            .total_analysis_time_us
            .fetch_add(analysis.analysis_duration_us, Ordering::Relaxed);

        counter!("guardline_checks_total").increment(1);
        histogram!("guardline_analysis_duration_us").record(analysis.analysis_duration_us as f64);

        if !analysis.is_safe {
            self.inner.blocked_count.fetch_add(1, Ordering::Relaxed);
            counter!("guardline_blocked_total").increment(1);

            let mut blocks = self.inner.category_blocks.lock();
            for category in &analysis.categories {
                *blocks.entry(*category).or_insert(0) += 1;
            }
        }
    }

    /// Record an accepted false-positive report
    pub fn record_false_positive(&self) {
        self.inner
            .false_positive_count
            .fetch_add(1, Ordering::Relaxed);
        counter!("guardline_false_positives_total").increment(1);
    }

    /// Get a consistent snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_checks: self.inner.total_checks.load(Ordering::Relaxed),
            blocked_count: self.inner.blocked_count.load(Ordering::Relaxed),
            false_positive_count: self.inner.false_positive_count.load(Ordering::Relaxed),
            total_analysis_time_us: self.inner.total_analysis_time_us.load(Ordering::Relaxed),
            category_block_counts: self.inner.category_blocks.lock().clone(),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.inner.total_checks.store(0, Ordering::Relaxed);
        self.inner.blocked_count.store(0, Ordering::Relaxed);
        self.inner.false_positive_count.store(0, Ordering::Relaxed);
        self.inner.total_analysis_time_us.store(0, Ordering::Relaxed);
        self.inner.category_blocks.lock().clear();
    }
}

impl Default for FilterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub total_checks: u64,
    pub blocked_count: u64,
    pub false_positive_count: u64,
    pub total_analysis_time_us: u64,
    pub category_block_counts: BTreeMap<Category, u64>,
}

impl MetricsSnapshot {
    /// Running mean analysis time per check
    pub fn avg_analysis_time_us(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            self.total_analysis_time_us as f64 / self.total_checks as f64
        }
    }

    /// Fraction of checks that were blocked
    pub fn block_rate(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            self.blocked_count as f64 / self.total_checks as f64
        }
    }
}
