//! Analytics over the bounded history buffer
//!
//! All queries here read the ring buffer only, never full historical data.
//! Threshold optimization refuses to answer below a minimum sample size
//! rather than returning a misleading recommendation.

use chrono::{Duration, Utc};
use guardline_core::{Category, Error, Result, Severity};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::history::AnalysisHistory;

/// Minimum samples required by [`optimize_thresholds`]
pub const MIN_OPTIMIZATION_SAMPLES: usize = 100;

/// Aggregate report over a time window
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// Window length in hours
    pub period_hours: i64,

    /// Analyses inside the window
    pub sample_count: usize,

    /// Fraction blocked
    pub block_rate: f64,

    /// Count per risk level
    pub risk_distribution: BTreeMap<Severity, u64>,

    /// Count per detected category
    pub category_distribution: BTreeMap<Category, u64>,

    /// Mean risk score
    pub avg_ml_score: f64,

    /// Mean decision confidence
    pub avg_confidence: f64,
}

/// Per-pattern effectiveness numbers
#[derive(Debug, Clone, Serialize)]
pub struct PatternStats {
    /// Analyses in which the pattern matched
    pub matches: u64,

    /// Matched analyses that were blocked
    pub blocks: u64,

    /// blocks / matches
    pub block_rate: f64,
}

/// Threshold tuning recommendation
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdRecommendation {
    /// Samples the recommendation is based on
    pub sample_count: usize,

    /// Mean score of blocked analyses
    pub avg_blocked_score: f64,

    /// Mean score of safe analyses
    pub avg_safe_score: f64,

    /// Suggested block threshold
    pub recommended_block_threshold: f64,

    /// Reported false positives / blocked
    pub false_positive_rate: f64,
}

/// Build a report over the last `period`
pub fn report(history: &AnalysisHistory, period: Duration) -> Result<AnalyticsReport> {
    let cutoff = Utc::now() - period;
    let samples: Vec<_> = history
        .snapshot()
        .into_iter()
        .filter(|a| a.created_at >= cutoff)
        .collect();

    if samples.is_empty() {
        return Err(Error::insufficient_data(format!(
            "no analyses in the last {} hours",
            period.num_hours()
        )));
    }

    let mut risk_distribution = BTreeMap::new();
    let mut category_distribution = BTreeMap::new();
    let mut blocked = 0u64;
    let mut ml_sum = 0.0;
    let mut confidence_sum = 0.0;

    for analysis in &samples {
        *risk_distribution.entry(analysis.risk_level).or_insert(0) += 1;
        for category in &analysis.categories {
            *category_distribution.entry(*category).or_insert(0) += 1;
        }
        if !analysis.is_safe {
            blocked += 1;
        }
        ml_sum += analysis.ml_score;
        confidence_sum += analysis.confidence;
    }

    let count = samples.len();
    Ok(AnalyticsReport {
        period_hours: period.num_hours(),
        sample_count: count,
        block_rate: blocked as f64 / count as f64,
        risk_distribution,
        category_distribution,
        avg_ml_score: ml_sum / count as f64,
        avg_confidence: confidence_sum / count as f64,
    })
}

/// Per-pattern match and block counts from the buffer
pub fn pattern_effectiveness(history: &AnalysisHistory) -> BTreeMap<String, PatternStats> {
    let mut stats: BTreeMap<String, PatternStats> = BTreeMap::new();

    for analysis in history.snapshot() {
        for pattern in &analysis.patterns_matched {
            let entry = stats.entry(pattern.clone()).or_insert(PatternStats {
                matches: 0,
                blocks: 0,
                block_rate: 0.0,
            });
            entry.matches += 1;
            if !analysis.is_safe {
                entry.blocks += 1;
            }
        }
    }

    for entry in stats.values_mut() {
        entry.block_rate = entry.blocks as f64 / entry.matches as f64;
    }

    stats
}

/// Recommend a block threshold from buffered scores.
///
/// Returns `Error::InsufficientData` below [`MIN_OPTIMIZATION_SAMPLES`].
pub fn optimize_thresholds(
    history: &AnalysisHistory,
    false_positive_count: u64,
) -> Result<ThresholdRecommendation> {
    let samples = history.snapshot();
    if samples.len() < MIN_OPTIMIZATION_SAMPLES {
        return Err(Error::insufficient_data(format!(
            "{} analyses buffered, {} required",
            samples.len(),
            MIN_OPTIMIZATION_SAMPLES
        )));
    }

    let (blocked, safe): (Vec<_>, Vec<_>) = samples.iter().partition(|a| !a.is_safe);

    let avg = |scores: &[&guardline_core::Analysis]| -> f64 {
        if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|a| a.ml_score).sum::<f64>() / scores.len() as f64
        }
    };

    let avg_blocked_score = avg(&blocked);
    let avg_safe_score = avg(&safe);

    // Midpoint of the two population means, bounded to a sane range. With no
    // blocked samples there is nothing to tune against; keep the default.
    let recommended = if blocked.is_empty() {
        0.6
    } else {
        ((avg_blocked_score + avg_safe_score) / 2.0).clamp(0.4, 0.9)
    };

    let false_positive_rate = if blocked.is_empty() {
        0.0
    } else {
        false_positive_count as f64 / blocked.len() as f64
    };

    Ok(ThresholdRecommendation {
        sample_count: samples.len(),
        avg_blocked_score,
        avg_safe_score,
        recommended_block_threshold: recommended,
        false_positive_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardline_core::Analysis;

    fn analysis(hash: &str, is_safe: bool, ml_score: f64, categories: &[Category]) -> Analysis {
        Analysis {
            message_hash: hash.to_string(),
            is_safe,
            risk_level: if is_safe { Severity::Low } else { Severity::High },
            confidence: 0.8,
            categories: categories.iter().copied().collect(),
            keywords_matched: Default::default(),
            patterns_matched: ["\\btest\\b".to_string()].into_iter().collect(),
            ml_score,
            analysis_duration_us: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_report_empty_window_is_insufficient_data() {
        let history = AnalysisHistory::new(100, 50);
        let err = report(&history, Duration::hours(24)).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_report_aggregates() {
        let history = AnalysisHistory::new(100, 50);
        history.push(analysis("a", true, 0.1, &[]));
        history.push(analysis("b", false, 0.9, &[Category::Dangerous]));

        let report = report(&history, Duration::hours(24)).unwrap();
        assert_eq!(report.sample_count, 2);
        assert_eq!(report.block_rate, 0.5);
        assert_eq!(report.avg_ml_score, 0.5);
        assert_eq!(report.category_distribution[&Category::Dangerous], 1);
        assert_eq!(report.risk_distribution[&Severity::High], 1);
    }

    #[test]
    fn test_pattern_effectiveness() {
        let history = AnalysisHistory::new(100, 50);
        history.push(analysis("a", false, 0.9, &[Category::Dangerous]));
        history.push(analysis("b", true, 0.2, &[]));

        let stats = pattern_effectiveness(&history);
        let entry = &stats["\\btest\\b"];
        assert_eq!(entry.matches, 2);
        assert_eq!(entry.blocks, 1);
        assert_eq!(entry.block_rate, 0.5);
    }

    #[test]
    fn test_optimize_requires_min_samples() {
        let history = AnalysisHistory::new(200, 100);
        for i in 0..(MIN_OPTIMIZATION_SAMPLES - 1) {
            history.push(analysis(&format!("h{}", i), true, 0.1, &[]));
        }

        let err = optimize_thresholds(&history, 0).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
    }

    #[test]
    fn test_optimize_with_enough_samples() {
        let history = AnalysisHistory::new(500, 250);
        for i in 0..80 {
            history.push(analysis(&format!("s{}", i), true, 0.2, &[]));
        }
        for i in 0..40 {
            history.push(analysis(
                &format!("b{}", i),
                false,
                0.8,
                &[Category::Dangerous],
            ));
        }

        let rec = optimize_thresholds(&history, 4).unwrap();
        assert_eq!(rec.sample_count, 120);
        assert!((rec.avg_blocked_score - 0.8).abs() < 1e-9);
        assert!((rec.avg_safe_score - 0.2).abs() < 1e-9);
        assert!((rec.recommended_block_threshold - 0.5).abs() < 1e-9);
        assert!((rec.false_positive_rate - 0.1).abs() < 1e-9);
    }
}
