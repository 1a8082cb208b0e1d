//! Risk scoring
//!
//! The scoring model is a pure function of the message and its matches, so a
//! learned classifier can be substituted behind [`RiskModel`] without touching
//! the rest of the engine.

use guardline_core::{Category, MatchSet};
use std::collections::BTreeMap;

use crate::config::{ClassifyConfig, ScoringWeights};

/// Pluggable risk scoring interface
pub trait RiskModel: Send + Sync {
    /// Score a message in [0, 1]. Must be pure: no I/O, no shared state.
    fn score(&self, message: &str, matches: &MatchSet) -> f64;

    /// Get the model name
    fn name(&self) -> &str;
}

/// Deterministic weighted heuristic, the default model.
///
/// Combines the strongest category weight, keyword density, pattern count,
/// and urgency signals into a single clamped score.
pub struct WeightedHeuristicModel {
    weights: ScoringWeights,
    category_weights: BTreeMap<Category, f64>,
    urgency_terms: Vec<String>,
}

impl WeightedHeuristicModel {
    /// Build from configuration
    pub fn new(config: &ClassifyConfig) -> Self {
        Self {
            weights: config.scoring,
            category_weights: Category::ALL
                .iter()
                .map(|c| (*c, config.weight(*c)))
                .collect(),
            urgency_terms: config
                .urgency_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    fn category_score(&self, matches: &MatchSet) -> f64 {
        matches
            .categories
            .iter()
            .map(|c| {
                self.category_weights
                    .get(c)
                    .copied()
                    .unwrap_or_else(|| c.default_weight())
            })
            .fold(0.0, f64::max)
    }

    fn urgency_count(&self, lower: &str) -> usize {
        self.urgency_terms
            .iter()
            .filter(|t| lower.contains(t.as_str()))
            .count()
    }
}

impl Default for WeightedHeuristicModel {
    fn default() -> Self {
        Self::new(&ClassifyConfig::default())
    }
}

impl RiskModel for WeightedHeuristicModel {
    fn score(&self, message: &str, matches: &MatchSet) -> f64 {
        let word_count = message.split_whitespace().count().max(1);

        let category_score = self.category_score(matches);
        let density_score = ((matches.keywords.len() as f64 / word_count as f64)
            * self.weights.density_multiplier)
            .min(1.0);
        let pattern_score = (matches.patterns.len() as f64 * self.weights.pattern_step).min(1.0);
        let urgency_score = (self.urgency_count(&message.to_lowercase()) as f64
            * self.weights.urgency_step)
            .min(1.0);

        (category_score * self.weights.category
            + density_score * self.weights.density
            + pattern_score * self.weights.pattern
            + urgency_score * self.weights.urgency)
            .clamp(0.0, 1.0)
    }

    fn name(&self) -> &str {
        "weighted-heuristic"
    }
}
