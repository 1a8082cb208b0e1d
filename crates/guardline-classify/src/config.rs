//! Configuration for classification

use guardline_core::{Category, Severity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::lexicon;

/// Configuration for the store, matcher, scorer, and disambiguator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Scoring weight per category, in [0, 1]
    #[serde(default = "default_category_weights")]
    pub category_weights: BTreeMap<Category, f64>,

    /// Keyword lists per category
    #[serde(default = "lexicon::default_keywords")]
    pub keywords: BTreeMap<Category, KeywordGroup>,

    /// Regex patterns
    #[serde(default = "lexicon::default_patterns")]
    pub patterns: Vec<PatternSpec>,

    /// Categories eligible for contextual disambiguation
    #[serde(default = "default_context_categories")]
    pub context_categories: BTreeSet<Category>,

    /// Urgency lexicon for the scorer
    #[serde(default = "lexicon::default_urgency_terms")]
    pub urgency_terms: Vec<String>,

    /// Educational-intent lexicon for the disambiguator
    #[serde(default = "lexicon::default_educational_terms")]
    pub educational_terms: Vec<String>,

    /// Abuse/cheating-intent lexicon for the disambiguator
    #[serde(default = "lexicon::default_abuse_terms")]
    pub abuse_terms: Vec<String>,

    /// Per-pattern evaluation budget in milliseconds
    #[serde(default = "default_pattern_budget_ms")]
    pub pattern_budget_ms: u64,

    /// Scoring formula weights
    #[serde(default)]
    pub scoring: ScoringWeights,
}

/// A keyword list sharing one severity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    /// Severity attached to every word in the group
    #[serde(default)]
    pub severity: Severity,

    /// The words themselves; matched case-insensitively as substrings
    pub words: Vec<String>,
}

/// A regex pattern entry.
///
/// Immutable once loaded; mutation only through the admin add/remove
/// operations, which replace the store snapshot atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Regex searched (not full-matched) against the lowercased message
    pub expression: String,

    /// Category this pattern detects
    pub category: Category,

    /// Severity of a hit
    #[serde(default)]
    pub severity: Severity,

    /// Whether contextual disambiguation may clear a hit
    #[serde(default)]
    pub context_required: bool,

    /// Substrings whose presence suppresses a hit
    #[serde(default)]
    pub whitelist_exceptions: BTreeSet<String>,
}

/// Weights of the risk-score formula
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the strongest category
    #[serde(default = "default_category_weight")]
    pub category: f64,

    /// Weight of keyword density
    #[serde(default = "default_density_weight")]
    pub density: f64,

    /// Weight of pattern hits
    #[serde(default = "default_pattern_weight")]
    pub pattern: f64,

    /// Weight of urgency terms
    #[serde(default = "default_urgency_weight")]
    pub urgency: f64,

    /// Density multiplier before capping at 1.0
    #[serde(default = "default_density_multiplier")]
    pub density_multiplier: f64,

    /// Score per pattern hit before capping at 1.0
    #[serde(default = "default_pattern_step")]
    pub pattern_step: f64,

    /// Score per urgency term before capping at 1.0
    #[serde(default = "default_urgency_step")]
    pub urgency_step: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: default_category_weight(),
            density: default_density_weight(),
            pattern: default_pattern_weight(),
            urgency: default_urgency_weight(),
            density_multiplier: default_density_multiplier(),
            pattern_step: default_pattern_step(),
            urgency_step: default_urgency_step(),
        }
    }
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            category_weights: default_category_weights(),
            keywords: lexicon::default_keywords(),
            patterns: lexicon::default_patterns(),
            context_categories: default_context_categories(),
            urgency_terms: lexicon::default_urgency_terms(),
            educational_terms: lexicon::default_educational_terms(),
            abuse_terms: lexicon::default_abuse_terms(),
            pattern_budget_ms: default_pattern_budget_ms(),
            scoring: ScoringWeights::default(),
        }
    }
}

impl ClassifyConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_yaml(&content)?)
    }

    /// Scoring weight for a category, falling back to the built-in default
    pub fn weight(&self, category: Category) -> f64 {
        self.category_weights
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_weight())
    }
}

fn default_category_weights() -> BTreeMap<Category, f64> {
    Category::ALL
        .iter()
        .map(|c| (*c, c.default_weight()))
        .collect()
}

fn default_context_categories() -> BTreeSet<Category> {
    [Category::Coding, Category::Political].into_iter().collect()
}

fn default_pattern_budget_ms() -> u64 {
    50
}

fn default_category_weight() -> f64 {
    0.5
}

fn default_density_weight() -> f64 {
    0.3
}

fn default_pattern_weight() -> f64 {
    0.1
}

fn default_urgency_weight() -> f64 {
    0.1
}

fn default_density_multiplier() -> f64 {
    2.0
}

fn default_pattern_step() -> f64 {
    0.2
}

fn default_urgency_step() -> f64 {
    0.1
}
