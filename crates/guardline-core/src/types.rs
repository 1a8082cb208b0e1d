//! Core types for Guardline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Content risk category.
///
/// Each category carries a default scoring weight; `CrisisIntervention` is
/// always maximal and is handled as an unconditional override by the
/// decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Programming topics; legitimate educational use is common
    Coding,
    /// Sexual or otherwise inappropriate content
    Inappropriate,
    /// Advice that endangers the user (medical, secrecy, isolation)
    HarmfulAdvice,
    /// Instructions for weapons, violence, or physical harm
    Dangerous,
    /// Self-harm or harm-to-others risk; overrides all other scoring
    CrisisIntervention,
    /// Homework/exam cheating requests
    AcademicCheating,
    /// Political persuasion topics; legitimate educational use is common
    Political,
}

impl Category {
    /// All known categories, in scoring order
    pub const ALL: [Category; 7] = [
        Self::Coding,
        Self::Inappropriate,
        Self::HarmfulAdvice,
        Self::Dangerous,
        Self::CrisisIntervention,
        Self::AcademicCheating,
        Self::Political,
    ];

    /// Default scoring weight in [0, 1]
    pub fn default_weight(&self) -> f64 {
        match self {
            Self::Coding => 0.30,
            Self::Inappropriate => 0.80,
            Self::HarmfulAdvice => 0.85,
            Self::Dangerous => 0.90,
            Self::CrisisIntervention => 1.00,
            Self::AcademicCheating => 0.65,
            Self::Political => 0.40,
        }
    }

    /// Whether contextual leniency may ever apply to this category.
    ///
    /// CrisisIntervention, Dangerous, and Inappropriate are exempt: false
    /// negatives there outweigh false positives on educational ones.
    pub fn context_adjustable(&self) -> bool {
        !matches!(
            self,
            Self::CrisisIntervention | Self::Dangerous | Self::Inappropriate
        )
    }

    /// Get a stable snake_case label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Inappropriate => "inappropriate",
            Self::HarmfulAdvice => "harmful_advice",
            Self::Dangerous => "dangerous",
            Self::CrisisIntervention => "crisis_intervention",
            Self::AcademicCheating => "academic_cheating",
            Self::Political => "political",
        }
    }
}

/// Ordinal risk severity, distinct from the continuous risk score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Get a stable lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Everything the matcher found in one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    /// Categories with at least one keyword or pattern hit
    pub categories: BTreeSet<Category>,

    /// Keywords that matched, lowercased
    pub keywords: BTreeSet<String>,

    /// Pattern expressions that matched
    pub patterns: BTreeSet<String>,

    /// Highest severity across all hits
    pub severity: Severity,
}

impl MatchSet {
    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// True when the crisis category is present
    pub fn has_crisis(&self) -> bool {
        self.categories.contains(&Category::CrisisIntervention)
    }
}

/// The immutable output record of one classification call.
///
/// Appended to the bounded history buffer; only ever removed by ring-buffer
/// eviction or explicit purge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// SHA-256 hex digest of the analyzed content
    pub message_hash: String,

    /// Final verdict
    pub is_safe: bool,

    /// Ordinal risk level
    pub risk_level: Severity,

    /// Decision confidence (0.0-1.0)
    pub confidence: f64,

    /// Categories detected
    pub categories: BTreeSet<Category>,

    /// Keywords that matched
    pub keywords_matched: BTreeSet<String>,

    /// Pattern expressions that matched
    pub patterns_matched: BTreeSet<String>,

    /// Continuous risk score from the scoring model (0.0-1.0)
    pub ml_score: f64,

    /// Wall-clock analysis duration in microseconds
    pub analysis_duration_us: u64,

    /// When the analysis was produced
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    /// True when this analysis must be scheduled for compliance review
    pub fn needs_review(&self) -> bool {
        !self.is_safe && self.risk_level >= Severity::High
    }
}
