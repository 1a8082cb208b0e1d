//! Decision state machine
//!
//! Rules are evaluated in fixed priority order; crisis detection is the
//! single highest-priority rule and bypasses scoring and disambiguation
//! entirely.

use guardline_core::{Category, MatchSet, Severity};
use serde::{Deserialize, Serialize};

/// Score thresholds of the decision ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Above this the message is blocked at High risk
    #[serde(default = "default_block_high")]
    pub block_high: f64,

    /// Above this the message is blocked at Medium risk
    #[serde(default = "default_block_medium")]
    pub block_medium: f64,

    /// Above this, safety-sensitive categories block at Medium risk
    #[serde(default = "default_block_sensitive")]
    pub block_sensitive: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            block_high: default_block_high(),
            block_medium: default_block_medium(),
            block_sensitive: default_block_sensitive(),
        }
    }
}

fn default_block_high() -> f64 {
    0.8
}

fn default_block_medium() -> f64 {
    0.6
}

fn default_block_sensitive() -> f64 {
    0.4
}

/// Final classification verdict
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Content passes
    Safe,

    /// Content is refused. The category is the strongest detected one; a
    /// substituted scoring model can block without any category detected.
    Blocked {
        category: Option<Category>,
        severity: Severity,
    },

    /// Self-harm or harm-to-others risk; always Critical
    Crisis { category: Category },
}

/// Coarse decision kind, used to key response templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Safe,
    Blocked,
    Crisis,
}

impl Decision {
    /// The coarse kind of this decision
    pub fn kind(&self) -> DecisionKind {
        match self {
            Self::Safe => DecisionKind::Safe,
            Self::Blocked { .. } => DecisionKind::Blocked,
            Self::Crisis { .. } => DecisionKind::Crisis,
        }
    }

    /// Whether the content passed
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Ordinal risk level of this decision
    pub fn risk_level(&self) -> Severity {
        match self {
            Self::Safe => Severity::Low,
            Self::Blocked { severity, .. } => *severity,
            Self::Crisis { .. } => Severity::Critical,
        }
    }

    /// Decision confidence given the underlying risk score
    pub fn confidence(&self, ml_score: f64) -> f64 {
        match self {
            Self::Crisis { .. } => 0.95,
            Self::Blocked { .. } => ml_score.clamp(0.0, 1.0),
            Self::Safe => (1.0 - ml_score).clamp(0.0, 1.0),
        }
    }
}

/// Run the decision ladder.
///
/// `override_allowed` is the disambiguator's verdict; it is only consulted
/// when no score threshold fired. When categories were detected and no
/// override was granted, the conservative default is `Blocked(Low)`.
pub fn decide(
    matches: &MatchSet,
    ml_score: f64,
    override_allowed: bool,
    thresholds: &DecisionThresholds,
) -> Decision {
    if matches.has_crisis() {
        return Decision::Crisis {
            category: Category::CrisisIntervention,
        };
    }

    let category = primary_category(matches);

    if ml_score > thresholds.block_high {
        return Decision::Blocked {
            category,
            severity: Severity::High,
        };
    }

    if ml_score > thresholds.block_medium {
        return Decision::Blocked {
            category,
            severity: Severity::Medium,
        };
    }

    let sensitive = matches.categories.contains(&Category::Dangerous)
        || matches.categories.contains(&Category::Inappropriate);
    if ml_score > thresholds.block_sensitive && sensitive {
        return Decision::Blocked {
            category,
            severity: Severity::Medium,
        };
    }

    if matches.categories.is_empty() || override_allowed {
        return Decision::Safe;
    }

    Decision::Blocked {
        category,
        severity: Severity::Low,
    }
}

/// The highest-weighted detected category
fn primary_category(matches: &MatchSet) -> Option<Category> {
    matches
        .categories
        .iter()
        .copied()
        .max_by(|a, b| {
            a.default_weight()
                .partial_cmp(&b.default_weight())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
