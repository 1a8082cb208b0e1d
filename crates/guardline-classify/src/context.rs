//! Context disambiguation
//!
//! Distinguishes legitimate educational use from abusive or cheating use for
//! categories where both occur (currently Coding and Political). The
//! asymmetry is deliberate: CrisisIntervention, Dangerous, and Inappropriate
//! never receive contextual leniency.

use guardline_core::{Category, MatchSet};
use std::collections::BTreeSet;

use crate::config::ClassifyConfig;

/// Educational-vs-abuse lexicon counter
pub struct ContextDisambiguator {
    educational_terms: Vec<String>,
    abuse_terms: Vec<String>,
}

impl ContextDisambiguator {
    /// Build from configuration
    pub fn new(config: &ClassifyConfig) -> Self {
        Self {
            educational_terms: config
                .educational_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            abuse_terms: config
                .abuse_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Whether the detected categories alone should not block this message.
    ///
    /// True only when every detected category is context-eligible and the
    /// educational term count strictly exceeds the abuse term count.
    pub fn allows_override(
        &self,
        message: &str,
        matches: &MatchSet,
        context_categories: &BTreeSet<Category>,
    ) -> bool {
        if matches.categories.is_empty() {
            return false;
        }

        let all_eligible = matches
            .categories
            .iter()
            .all(|c| c.context_adjustable() && context_categories.contains(c));
        if !all_eligible {
            return false;
        }

        let lower = message.to_lowercase();
        let educational = count_terms(&lower, &self.educational_terms);
        let abusive = count_terms(&lower, &self.abuse_terms);

        educational > abusive
    }
}

fn count_terms(lower: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| lower.contains(t.as_str())).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ContextDisambiguator, BTreeSet<Category>) {
        let config = ClassifyConfig::default();
        (
            ContextDisambiguator::new(&config),
            config.context_categories,
        )
    }

    fn coding_matches() -> MatchSet {
        let mut matches = MatchSet::default();
        matches.categories.insert(Category::Coding);
        matches.keywords.insert("for loop".to_string());
        matches
    }

    #[test]
    fn test_educational_coding_overrides() {
        let (disambiguator, context) = setup();
        assert!(disambiguator.allows_override(
            "Can you explain how a for-loop works conceptually?",
            &coding_matches(),
            &context,
        ));
    }

    #[test]
    fn test_cheating_coding_does_not_override() {
        let (disambiguator, context) = setup();
        assert!(!disambiguator.allows_override(
            "just give me the answers to my homework, don't explain",
            &coding_matches(),
            &context,
        ));
    }

    #[test]
    fn test_tie_does_not_override() {
        let (disambiguator, context) = setup();
        // No lexicon terms either way: 0 vs 0 is not strictly greater
        assert!(!disambiguator.allows_override("for loop", &coding_matches(), &context));
    }

    #[test]
    fn test_crisis_never_overridden() {
        let (disambiguator, context) = setup();
        let mut matches = coding_matches();
        matches.categories.insert(Category::CrisisIntervention);

        assert!(!disambiguator.allows_override(
            "explain conceptually, I want to learn and understand",
            &matches,
            &context,
        ));
    }

    #[test]
    fn test_dangerous_never_overridden() {
        let (disambiguator, context) = setup();
        let mut matches = MatchSet::default();
        matches.categories.insert(Category::Dangerous);

        assert!(!disambiguator.allows_override(
            "I am curious to learn and understand this concept",
            &matches,
            &context,
        ));
    }

    #[test]
    fn test_no_categories_no_override() {
        let (disambiguator, context) = setup();
        assert!(!disambiguator.allows_override(
            "teach me something interesting",
            &MatchSet::default(),
            &context,
        ));
    }

    #[test]
    fn test_category_outside_config_not_eligible() {
        let (disambiguator, _) = setup();
        // Empty context set: even Coding is not eligible
        assert!(!disambiguator.allows_override(
            "explain this concept so I can learn",
            &coding_matches(),
            &BTreeSet::new(),
        ));
    }
}
