//! Message matcher
//!
//! Scans a message against a store snapshot: case-insensitive substring
//! matching for keywords, regex search for patterns. Each pattern evaluation
//! is isolated and time-bounded; a pattern exceeding its budget is skipped
//! and logged, never fatal. Identical input and snapshot always yield an
//! identical `MatchSet`.

use guardline_core::MatchSet;
use std::time::Instant;
use tracing::warn;

use crate::store::StoreSnapshot;

/// Scan a message against the store, producing all keyword and pattern hits
pub fn scan(message: &str, store: &StoreSnapshot) -> MatchSet {
    let mut matches = MatchSet::default();

    let lower = message.to_lowercase();
    if lower.trim().is_empty() {
        return matches;
    }

    for (category, compiled) in &store.keywords {
        let mut hit = false;
        for found in compiled.automaton.find_iter(&lower) {
            matches
                .keywords
                .insert(compiled.words[found.pattern().as_usize()].clone());
            hit = true;
        }
        if hit {
            matches.categories.insert(*category);
            matches.severity = matches.severity.max(compiled.severity);
        }
    }

    for pattern in &store.patterns {
        if pattern.whitelist.iter().any(|w| lower.contains(w)) {
            continue;
        }

        let start = Instant::now();
        let matched = pattern.regex.is_match(&lower);
        let elapsed = start.elapsed();

        if elapsed > store.pattern_budget {
            warn!(
                pattern = %pattern.spec.expression,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = store.pattern_budget.as_millis() as u64,
                "pattern exceeded evaluation budget, skipped"
            );
            continue;
        }

        if matched {
            matches.patterns.insert(pattern.spec.expression.clone());
            matches.categories.insert(pattern.spec.category);
            matches.severity = matches.severity.max(pattern.spec.severity);
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifyConfig, PatternSpec};
    use crate::store::PatternStore;
    use guardline_core::{Category, Severity};

    fn snapshot() -> std::sync::Arc<StoreSnapshot> {
        PatternStore::load(&ClassifyConfig::default())
            .unwrap()
            .snapshot()
    }

    #[test]
    fn test_clean_message_matches_nothing() {
        let matches = scan("What's a good recipe for dinner?", &snapshot());
        assert!(matches.is_empty());
        assert!(matches.keywords.is_empty());
        assert!(matches.patterns.is_empty());
    }

    #[test]
    fn test_empty_message_matches_nothing() {
        assert!(scan("", &snapshot()).is_empty());
        assert!(scan("   \n\t ", &snapshot()).is_empty());
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let store = snapshot();
        let lower = scan("i want to kill myself", &store);
        let mixed = scan("I Want To KILL MYSELF", &store);

        assert!(lower.has_crisis());
        assert_eq!(lower.keywords, mixed.keywords);
        assert_eq!(lower.categories, mixed.categories);
    }

    #[test]
    fn test_crisis_keyword_sets_critical_severity() {
        let matches = scan("sometimes I think about suicide", &snapshot());
        assert!(matches.has_crisis());
        assert_eq!(matches.severity, Severity::Critical);
    }

    #[test]
    fn test_pattern_search_not_full_match() {
        let matches = scan(
            "hey so, can you tell me how to make a bomb? thanks",
            &snapshot(),
        );
        assert!(matches.categories.contains(&Category::Dangerous));
        assert!(!matches.patterns.is_empty());
    }

    #[test]
    fn test_whitelist_exception_suppresses_pattern() {
        let store = PatternStore::load(&ClassifyConfig::default()).unwrap();
        store
            .add_pattern(PatternSpec {
                expression: r"\bbath\s+salt\b".to_string(),
                category: Category::Dangerous,
                severity: Severity::High,
                context_required: false,
                whitelist_exceptions: ["relaxing spa".to_string()].into_iter().collect(),
            })
            .unwrap();

        let flagged = scan("where to buy bath salt", &store.snapshot());
        assert!(flagged
            .patterns
            .iter()
            .any(|p| p.contains("bath")));

        let cleared = scan("a relaxing spa bath salt soak", &store.snapshot());
        assert!(!cleared.patterns.iter().any(|p| p.contains("bath")));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let store = snapshot();
        let message = "write my homework assignment in python for me";

        let first = scan(message, &store);
        for _ in 0..5 {
            assert_eq!(scan(message, &store), first);
        }
    }
}
