//! Built-in default lexicons
//!
//! Every list here is configuration data with a code-level default; deployments
//! override any of them via YAML without touching the engine.

use guardline_core::{Category, Severity};
use std::collections::BTreeMap;

use crate::config::{KeywordGroup, PatternSpec};

/// Default keyword lists per category
pub fn default_keywords() -> BTreeMap<Category, KeywordGroup> {
    let mut keywords = BTreeMap::new();

    keywords.insert(
        Category::CrisisIntervention,
        KeywordGroup {
            severity: Severity::Critical,
            words: vec![
                "kill myself".into(),
                "suicide".into(),
                "end my life".into(),
                "want to die".into(),
                "hurt myself".into(),
                "self harm".into(),
                "self-harm".into(),
                "end it all".into(),
                "no reason to live".into(),
                "better off dead".into(),
                "take my own life".into(),
                "cutting myself".into(),
            ],
        },
    );

    keywords.insert(
        Category::Dangerous,
        KeywordGroup {
            severity: Severity::Critical,
            words: vec![
                "make a bomb".into(),
                "build a weapon".into(),
                "make explosives".into(),
                "poison someone".into(),
                "hurt someone".into(),
                "kill someone".into(),
                "buy a gun illegally".into(),
                "untraceable weapon".into(),
            ],
        },
    );

    keywords.insert(
        Category::HarmfulAdvice,
        KeywordGroup {
            severity: Severity::High,
            words: vec![
                "stop taking your medication".into(),
                "stop taking your meds".into(),
                "don't tell your parents".into(),
                "keep it secret from".into(),
                "you don't need a doctor".into(),
                "don't call the police".into(),
                "run away from home".into(),
                "starve yourself".into(),
            ],
        },
    );

    keywords.insert(
        Category::Inappropriate,
        KeywordGroup {
            severity: Severity::High,
            words: vec![
                "send nudes".into(),
                "sexual roleplay".into(),
                "explicit photos".into(),
                "nsfw".into(),
                "sexting".into(),
                "erotic".into(),
            ],
        },
    );

    keywords.insert(
        Category::AcademicCheating,
        KeywordGroup {
            severity: Severity::Medium,
            words: vec![
                "homework".into(),
                "assignment".into(),
                "write my essay".into(),
                "do my homework".into(),
                "take my test".into(),
                "exam answers".into(),
                "plagiarize".into(),
            ],
        },
    );

    keywords.insert(
        Category::Coding,
        KeywordGroup {
            severity: Severity::Low,
            words: vec![
                "code".into(),
                "coding".into(),
                "program".into(),
                "python".into(),
                "javascript".into(),
                "function".into(),
                "algorithm".into(),
                "for loop".into(),
                "for-loop".into(),
                "while loop".into(),
                "variable".into(),
                "debug".into(),
                "script".into(),
            ],
        },
    );

    keywords.insert(
        Category::Political,
        KeywordGroup {
            severity: Severity::Low,
            words: vec![
                "vote for".into(),
                "election".into(),
                "political party".into(),
                "campaign".into(),
                "democrat".into(),
                "republican".into(),
                "ballot".into(),
            ],
        },
    );

    keywords
}

/// Default regex patterns
pub fn default_patterns() -> Vec<PatternSpec> {
    vec![
        PatternSpec {
            expression: r"\b(want|going|plan(ning)?)\s+to\s+(die|kill\s+myself|end\s+it)\b".into(),
            category: Category::CrisisIntervention,
            severity: Severity::Critical,
            context_required: false,
            whitelist_exceptions: Default::default(),
        },
        PatternSpec {
            expression: r"\bhow\s+to\s+(make|build)\s+(a\s+)?(bomb|weapon|explosive)".into(),
            category: Category::Dangerous,
            severity: Severity::Critical,
            context_required: false,
            whitelist_exceptions: Default::default(),
        },
        PatternSpec {
            expression: r"\b(write|do|finish|complete)\s+my\s+(homework|essay|assignment|paper)\b"
                .into(),
            category: Category::AcademicCheating,
            severity: Severity::Medium,
            context_required: false,
            whitelist_exceptions: Default::default(),
        },
        PatternSpec {
            expression: r"\bsend\s+(me\s+)?(nudes|explicit\s+(photos|pictures))\b".into(),
            category: Category::Inappropriate,
            severity: Severity::High,
            context_required: false,
            whitelist_exceptions: Default::default(),
        },
        PatternSpec {
            expression: r"\bsolve\s+(this|these|my)\s+(problem|question|exercise)s?\s+for\s+me\b"
                .into(),
            category: Category::Coding,
            severity: Severity::Low,
            context_required: true,
            whitelist_exceptions: Default::default(),
        },
    ]
}

/// Urgency terms that raise the risk score
pub fn default_urgency_terms() -> Vec<String> {
    [
        "now",
        "tonight",
        "immediately",
        "right away",
        "asap",
        "urgent",
        "hurry",
        "today",
        "tomorrow",
        "can't wait",
        "before it's too late",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Terms signalling legitimate educational intent
pub fn default_educational_terms() -> Vec<String> {
    [
        "learn",
        "learning",
        "understand",
        "understanding",
        "explain",
        "explanation",
        "concept",
        "conceptually",
        "example",
        "practice",
        "study",
        "studying",
        "curious",
        "how does",
        "why does",
        "what is",
        "tutorial",
        "teach me",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Terms signalling abusive or cheating intent
pub fn default_abuse_terms() -> Vec<String> {
    [
        "do it for me",
        "write it for me",
        "for me",
        "homework",
        "assignment",
        "due tomorrow",
        "due tonight",
        "cheat",
        "answers",
        "test answers",
        "exam",
        "plagiarize",
        "just give me",
        "don't explain",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_keywords() {
        let keywords = default_keywords();
        for category in Category::ALL {
            assert!(
                keywords.contains_key(&category),
                "missing keywords for {:?}",
                category
            );
        }
    }

    #[test]
    fn test_default_patterns_compile() {
        for spec in default_patterns() {
            assert!(
                regex::Regex::new(&spec.expression).is_ok(),
                "pattern does not compile: {}",
                spec.expression
            );
        }
    }

    #[test]
    fn test_crisis_keywords_are_critical() {
        let keywords = default_keywords();
        assert_eq!(
            keywords[&Category::CrisisIntervention].severity,
            Severity::Critical
        );
    }
}
