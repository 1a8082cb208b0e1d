//! Pattern & category store
//!
//! Read-mostly store of compiled keyword automata and regex patterns. Admin
//! mutations rebuild a full snapshot and swap it atomically; `scan` callers
//! hold an `Arc` to whichever snapshot was current when they started, so a
//! reader never observes a partially-updated store.

use aho_corasick::AhoCorasick;
use guardline_core::{Category, Error, Result, Severity};
use parking_lot::RwLock;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{ClassifyConfig, KeywordGroup, PatternSpec};

/// Compiled keyword list for one category
pub struct CompiledKeywords {
    /// Case-insensitive multi-pattern automaton
    pub automaton: AhoCorasick,

    /// Words parallel to the automaton's pattern ids, lowercased
    pub words: Vec<String>,

    /// Severity shared by the group
    pub severity: Severity,
}

/// A compiled regex pattern plus its immutable spec
pub struct CompiledPattern {
    /// Compiled expression, searched against the lowercased message
    pub regex: Regex,

    /// The spec this pattern was built from
    pub spec: PatternSpec,

    /// Lowercased whitelist exceptions
    pub whitelist: Vec<String>,
}

/// One immutable compiled view of the store
pub struct StoreSnapshot {
    /// Keyword automata per category
    pub keywords: BTreeMap<Category, CompiledKeywords>,

    /// Compiled patterns
    pub patterns: Vec<CompiledPattern>,

    /// Categories eligible for contextual disambiguation
    pub context_categories: BTreeSet<Category>,

    /// Per-pattern evaluation budget
    pub pattern_budget: Duration,

    /// Raw keyword specs, retained for rebuilds
    keyword_specs: BTreeMap<Category, KeywordGroup>,

    /// Raw pattern specs, retained for rebuilds
    pattern_specs: Vec<PatternSpec>,
}

/// The shared pattern & category store
pub struct PatternStore {
    snapshot: RwLock<Arc<StoreSnapshot>>,
}

impl PatternStore {
    /// Compile a store from configuration
    pub fn load(config: &ClassifyConfig) -> Result<Self> {
        let snapshot = compile(
            config.keywords.clone(),
            config.patterns.clone(),
            config.context_categories.clone(),
            Duration::from_millis(config.pattern_budget_ms),
        )?;

        Ok(Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.snapshot.read().clone()
    }

    /// Add keywords to a category, rebuilding the snapshot
    pub fn add_keywords(&self, category: Category, words: &[String]) -> Result<()> {
        self.rebuild(|keywords, _| {
            let group = keywords.entry(category).or_insert_with(|| KeywordGroup {
                severity: Severity::Medium,
                words: Vec::new(),
            });
            for word in words {
                let word = word.to_lowercase();
                if !group.words.iter().any(|w| w.eq_ignore_ascii_case(&word)) {
                    group.words.push(word);
                }
            }
        })?;

        info!(category = category.label(), count = words.len(), "keywords added");
        Ok(())
    }

    /// Remove keywords from a category, rebuilding the snapshot
    pub fn remove_keywords(&self, category: Category, words: &[String]) -> Result<()> {
        self.rebuild(|keywords, _| {
            if let Some(group) = keywords.get_mut(&category) {
                group
                    .words
                    .retain(|w| !words.iter().any(|r| r.eq_ignore_ascii_case(w)));
            }
        })?;

        info!(category = category.label(), count = words.len(), "keywords removed");
        Ok(())
    }

    /// Add a pattern. Invalid regex is rejected and the store is unchanged.
    pub fn add_pattern(&self, spec: PatternSpec) -> Result<()> {
        // Validate before touching the store
        Regex::new(&spec.expression)
            .map_err(|e| Error::invalid_pattern(format!("{}: {}", spec.expression, e)))?;

        let expression = spec.expression.clone();
        self.rebuild(|_, patterns| {
            patterns.retain(|p| p.expression != spec.expression);
            patterns.push(spec.clone());
        })?;

        info!(pattern = %expression, "pattern added");
        Ok(())
    }

    /// Remove a pattern by expression. Returns whether it was present.
    pub fn remove_pattern(&self, expression: &str) -> bool {
        let mut removed = false;
        let result = self.rebuild(|_, patterns| {
            let before = patterns.len();
            patterns.retain(|p| p.expression != expression);
            removed = patterns.len() != before;
        });

        if result.is_ok() && removed {
            info!(pattern = %expression, "pattern removed");
        }
        removed
    }

    /// Total keywords across all categories
    pub fn keyword_count(&self) -> usize {
        self.snapshot().keywords.values().map(|k| k.words.len()).sum()
    }

    /// Total patterns
    pub fn pattern_count(&self) -> usize {
        self.snapshot().patterns.len()
    }

    /// Keywords currently loaded for a category
    pub fn keywords_for(&self, category: Category) -> Vec<String> {
        self.snapshot()
            .keywords
            .get(&category)
            .map(|k| k.words.clone())
            .unwrap_or_default()
    }

    /// Apply a mutation to the raw specs and swap in a freshly compiled
    /// snapshot. The write lock is held for the whole rebuild so concurrent
    /// admin mutations cannot lose updates.
    fn rebuild<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<Category, KeywordGroup>, &mut Vec<PatternSpec>),
    {
        let mut guard = self.snapshot.write();

        let mut keyword_specs = guard.keyword_specs.clone();
        let mut pattern_specs = guard.pattern_specs.clone();
        mutate(&mut keyword_specs, &mut pattern_specs);

        let snapshot = compile(
            keyword_specs,
            pattern_specs,
            guard.context_categories.clone(),
            guard.pattern_budget,
        )?;

        *guard = Arc::new(snapshot);
        Ok(())
    }
}

fn compile(
    keyword_specs: BTreeMap<Category, KeywordGroup>,
    pattern_specs: Vec<PatternSpec>,
    context_categories: BTreeSet<Category>,
    pattern_budget: Duration,
) -> Result<StoreSnapshot> {
    let mut keywords = BTreeMap::new();
    for (category, group) in &keyword_specs {
        let words: Vec<String> = group.words.iter().map(|w| w.to_lowercase()).collect();
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&words)
            .map_err(|e| {
                Error::internal(format!(
                    "failed to build keyword matcher for {}: {}",
                    category.label(),
                    e
                ))
            })?;

        keywords.insert(
            *category,
            CompiledKeywords {
                automaton,
                words,
                severity: group.severity,
            },
        );
    }

    let mut patterns = Vec::with_capacity(pattern_specs.len());
    for spec in &pattern_specs {
        let regex = Regex::new(&spec.expression)
            .map_err(|e| Error::invalid_pattern(format!("{}: {}", spec.expression, e)))?;
        let whitelist = spec
            .whitelist_exceptions
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        patterns.push(CompiledPattern {
            regex,
            spec: spec.clone(),
            whitelist,
        });
    }

    Ok(StoreSnapshot {
        keywords,
        patterns,
        context_categories,
        pattern_budget,
        keyword_specs,
        pattern_specs,
    })
}
