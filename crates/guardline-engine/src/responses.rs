//! Response template selection
//!
//! Template text is external configuration data, not engine logic: legal and
//! compliance teams edit copy without code changes. Selection is seedable so
//! tests can pin which template comes back.
//!
//! The crisis path is structurally infallible: catalog construction refuses
//! any configuration whose default persona lacks crisis and blocked copy, so
//! a crisis decision always yields a message.

use guardline_core::{Error, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::decision::DecisionKind;

/// Response templates for one persona
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PersonaTemplates {
    /// Refusal messages for blocked content
    #[serde(default)]
    pub blocked: Vec<String>,

    /// Crisis-intervention messages; must reference a hotline
    #[serde(default)]
    pub crisis: Vec<String>,
}

/// Response catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Persona used when the requested one has no entry
    #[serde(default = "default_persona_name")]
    pub default_persona: String,

    /// Templates per persona
    #[serde(default = "default_personas")]
    pub personas: BTreeMap<String, PersonaTemplates>,

    /// Fixed RNG seed for deterministic selection (tests)
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            default_persona: default_persona_name(),
            personas: default_personas(),
            rng_seed: None,
        }
    }
}

fn default_persona_name() -> String {
    "companion".to_string()
}

fn default_personas() -> BTreeMap<String, PersonaTemplates> {
    let mut personas = BTreeMap::new();
    personas.insert(
        "companion".to_string(),
        PersonaTemplates {
            blocked: vec![
                "I can't help with that, but I'm here for you. What else is on your mind?"
                    .to_string(),
                "That's not something I can talk about. Want to take the conversation \
                 somewhere else?"
                    .to_string(),
            ],
            crisis: vec![
                "It sounds like you're going through something really painful, and you \
                 deserve support right now. The 988 Suicide & Crisis Lifeline is available \
                 24/7 — call or text 988. You can also text HOME to 741741 to reach the \
                 Crisis Text Line. Please reach out to them."
                    .to_string(),
                "I'm really glad you told me. You don't have to carry this alone — trained \
                 counselors at the 988 Suicide & Crisis Lifeline (call or text 988) are \
                 there around the clock, and the Crisis Text Line is a text away at HOME \
                 to 741741."
                    .to_string(),
            ],
        },
    );
    personas
}

/// Catalog of response templates keyed by (decision kind, persona)
pub struct ResponseCatalog {
    personas: BTreeMap<String, PersonaTemplates>,
    default_persona: String,
    rng: Mutex<StdRng>,
}

impl ResponseCatalog {
    /// Build a catalog, validating that the default persona can always answer
    pub fn new(config: ResponseConfig) -> Result<Self> {
        let default = config
            .personas
            .get(&config.default_persona)
            .ok_or_else(|| {
                Error::config(format!(
                    "default persona '{}' has no templates",
                    config.default_persona
                ))
            })?;

        if default.blocked.is_empty() || default.crisis.is_empty() {
            return Err(Error::config(format!(
                "default persona '{}' must define blocked and crisis templates",
                config.default_persona
            )));
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            personas: config.personas,
            default_persona: config.default_persona,
            rng: Mutex::new(rng),
        })
    }

    /// Select a template for a decision and persona.
    ///
    /// Safe decisions carry no message. Unknown personas, and personas with
    /// an empty list for the decision kind, fall back to the default persona.
    pub fn select(&self, kind: DecisionKind, persona: &str) -> Option<String> {
        if kind == DecisionKind::Safe {
            return None;
        }

        let templates = self.templates_for(kind, persona);
        let index = self.rng.lock().gen_range(0..templates.len());
        Some(templates[index].clone())
    }

    fn templates_for(&self, kind: DecisionKind, persona: &str) -> &[String] {
        let list = self
            .personas
            .get(persona)
            .map(|t| Self::list(t, kind))
            .filter(|l| !l.is_empty());

        match list {
            Some(list) => list,
            None => {
                if !self.personas.contains_key(persona) {
                    debug!(persona = %persona, "unknown persona, using default");
                }
                // Validated non-empty at construction
                Self::list(&self.personas[&self.default_persona], kind)
            }
        }
    }

    fn list(templates: &PersonaTemplates, kind: DecisionKind) -> &[String] {
        match kind {
            DecisionKind::Crisis => &templates.crisis,
            _ => &templates.blocked,
        }
    }
}
