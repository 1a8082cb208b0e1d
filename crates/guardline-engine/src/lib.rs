//! Guardline Engine
//!
//! The decision layer of the Guardline moderation engine:
//! - Fixed-priority decision ladder with an unconditional crisis override
//! - Persona response catalog with seedable template selection
//! - The `ContentFilter` facade: one `classify` entry point plus the full
//!   admin/config surface
//!
//! Classification is synchronous end to end; only retention purging and
//! review notification run on background tasks.

pub mod config;
pub mod decision;
pub mod filter;
pub mod responses;

pub use config::{EngineConfig, EngineLimits};
pub use decision::{decide, Decision, DecisionKind, DecisionThresholds};
pub use filter::{ContentFilter, Verdict};
pub use responses::{PersonaTemplates, ResponseCatalog, ResponseConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::decision::{Decision, DecisionKind};
    pub use crate::filter::{ContentFilter, Verdict};
    pub use guardline_core::prelude::*;
}
