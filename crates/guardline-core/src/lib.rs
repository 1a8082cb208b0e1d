//! Guardline Core
//!
//! Core types and utilities shared across Guardline components.
//!
//! This crate provides:
//! - Risk categories, severities, and the `Analysis` output record
//! - Error types and result handling
//! - SHA-256 content hashing for privacy-preserving records

pub mod error;
pub mod hash;
pub mod types;

pub use error::{Error, Result};
pub use hash::content_hash;
pub use types::{Analysis, Category, MatchSet, Severity};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::hash::content_hash;
    pub use crate::types::{Analysis, Category, MatchSet, Severity};
}
