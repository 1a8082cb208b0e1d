//! Error types for Guardline

/// Result type alias using Guardline's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Guardline operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed regex submitted through the admin surface; the store is left unchanged
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Persona has no template entry; recovered locally via the default persona
    #[error("unknown persona: {0}")]
    UnknownPersona(String),

    /// A pattern exceeded its evaluation budget and was skipped
    #[error("pattern evaluation timed out: {0}")]
    PatternTimeout(String),

    /// Not enough samples to answer an analytics query
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new invalid-pattern error
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    /// Create a new insufficient-data error
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
