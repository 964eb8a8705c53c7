//! Error types for concept graph operations
//!
//! Only root-level and argument-validation failures cross the assembler
//! boundary. Missing non-root nodes are pruned where they are found.

use thiserror::Error;

/// Main error type for the concept graph core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KgError {
    /// A referenced record does not exist in the store
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The root concept of a context-pack request does not exist
    #[error("Concept not found: {0}")]
    ConceptNotFound(String),

    /// Budget is zero or above the configured maximum
    #[error("Invalid budget {0}: must be between 1 and the configured maximum")]
    InvalidBudget(usize),

    /// An edge with the same (source, target, kind) triple already exists
    #[error("Edge already exists: {from} -[{kind}]-> {to}")]
    EdgeExists {
        from: String,
        to: String,
        kind: String,
    },

    /// A concept with the same id already exists
    #[error("Concept already exists: {0}")]
    ConceptExists(String),

    /// Record failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Snapshot file I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

impl KgError {
    /// Shorthand for a missing concept record
    pub fn concept_missing(id: impl Into<String>) -> Self {
        KgError::NotFound {
            kind: "concept",
            id: id.into(),
        }
    }

    /// Shorthand for a missing edge record
    pub fn edge_missing(id: impl Into<String>) -> Self {
        KgError::NotFound {
            kind: "edge",
            id: id.into(),
        }
    }

    /// Whether the caller, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            KgError::NotFound { .. }
                | KgError::ConceptNotFound(_)
                | KgError::InvalidBudget(_)
                | KgError::EdgeExists { .. }
                | KgError::ConceptExists(_)
                | KgError::Validation(_)
        )
    }
}

/// Result type alias for concept graph operations
pub type Result<T> = std::result::Result<T, KgError>;

impl From<String> for KgError {
    fn from(s: String) -> Self {
        KgError::Other(s)
    }
}

impl From<&str> for KgError {
    fn from(s: &str) -> Self {
        KgError::Other(s.to_string())
    }
}

impl From<std::io::Error> for KgError {
    fn from(e: std::io::Error) -> Self {
        KgError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for KgError {
    fn from(e: serde_json::Error) -> Self {
        KgError::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for KgError {
    fn from(e: serde_yaml::Error) -> Self {
        KgError::SerializationError(e.to_string())
    }
}
