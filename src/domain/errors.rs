//! Domain error types
//!
//! This module defines the error hierarchy for Cloak. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

use crate::domain::category::EntityCategory;

/// Main Cloak error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum CloakError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entity classifier errors
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Mapping artifact missing or unreadable
    #[error("Mapping not found: {0}")]
    MappingNotFound(String),

    /// Forward and backward mappings disagree
    #[error("Mapping conflict: {0}")]
    MappingConflict(String),

    /// Pool and bounded fallback cannot produce an unused fake value
    #[error("Fake value pool exhausted for category '{category}' after {attempts} attempts")]
    FakeValueExhausted {
        category: EntityCategory,
        attempts: usize,
    },

    /// A configured column has no category binding
    #[error("Column not bound: {0}")]
    ColumnNotBound(String),

    /// A bound column is absent from the input rows
    #[error("Column missing from input: {0}")]
    ColumnMissing(String),

    /// SQL statement could not be tokenized
    #[error("Unparseable statement: {0}")]
    UnparseableStatement(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Audit trail errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Entity classifier errors
///
/// Errors that occur when consulting an entity classifier, local or
/// remote. These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Failed to reach the classifier endpoint
    #[error("Failed to connect to classifier: {0}")]
    ConnectionFailed(String),

    /// Classifier returned a response the driver cannot use
    #[error("Invalid response from classifier: {0}")]
    InvalidResponse(String),

    /// Classifier returned an unknown label
    #[error("Unknown label from classifier: {0}")]
    UnknownLabel(String),

    /// Server error (5xx)
    #[error("Classifier server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Classifier client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Classifier request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CloakError {
    fn from(err: std::io::Error) -> Self {
        CloakError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CloakError {
    fn from(err: serde_json::Error) -> Self {
        CloakError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CloakError {
    fn from(err: toml::de::Error) -> Self {
        CloakError::Configuration(format!("TOML parse error: {err}"))
    }
}
