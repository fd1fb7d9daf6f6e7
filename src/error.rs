//! Custom error types for Ironlog
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Ironlog operations
#[derive(Error, Debug)]
pub enum IronlogError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for snapshots and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A row references a parent that does not exist
    #[error("{entity_type} {identifier} references missing {references}")]
    ForeignKey {
        entity_type: &'static str,
        identifier: String,
        references: String,
    },

    /// The durable store rejected the request under its access policy
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl IronlogError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for exercises
    pub fn exercise_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Exercise",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for stored backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the durable store refused the operation
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for IronlogError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::Unauthorized(err.to_string())
        } else {
            Self::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for IronlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Ironlog operations
pub type IronlogResult<T> = Result<T, IronlogError>;
