//! Application layer errors.
//!
//! These errors represent failures in orchestration, not generation
//! logic. Generation-logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during batch orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The schema provider has no mapping for an entity identifier.
    /// Fatal for the whole batch (fail-fast); artifacts already written
    /// for earlier entities in the same batch are not rolled back.
    #[error("No schema found for entity '{entity}'")]
    SchemaNotFound { entity: String },

    /// The output sink failed. Aborts the batch; no partial-write
    /// recovery.
    #[error("Output error at {path}: {reason}")]
    Sink { path: PathBuf, reason: String },

    /// Schema store access failed (lock poisoned, etc.).
    #[error("Schema store error")]
    StoreLock,

    /// Generator options failed validation.
    #[error("Invalid generator options: {0}")]
    InvalidOptions(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SchemaNotFound { entity } => vec![
                format!("No schema is registered for '{}'", entity),
                "Run: admingen list to see available entities".into(),
                "Check the schema directory passed via --schemas".into(),
            ],
            Self::Sink { path, .. } => vec![
                format!("Failed to write: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the output directory exists".into(),
            ],
            Self::StoreLock => vec![
                "The schema store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::InvalidOptions(msg) => vec![
                format!("Options issue: {}", msg),
                "Check --route-base and --model-path values".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SchemaNotFound { .. } => ErrorCategory::NotFound,
            Self::Sink { .. } | Self::StoreLock => ErrorCategory::Internal,
            Self::InvalidOptions(_) => ErrorCategory::Validation,
        }
    }
}
