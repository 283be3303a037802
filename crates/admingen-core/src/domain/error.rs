// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Relations that merely cannot be generated (unsupported shapes,
/// unresolvable columns) are *not* errors — they are excluded from the
/// plan with a warning. Only structural violations surface here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Duplicate column '{column}' in entity '{entity}'")]
    DuplicateColumn { entity: String, column: String },

    #[error("Primary key column '{column}' does not exist on entity '{entity}'")]
    UnknownPrimaryKey { entity: String, column: String },

    #[error("Relation '{property}' on entity '{entity}' is malformed: {reason}")]
    InvalidRelation {
        entity: String,
        property: String,
        reason: String,
    },

    // ========================================================================
    // Plan-level conditions
    // ========================================================================
    /// Two relations derived the same parameter name. Detected and
    /// surfaced, never auto-resolved — the fix belongs in the schema.
    #[error("Derived parameter name '{name}' is used by more than one relation of entity '{entity}'")]
    NameCollision { entity: String, name: String },

    #[error("Entity '{entity}' has no generatable surface: {reason}")]
    EmptyPlan { entity: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSchema(msg) => vec![
                "Check the entity manifest".into(),
                format!("Details: {}", msg),
            ],
            Self::DuplicateColumn { entity, column } => vec![
                format!("Entity '{}' declares column '{}' twice", entity, column),
                "Remove or rename the duplicate declaration".into(),
            ],
            Self::UnknownPrimaryKey { entity, column } => vec![
                format!("'{}' names '{}' as a key but never declares it", entity, column),
                "Add the column or fix the primary_keys list".into(),
            ],
            Self::NameCollision { entity, name } => vec![
                format!("Two navigation properties of '{}' derive the parameter '{}'", entity, name),
                "Rename one of the navigation properties to disambiguate".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSchema(_)
            | Self::DuplicateColumn { .. }
            | Self::UnknownPrimaryKey { .. }
            | Self::InvalidRelation { .. } => ErrorCategory::Validation,
            Self::NameCollision { .. } | Self::EmptyPlan { .. } => ErrorCategory::Conflict,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Internal,
}
