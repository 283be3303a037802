//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generator needs from external systems.
//! The `admingen-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::TableSchema;
use crate::error::AdmingenResult;

/// Port for schema resolution.
///
/// Implemented by:
/// - `admingen_adapters::schema_store::MemorySchemaStore` (registry, tests)
/// - `admingen_adapters::schema_loader::TomlSchemaLoader` (entity manifests)
///
/// ## Design Notes
///
/// The provider returns fully resolved *values* — the generator never
/// introspects anything. A real ORM bridge is just another adapter.
#[cfg_attr(test, mockall::automock)]
pub trait SchemaProvider: Send + Sync {
    /// Resolve an entity identifier to its schema.
    ///
    /// # Errors
    /// `ApplicationError::SchemaNotFound` when the identifier has no
    /// mapping — fatal for the enclosing batch.
    fn resolve(&self, entity: &str) -> AdmingenResult<TableSchema>;

    /// All entity identifiers this provider can resolve.
    fn list(&self) -> AdmingenResult<Vec<String>>;
}

/// Port for artifact output.
///
/// Implemented by:
/// - `admingen_adapters::sink::LocalOutputSink` (production)
/// - `admingen_adapters::sink::MemoryOutputSink` (testing)
///
/// Directory creation is the sink's concern, not the generator's. Writes
/// are blocking with no partial-write recovery: a failed write aborts the
/// remaining steps of the batch.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink: Send + Sync {
    /// Write one artifact, creating parent directories as needed.
    fn write(&self, path: &Path, content: &str) -> AdmingenResult<()>;

    /// Read an existing file's lines, or `None` when it does not exist.
    /// Used for the shared import manifest's read-modify-write.
    fn read_lines(&self, path: &Path) -> AdmingenResult<Option<Vec<String>>>;
}
