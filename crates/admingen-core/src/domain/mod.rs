// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Admingen.
//!
//! This module contains pure generation logic with ZERO I/O:
//! schema model, relation classification, plan derivation, name
//! allocation, and manifest merging. Schema resolution and file writing
//! happen behind ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: generation is synchronous
//! - **No I/O**: no filesystem, network, or external calls
//! - **Immutable values**: schemas and plans are Clone + PartialEq
//! - **Rich domain model**: behavior lives on the types, not services
//!
// Public API - what the world sees
pub mod error;
pub mod manifest;
pub mod names;
pub mod plan;
pub mod relation;
pub mod schema;

// Re-exports for convenience
pub use error::{DomainError, ErrorCategory};
pub use manifest::ImportManifest;
pub use names::{COMBINED_SEPARATOR, NameAllocator, combined_key, snake_case};
pub use plan::{
    AssociationSpec, ColumnField, FieldControl, FilterComponent, FilterParam, FormField,
    GenerationPlan, IncludeDirective, ListColumn, ReferenceField, RelationPlanner, SearchColumn,
};
pub use relation::{Cardinality, Classification, Relation, RelationClassifier, SchemaMap};
pub use schema::{
    ColumnInfo, ColumnType, NavigationProperty, TableSchema, TableSchemaBuilder,
};
