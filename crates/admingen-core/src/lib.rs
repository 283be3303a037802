//! Admingen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the
//! Admingen CRUD scaffolding generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          admingen-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │          (GeneratorService)             │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: SchemaProvider, OutputSink)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     admingen-adapters (Infrastructure)  │
//! │  (MemorySchemaStore, LocalOutputSink)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (TableSchema, Relation, GenerationPlan)│
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use admingen_core::{
//!     application::{GeneratorOptions, GeneratorService},
//! };
//!
//! // Use application service (with injected adapters)
//! let service = GeneratorService::new(schemas, sink);
//! let report = service.generate(&entities, &GeneratorOptions::default())?;
//! println!("wrote {} files", report.files_written);
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Artifact emission (controller / list view / edit view)
pub mod emit;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BatchReport, GeneratorOptions, GeneratorService,
        ports::{OutputSink, SchemaProvider},
    };
    pub use crate::domain::{
        Cardinality, ColumnInfo, ColumnType, GenerationPlan, ImportManifest, NavigationProperty,
        Relation, RelationClassifier, RelationPlanner, SchemaMap, TableSchema,
    };
    pub use crate::emit::{ArtifactEmitter, EmitterConfig};
    pub use crate::error::{AdmingenError, AdmingenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
