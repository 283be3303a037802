//! Infrastructure adapters for Admingen.
//!
//! This crate implements the ports defined in
//! `admingen-core::application::ports`. It contains all external
//! dependencies and I/O operations.

pub mod fixtures;
pub mod schema_loader;
pub mod schema_store;
pub mod sink;

// Re-export commonly used adapters
pub use schema_loader::TomlSchemaLoader;
pub use schema_store::MemorySchemaStore;
pub use sink::{LocalOutputSink, MemoryOutputSink};
