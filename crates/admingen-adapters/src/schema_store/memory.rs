//! In-memory schema store.
//!
//! The registry the CLI demo mode and the tests run against; also the
//! natural backing for providers that resolve everything up front (e.g.
//! the TOML loader).

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use admingen_core::{
    application::{ApplicationError, ports::SchemaProvider},
    domain::TableSchema,
    error::AdmingenResult,
};

use crate::fixtures;

/// Thread-safe in-memory schema store.
#[derive(Clone)]
pub struct MemorySchemaStore {
    inner: Arc<RwLock<HashMap<String, TableSchema>>>,
}

impl MemorySchemaStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a store pre-loaded with the built-in demo schemas.
    pub fn with_demo() -> AdmingenResult<Self> {
        let store = Self::new();
        for schema in fixtures::demo_schemas() {
            store.insert(schema)?;
        }
        Ok(store)
    }

    /// Insert or replace a schema. The schema is validated first — a
    /// malformed schema never enters the store.
    pub fn insert(&self, schema: TableSchema) -> AdmingenResult<()> {
        schema.validate()?;
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLock)?;
        inner.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Get the number of schemas.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all schemas.
    pub fn clear(&self) -> AdmingenResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLock)?;
        inner.clear();
        Ok(())
    }
}

impl Default for MemorySchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for MemorySchemaStore {
    fn resolve(&self, entity: &str) -> AdmingenResult<TableSchema> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLock)?;
        inner.get(entity).cloned().ok_or_else(|| {
            ApplicationError::SchemaNotFound {
                entity: entity.into(),
            }
            .into()
        })
    }

    fn list(&self) -> AdmingenResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLock)?;
        let mut names: Vec<String> = inner.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
