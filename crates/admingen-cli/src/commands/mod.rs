//! Command handlers. Each module translates parsed CLI arguments into
//! core service calls and display; no generation logic lives here.

pub mod completions;
pub mod config;
pub mod generate;
pub mod init;
pub mod list;

use std::path::PathBuf;

use admingen_adapters::{MemorySchemaStore, TomlSchemaLoader};
use admingen_core::application::ports::SchemaProvider;

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Resolve the schema source shared by `generate` and `list`: an explicit
/// manifest directory, the built-in demo set, or the configured default
/// directory — in that order.
pub(crate) fn schema_provider(
    schemas: Option<&PathBuf>,
    demo: bool,
    config: &AppConfig,
) -> CliResult<Box<dyn SchemaProvider>> {
    if demo {
        return Ok(Box::new(
            MemorySchemaStore::with_demo().map_err(CliError::Core)?,
        ));
    }
    let dir = schemas
        .cloned()
        .or_else(|| config.defaults.schemas_dir.clone())
        .ok_or(CliError::NoSchemaSource)?;
    let store = TomlSchemaLoader::new(dir)
        .into_store()
        .map_err(CliError::Core)?;
    Ok(Box::new(store))
}
