//! Filesystem-based schema loader.
//!
//! Discovers and parses entity manifests (`*.toml`) from a directory
//! tree, converting them into domain [`TableSchema`] values ready for the
//! generator. One file describes one entity.
//!
//! # Directory layout expected
//!
//! ```text
//! schemas/
//! ├── customer.toml
//! ├── order.toml
//! └── blog/
//!     ├── post.toml        ← nesting is fine; file name is irrelevant
//!     └── tag.toml
//! ```
//!
//! # Manifest format
//!
//! ```toml
//! [entity]
//! name    = "Order"
//! comment = "Customer orders"
//!
//! [[columns]]
//! name     = "Id"
//! type     = "integer"      # bool | integer | float | decimal |
//! identity = true           # datetime | uuid | text | enum | <custom>
//! primary  = true
//!
//! [[columns]]
//! name     = "CustomerId"
//! type     = "integer"
//! nullable = true
//!
//! [[columns]]
//! name     = "State"
//! type     = "enum"
//! enum_name = "OrderState"
//! variants = ["Open", "Shipped", "Closed"]
//!
//! [[navigations]]
//! property           = "Customer"
//! target             = "Customer"
//! local_columns      = ["CustomerId"]
//! referenced_columns = ["Id"]
//!
//! [[navigations]]
//! property           = "Tags"          # many-to-many via join entity
//! target             = "Tag"
//! join_entity        = "OrderTag"
//! referenced_columns = ["Id"]
//! ```
//!
//! Primary keys are collected from `primary = true` columns in
//! declaration order — the order every composite zip downstream relies
//! on.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use admingen_core::{
    domain::{ColumnInfo, ColumnType, DomainError, NavigationProperty, TableSchema},
    error::AdmingenResult,
};

use crate::schema_store::MemorySchemaStore;

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of one entity manifest.
#[derive(Debug, Deserialize, Clone)]
pub struct SchemaManifest {
    pub entity: EntitySection,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
    #[serde(default)]
    pub navigations: Vec<NavigationEntry>,
}

/// `[entity]` section — identity of the entity.
#[derive(Debug, Deserialize, Clone)]
pub struct EntitySection {
    /// Entity identifier (e.g. `"Order"`). Also the generated type name.
    pub name: String,
    #[serde(default)]
    pub comment: String,
}

/// One entry under `[[columns]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct ColumnEntry {
    pub name: String,
    /// Semantic type tag; unrecognised tags degrade to a plain text
    /// input rather than failing the load.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub comment: String,
    /// Enum support: the Rust enum type name (defaults to the column
    /// name) and its variants.
    #[serde(default)]
    pub enum_name: Option<String>,
    #[serde(default)]
    pub variants: Vec<String>,
    /// Bit-flag enum (renders as multi-select).
    #[serde(default)]
    pub flags: bool,
}

/// One entry under `[[navigations]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct NavigationEntry {
    pub property: String,
    pub target: String,
    #[serde(default)]
    pub local_columns: Vec<String>,
    #[serde(default)]
    pub referenced_columns: Vec<String>,
    #[serde(default)]
    pub join_entity: Option<String>,
    /// Defaults to `true` for reference shapes: most foreign keys are the
    /// many side of a many-to-one.
    #[serde(default = "default_true")]
    pub reciprocal_collection: bool,
    #[serde(default)]
    pub ignored: bool,
}

fn default_true() -> bool {
    true
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`TableSchema`] values from a directory tree of entity
/// manifests.
///
/// Every `*.toml` file under the directory is treated as one entity.
/// Files that fail to parse or validate emit a `WARN` log and are
/// skipped — they do not prevent other entities from loading.
pub struct TomlSchemaLoader {
    schemas_dir: PathBuf,
}

impl TomlSchemaLoader {
    /// Create a loader pointed at `schemas_dir`.
    ///
    /// The directory does not need to exist yet; [`Self::load_all`] will
    /// return an error if it is missing when called.
    pub fn new(schemas_dir: impl Into<PathBuf>) -> Self {
        Self {
            schemas_dir: schemas_dir.into(),
        }
    }

    /// Load every valid schema found under the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSchema`] when the directory itself
    /// does not exist. Individual malformed manifests are skipped with a
    /// `WARN` log rather than failing the whole load.
    #[instrument(skip(self), fields(dir = %self.schemas_dir.display()))]
    pub fn load_all(&self) -> AdmingenResult<Vec<TableSchema>> {
        if !self.schemas_dir.exists() {
            return Err(DomainError::InvalidSchema(format!(
                "schema directory not found: {}",
                self.schemas_dir.display()
            ))
            .into());
        }

        let mut schemas = Vec::new();
        for entry in WalkDir::new(&self.schemas_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "toml") {
                continue;
            }
            match self.load_schema_from_file(path) {
                Ok(schema) => {
                    debug!(entity = %schema.name, file = %path.display(), "schema loaded");
                    schemas.push(schema);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping invalid schema manifest");
                }
            }
        }
        Ok(schemas)
    }

    /// Load everything into a [`MemorySchemaStore`] ready to act as the
    /// generator's schema provider.
    pub fn into_store(self) -> AdmingenResult<MemorySchemaStore> {
        let store = MemorySchemaStore::new();
        for schema in self.load_all()? {
            store.insert(schema)?;
        }
        Ok(store)
    }

    fn load_schema_from_file(&self, path: &Path) -> AdmingenResult<TableSchema> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidSchema(format!("failed to read '{}': {e}", path.display()))
        })?;
        let manifest: SchemaManifest = toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidSchema(format!("failed to parse '{}': {e}", path.display()))
        })?;
        schema_from_manifest(manifest)
    }
}

/// Convert a parsed manifest into a validated domain schema.
pub fn schema_from_manifest(manifest: SchemaManifest) -> AdmingenResult<TableSchema> {
    let mut builder =
        TableSchema::builder(manifest.entity.name).comment(manifest.entity.comment);

    for entry in manifest.columns {
        let ty = column_type(&entry);
        let mut col = ColumnInfo::new(entry.name, ty).comment(entry.comment);
        if entry.nullable {
            col = col.nullable();
        }
        if entry.ignored {
            col = col.ignored();
        }
        if entry.identity {
            col = col.identity();
        }
        if entry.primary {
            col = col.primary();
        }
        builder = builder.column(col);
    }

    for entry in manifest.navigations {
        let mut nav = NavigationProperty {
            property: entry.property,
            target: entry.target,
            local_columns: entry.local_columns,
            referenced_columns: entry.referenced_columns,
            join_entity: entry.join_entity,
            reciprocal_collection: entry.reciprocal_collection,
            ignored: entry.ignored,
        };
        // Collections never carry a reciprocal flag of their own.
        if nav.local_columns.is_empty() && nav.join_entity.is_none() {
            nav.reciprocal_collection = false;
        }
        builder = builder.navigation(nav);
    }

    Ok(builder.build()?)
}

fn column_type(entry: &ColumnEntry) -> ColumnType {
    match entry.ty.to_ascii_lowercase().as_str() {
        "bool" | "boolean" => ColumnType::Bool,
        "int" | "integer" | "long" | "short" | "byte" => ColumnType::Integer,
        "float" | "double" => ColumnType::Float,
        "decimal" | "money" => ColumnType::Decimal,
        "datetime" | "timestamp" | "date" => ColumnType::DateTime,
        "uuid" | "guid" => ColumnType::Uuid,
        "string" | "text" => ColumnType::Text,
        "enum" => ColumnType::Enum {
            name: entry
                .enum_name
                .clone()
                .unwrap_or_else(|| entry.name.clone()),
            variants: entry.variants.clone(),
            flags: entry.flags,
        },
        other => ColumnType::Other(other.to_string()),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const ORDER_TOML: &str = r#"
[entity]
name = "Order"
comment = "Customer orders"

[[columns]]
name = "Id"
type = "integer"
identity = true
primary = true

[[columns]]
name = "No"
type = "text"

[[columns]]
name = "CustomerId"
type = "integer"
nullable = true

[[navigations]]
property = "Customer"
target = "Customer"
local_columns = ["CustomerId"]
referenced_columns = ["Id"]
"#;

    #[test]
    fn parses_a_full_manifest() {
        let manifest: SchemaManifest = toml::from_str(ORDER_TOML).unwrap();
        let schema = schema_from_manifest(manifest).unwrap();
        assert_eq!(schema.name, "Order");
        assert_eq!(schema.primary_keys, vec!["Id"]);
        assert_eq!(schema.navigations.len(), 1);
        assert!(schema.navigations[0].reciprocal_collection);
    }

    #[test]
    fn enum_columns_carry_variants() {
        let toml_src = r#"
[entity]
name = "Order"

[[columns]]
name = "Id"
type = "integer"
primary = true

[[columns]]
name = "State"
type = "enum"
enum_name = "OrderState"
variants = ["Open", "Closed"]
"#;
        let manifest: SchemaManifest = toml::from_str(toml_src).unwrap();
        let schema = schema_from_manifest(manifest).unwrap();
        match &schema.column("State").unwrap().ty {
            ColumnType::Enum { name, variants, flags } => {
                assert_eq!(name, "OrderState");
                assert_eq!(variants.len(), 2);
                assert!(!flags);
            }
            other => panic!("expected enum, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_tag_degrades_to_other() {
        let entry = ColumnEntry {
            name: "Shape".into(),
            ty: "geometry".into(),
            nullable: false,
            ignored: false,
            identity: false,
            primary: false,
            comment: String::new(),
            enum_name: None,
            variants: vec![],
            flags: false,
        };
        assert_eq!(column_type(&entry), ColumnType::Other("geometry".into()));
    }

    #[test]
    fn load_all_reads_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("order.toml"), ORDER_TOML).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(
            dir.path().join("nested/customer.toml"),
            r#"
[entity]
name = "Customer"

[[columns]]
name = "Id"
type = "integer"
primary = true

[[columns]]
name = "Name"
type = "text"
"#,
        )
        .unwrap();

        let schemas = TomlSchemaLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(schemas.len(), 2);
    }

    #[test]
    fn malformed_manifest_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("good.toml"), ORDER_TOML).unwrap();
        fs::write(dir.path().join("bad.toml"), "this is not toml [").unwrap();

        let schemas = TomlSchemaLoader::new(dir.path()).load_all().unwrap();
        assert_eq!(schemas.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let loader = TomlSchemaLoader::new("/definitely/not/here");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn into_store_resolves_loaded_entities() {
        use admingen_core::application::ports::SchemaProvider;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("order.toml"), ORDER_TOML).unwrap();
        let store = TomlSchemaLoader::new(dir.path()).into_store().unwrap();
        assert!(store.resolve("Order").is_ok());
        assert!(store.resolve("Ghost").is_err());
    }
}
