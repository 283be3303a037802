//! Schema data model: the contract between the generator and whatever
//! describes the entities.
//!
//! A [`TableSchema`] is a fully resolved *value* — the generator never
//! introspects live types or a database. Schema providers (in-memory
//! registry, TOML manifests, a real ORM bridge) are adapters behind the
//! `SchemaProvider` port; by the time a schema reaches the planner it is
//! plain data.
//!
//! ## Invariants (enforced by `validate()`)
//!
//! 1. The entity identifier is non-empty
//! 2. Column names are unique within the schema
//! 3. Every declared primary-key column exists and carries the primary flag
//!
//! Navigation properties are *not* validated here beyond shape — resolving
//! them against other schemas is the classifier's job, and an unresolvable
//! navigation degrades generation rather than failing it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// Column semantics
// ============================================================================

/// Semantic column type family.
///
/// Deliberately coarser than any SQL or language type system: the emitter
/// only needs to know which *input control* and which *Rust surface type*
/// a column maps to. Anything the generator does not recognise arrives as
/// [`ColumnType::Other`] and falls back to a plain text input — unknown
/// types degrade, they never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    /// Whole-number family (any width, signed or not).
    Integer,
    /// Binary floating point.
    Float,
    /// Exact decimal (money and friends).
    Decimal,
    DateTime,
    /// Generated unique identifier. Primary keys of this type are never
    /// accepted on create — the store assigns them.
    Uuid,
    /// Free text.
    Text,
    /// Enumerated type with a closed set of variants. `flags` marks a
    /// bit-flag set, which renders as a multi-select.
    Enum {
        name: String,
        variants: Vec<String>,
        #[serde(default)]
        flags: bool,
    },
    /// Anything unrecognised; carries the provider's tag for diagnostics.
    Other(String),
}

impl ColumnType {
    /// `true` for free-text columns — the ones the free-text search ORs over.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }

    /// The Rust type the emitted controller uses for this column.
    pub fn rust_type(&self) -> &str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "i64",
            Self::Float => "f64",
            Self::Decimal => "Decimal",
            Self::DateTime => "DateTime<Utc>",
            Self::Uuid => "Uuid",
            Self::Text => "String",
            Self::Enum { name, .. } => name,
            // No better mapping — round-trip as text.
            Self::Other(_) => "String",
        }
    }

    /// The Rust parameter type honouring nullability.
    pub fn param_type(&self, nullable: bool) -> String {
        if nullable {
            format!("Option<{}>", self.rust_type())
        } else {
            self.rust_type().to_string()
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { name, .. } => write!(f, "enum {name}"),
            Self::Other(tag) => write!(f, "other({tag})"),
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Decimal => write!(f, "decimal"),
            Self::DateTime => write!(f, "datetime"),
            Self::Uuid => write!(f, "uuid"),
            Self::Text => write!(f, "text"),
        }
    }
}

// ============================================================================
// Columns
// ============================================================================

/// One resolved column. Immutable once built — the fluent setters exist for
/// construction only and consume `self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ColumnType,
    #[serde(default)]
    pub nullable: bool,
    /// Excluded from every generated surface.
    #[serde(default)]
    pub ignored: bool,
    /// Store-assigned (auto-increment); never accepted on create.
    #[serde(default)]
    pub identity: bool,
    /// Member of the primary key.
    #[serde(default)]
    pub primary: bool,
    /// Display comment; first line is used as the human label.
    #[serde(default)]
    pub comment: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            ignored: false,
            identity: false,
            primary: false,
            comment: String::new(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Human label: first line of the comment, or the column name.
    pub fn label(&self) -> &str {
        first_line_or(&self.comment, &self.name)
    }
}

// ============================================================================
// Navigation properties
// ============================================================================

/// Raw relationship declaration as supplied by the schema provider.
///
/// This is *pre-classification* data: the provider states what it knows
/// (columns on this side, columns on the referenced side, an optional join
/// entity) and the [`RelationClassifier`](crate::domain::relation) decides
/// the cardinality. Keeping the raw shape separate from the classified
/// [`Relation`](crate::domain::relation::Relation) means a provider never
/// has to understand the generator's rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationProperty {
    /// Property name on the owning entity (e.g. `Customer`, `Tags`).
    pub property: String,
    /// Referenced entity identifier.
    pub target: String,
    /// Foreign-key columns on the owning side, in declared order.
    #[serde(default)]
    pub local_columns: Vec<String>,
    /// Key columns on the referenced side, aligned positionally with
    /// `local_columns` (or standing alone for many-to-many).
    #[serde(default)]
    pub referenced_columns: Vec<String>,
    /// Join (middle) entity identifier — presence marks a many-to-many.
    #[serde(default)]
    pub join_entity: Option<String>,
    /// Whether the referenced side declares a collection back to this
    /// entity. Disambiguates many-to-one from one-to-one.
    #[serde(default)]
    pub reciprocal_collection: bool,
    #[serde(default)]
    pub ignored: bool,
}

impl NavigationProperty {
    /// Reference declaration (many-to-one / one-to-one shape).
    pub fn reference(
        property: impl Into<String>,
        target: impl Into<String>,
        local_columns: Vec<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            property: property.into(),
            target: target.into(),
            local_columns,
            referenced_columns,
            join_entity: None,
            reciprocal_collection: true,
            ignored: false,
        }
    }

    /// Collection declaration (one-to-many shape; no columns on this side).
    pub fn collection(property: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            target: target.into(),
            local_columns: Vec::new(),
            referenced_columns: Vec::new(),
            join_entity: None,
            reciprocal_collection: false,
            ignored: false,
        }
    }

    /// Many-to-many declaration through `join_entity`.
    pub fn many_to_many(
        property: impl Into<String>,
        target: impl Into<String>,
        join_entity: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            property: property.into(),
            target: target.into(),
            local_columns: Vec::new(),
            referenced_columns,
            join_entity: Some(join_entity.into()),
            reciprocal_collection: false,
            ignored: false,
        }
    }

    pub fn one_to_one(mut self) -> Self {
        self.reciprocal_collection = false;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}

// ============================================================================
// TableSchema
// ============================================================================

/// Fully resolved description of one entity.
///
/// Columns and primary keys are ordered; order is load-bearing (composite
/// parameter zipping, display precedence) and must survive round-trips
/// through providers unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Entity identifier (e.g. `Order`). Also the generated type name.
    pub name: String,
    /// Display comment; first line is the list/menu label.
    #[serde(default)]
    pub comment: String,
    pub columns: Vec<ColumnInfo>,
    /// Primary-key column names in key order (possibly composite).
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub navigations: Vec<NavigationProperty>,
}

impl TableSchema {
    pub fn builder(name: impl Into<String>) -> TableSchemaBuilder {
        TableSchemaBuilder {
            schema: Self {
                name: name.into(),
                comment: String::new(),
                columns: Vec::new(),
                primary_keys: Vec::new(),
                navigations: Vec::new(),
            },
        }
    }

    /// Validate structural invariants. Providers should call this before
    /// handing a schema to the generator.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidSchema(
                "entity identifier cannot be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DomainError::DuplicateColumn {
                    entity: self.name.clone(),
                    column: col.name.clone(),
                });
            }
        }

        for pk in &self.primary_keys {
            match self.column(pk) {
                Some(col) if col.primary => {}
                Some(_) => {
                    return Err(DomainError::InvalidSchema(format!(
                        "column '{pk}' of '{}' is listed as a primary key but not flagged primary",
                        self.name
                    )));
                }
                None => {
                    return Err(DomainError::UnknownPrimaryKey {
                        entity: self.name.clone(),
                        column: pk.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// `true` if `name` is one of this schema's own columns.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Primary-key columns in declared key order.
    pub fn primary_columns(&self) -> Vec<&ColumnInfo> {
        self.primary_keys
            .iter()
            .filter_map(|pk| self.column(pk))
            .collect()
    }

    /// First text-typed, non-ignored column — the best-effort display
    /// column when this entity appears on the referencing side of a
    /// dropdown or search.
    pub fn display_column(&self) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| !c.ignored && c.ty.is_text())
    }

    /// Human label: first line of the comment, or the entity identifier.
    pub fn label(&self) -> &str {
        first_line_or(&self.comment, &self.name)
    }

    /// Non-ignored columns in declaration order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnInfo> {
        self.columns.iter().filter(|c| !c.ignored)
    }
}

/// Fluent construction for schemas.
///
/// Primary keys are collected automatically from columns flagged
/// [`ColumnInfo::primary`], in declaration order — which is exactly the
/// key order every downstream zip relies on.
pub struct TableSchemaBuilder {
    schema: TableSchema,
}

impl TableSchemaBuilder {
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.schema.comment = comment.into();
        self
    }

    pub fn column(mut self, column: ColumnInfo) -> Self {
        if column.primary {
            self.schema.primary_keys.push(column.name.clone());
        }
        self.schema.columns.push(column);
        self
    }

    pub fn navigation(mut self, nav: NavigationProperty) -> Self {
        self.schema.navigations.push(nav);
        self
    }

    pub fn build(self) -> Result<TableSchema, DomainError> {
        self.schema.validate()?;
        Ok(self.schema)
    }
}

/// First line of `text`, trimmed, or `fallback` when empty.
pub(crate) fn first_line_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    let first = text.lines().next().map(str::trim).unwrap_or("");
    if first.is_empty() { fallback } else { first }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn order_schema() -> TableSchema {
        TableSchema::builder("Order")
            .comment("Customer orders\nsecond line is ignored")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("No", ColumnType::Text))
            .column(ColumnInfo::new("CustomerId", ColumnType::Integer).nullable())
            .build()
            .unwrap()
    }

    #[test]
    fn builder_collects_primary_keys_in_order() {
        let schema = TableSchema::builder("Pair")
            .column(ColumnInfo::new("A", ColumnType::Integer).primary())
            .column(ColumnInfo::new("B", ColumnType::Integer).primary())
            .build()
            .unwrap();
        assert_eq!(schema.primary_keys, vec!["A", "B"]);
    }

    #[test]
    fn duplicate_column_rejected() {
        let result = TableSchema::builder("Bad")
            .column(ColumnInfo::new("X", ColumnType::Text))
            .column(ColumnInfo::new("X", ColumnType::Integer))
            .build();
        assert!(matches!(result, Err(DomainError::DuplicateColumn { .. })));
    }

    #[test]
    fn unknown_primary_key_rejected() {
        let mut schema = order_schema();
        schema.primary_keys.push("Missing".into());
        assert!(matches!(
            schema.validate(),
            Err(DomainError::UnknownPrimaryKey { .. })
        ));
    }

    #[test]
    fn display_column_is_first_text_column() {
        let schema = order_schema();
        assert_eq!(schema.display_column().unwrap().name, "No");
    }

    #[test]
    fn display_column_skips_ignored() {
        let schema = TableSchema::builder("T")
            .column(ColumnInfo::new("Id", ColumnType::Integer).primary())
            .column(ColumnInfo::new("Secret", ColumnType::Text).ignored())
            .column(ColumnInfo::new("Name", ColumnType::Text))
            .build()
            .unwrap();
        assert_eq!(schema.display_column().unwrap().name, "Name");
    }

    #[test]
    fn label_uses_first_comment_line() {
        let schema = order_schema();
        assert_eq!(schema.label(), "Customer orders");
    }

    #[test]
    fn label_falls_back_to_name() {
        let col = ColumnInfo::new("CustomerId", ColumnType::Integer);
        assert_eq!(col.label(), "CustomerId");
    }

    #[test]
    fn param_type_wraps_nullable() {
        assert_eq!(ColumnType::Integer.param_type(true), "Option<i64>");
        assert_eq!(ColumnType::Text.param_type(false), "String");
    }

    #[test]
    fn enum_rust_type_is_its_name() {
        let ty = ColumnType::Enum {
            name: "OrderState".into(),
            variants: vec!["Open".into(), "Closed".into()],
            flags: false,
        };
        assert_eq!(ty.rust_type(), "OrderState");
    }

    #[test]
    fn other_type_degrades_to_string() {
        assert_eq!(ColumnType::Other("geometry".into()).rust_type(), "String");
    }
}
