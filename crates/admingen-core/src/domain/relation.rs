//! Relation classification: raw navigation properties → typed relations.
//!
//! The classifier is the first half of the generation engine. It never
//! renders anything; it only decides, for every navigation property of a
//! schema, *what kind* of relationship it is and which column sets carry
//! it. The [`RelationPlanner`](crate::domain::plan::RelationPlanner)
//! consumes the result.
//!
//! ## Classification rules
//!
//! | Evidence                                             | Cardinality |
//! |------------------------------------------------------|-------------|
//! | Names a join (middle) entity                         | ManyToMany  |
//! | Local columns all exist on the owning schema, target declares a reciprocal collection | ManyToOne |
//! | Local columns all exist on the owning schema, no reciprocal collection | OneToOne |
//! | No local columns on this side                        | OneToMany   |
//!
//! Anything that fits none of these — or that references a schema the
//! batch cannot see — is **excluded** from generation with a warning
//! rather than raised as an error: one unsupported reference must not
//! take down an otherwise generatable entity.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::schema::TableSchema;

/// Resolved schemas visible to one generation batch, keyed by entity
/// identifier. `BTreeMap` keeps iteration deterministic.
pub type SchemaMap = BTreeMap<String, TableSchema>;

/// The one/many shape of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    ManyToOne,
    OneToOne,
    /// Collection side of a reference; carries no filter/form surface of
    /// its own and is skipped by the planner.
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    /// `true` for the reference shapes that own foreign-key columns.
    pub fn is_reference(self) -> bool {
        matches!(self, Self::ManyToOne | Self::OneToOne)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ManyToOne => "many-to-one",
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToMany => "many-to-many",
        };
        f.write_str(s)
    }
}

/// One classified relationship of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub cardinality: Cardinality,
    /// Owning navigation property name.
    pub property: String,
    /// Foreign-key columns on the owning side, declared order.
    pub local_columns: Vec<String>,
    /// Key columns on the referenced side, aligned with `local_columns`
    /// for references; the association key column(s) for many-to-many.
    pub referenced_columns: Vec<String>,
    /// Referenced entity identifier.
    pub target: String,
    /// Join entity identifier (many-to-many only).
    pub join_entity: Option<String>,
    /// Self-reference: target equals the owning entity. Hierarchical
    /// relations render as tree selectors, never flat dropdowns.
    pub hierarchical: bool,
}

impl Relation {
    /// Structural invariant for reference relations: local and referenced
    /// column lists are non-empty and pair up positionally.
    pub fn validate(&self, entity: &str) -> Result<(), DomainError> {
        if self.cardinality.is_reference() {
            if self.local_columns.is_empty() || self.referenced_columns.is_empty() {
                return Err(DomainError::InvalidRelation {
                    entity: entity.into(),
                    property: self.property.clone(),
                    reason: "reference relation must declare local and referenced columns".into(),
                });
            }
            if self.local_columns.len() != self.referenced_columns.len() {
                return Err(DomainError::InvalidRelation {
                    entity: entity.into(),
                    property: self.property.clone(),
                    reason: format!(
                        "{} local column(s) vs {} referenced column(s)",
                        self.local_columns.len(),
                        self.referenced_columns.len()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Composite reference (more than one foreign-key column).
    pub fn is_composite(&self) -> bool {
        self.local_columns.len() > 1
    }
}

/// Outcome of classifying one schema's navigation properties.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Relations in navigation declaration order.
    pub relations: Vec<Relation>,
    /// Property names excluded from generation (unsupported or
    /// unresolvable shapes). Reported, never fatal.
    pub excluded: Vec<String>,
}

/// Classifies navigation properties against the batch's schema map.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationClassifier;

impl RelationClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify every non-ignored navigation property of `schema`.
    pub fn classify(&self, schema: &TableSchema, known: &SchemaMap) -> Classification {
        let mut out = Classification::default();

        for nav in &schema.navigations {
            if nav.ignored {
                continue;
            }

            // A reference into a schema the batch cannot see gives the
            // planner nothing to resolve display columns or key types
            // against; degrade rather than fail.
            if !known.contains_key(&nav.target) {
                warn!(
                    entity = %schema.name,
                    property = %nav.property,
                    target = %nav.target,
                    "excluding relation: referenced schema not available"
                );
                out.excluded.push(nav.property.clone());
                continue;
            }

            if let Some(join) = &nav.join_entity {
                if nav.referenced_columns.is_empty() {
                    warn!(
                        entity = %schema.name,
                        property = %nav.property,
                        "excluding many-to-many relation without referenced key columns"
                    );
                    out.excluded.push(nav.property.clone());
                    continue;
                }
                out.relations.push(Relation {
                    cardinality: Cardinality::ManyToMany,
                    property: nav.property.clone(),
                    local_columns: Vec::new(),
                    referenced_columns: nav.referenced_columns.clone(),
                    target: nav.target.clone(),
                    join_entity: Some(join.clone()),
                    hierarchical: false,
                });
                continue;
            }

            if nav.local_columns.is_empty() {
                // Collection side; no surface of its own.
                out.relations.push(Relation {
                    cardinality: Cardinality::OneToMany,
                    property: nav.property.clone(),
                    local_columns: Vec::new(),
                    referenced_columns: Vec::new(),
                    target: nav.target.clone(),
                    join_entity: None,
                    hierarchical: false,
                });
                continue;
            }

            // Reference shape: every declared local column must resolve to
            // an actual, non-ignored column of the owning schema.
            let resolvable = nav.local_columns.iter().all(|c| {
                schema
                    .column(c)
                    .map(|col| !col.ignored)
                    .unwrap_or(false)
            });
            if !resolvable || nav.referenced_columns.len() != nav.local_columns.len() {
                warn!(
                    entity = %schema.name,
                    property = %nav.property,
                    "excluding relation with unresolvable or misaligned columns"
                );
                out.excluded.push(nav.property.clone());
                continue;
            }

            let cardinality = if nav.reciprocal_collection {
                Cardinality::ManyToOne
            } else {
                Cardinality::OneToOne
            };

            out.relations.push(Relation {
                cardinality,
                property: nav.property.clone(),
                local_columns: nav.local_columns.clone(),
                referenced_columns: nav.referenced_columns.clone(),
                target: nav.target.clone(),
                join_entity: None,
                hierarchical: nav.target == schema.name,
            });
        }

        out
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
