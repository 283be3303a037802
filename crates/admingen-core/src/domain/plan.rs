//! Relation planning: classified relations → a typed [`GenerationPlan`].
//!
//! The plan is the single source of truth the three emitters render from.
//! Everything the controller accepts, the list view filters on, and the
//! edit view binds is derived *here, once* — the emitters only format.
//! That is what keeps the three artifacts from contradicting each other:
//! there is no second place a parameter name could come from.
//!
//! A plan is built for one entity, handed to one emission pass, and
//! dropped. It is never persisted.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::names::NameAllocator;
use crate::domain::relation::{Cardinality, Relation, SchemaMap};
use crate::domain::schema::{ColumnInfo, ColumnType, TableSchema};

// ============================================================================
// Filter parameters
// ============================================================================

/// One positional component of a composite reference filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterComponent {
    /// Wire parameter name (`<property>_<referencedColumn>`).
    pub name: String,
    /// Local foreign-key column this component matches.
    pub local: String,
    /// Referenced key column this component is aligned with.
    pub referenced: String,
    pub ty: ColumnType,
}

/// A filter parameter the generated list operation accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterParam {
    /// Single-column reference: array parameter, IN-match on one local
    /// column.
    Scalar {
        name: String,
        local: String,
        ty: ColumnType,
    },
    /// Composite reference: one wire array per component, plus a derived
    /// combined value (`<property>_multi`) the query actually matches.
    /// Components are zipped pairwise in declared column order and joined
    /// with the reserved `|` separator — never reordered.
    Composite {
        property: String,
        /// Name of the derived combined variable (not a wire parameter).
        combined: String,
        components: Vec<FilterComponent>,
    },
    /// Many-to-many: array parameter tested for intersection with the
    /// entity's association set.
    Association {
        name: String,
        property: String,
        referenced: String,
        ty: ColumnType,
    },
}

impl FilterParam {
    /// Wire parameter names this filter contributes (the combined name of
    /// a composite filter is derived in the controller, not accepted on
    /// the wire).
    pub fn wire_names(&self) -> Vec<&str> {
        match self {
            Self::Scalar { name, .. } | Self::Association { name, .. } => vec![name],
            Self::Composite { components, .. } => {
                components.iter().map(|c| c.name.as_str()).collect()
            }
        }
    }
}

/// Navigation property the list/edit queries eagerly load.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeDirective {
    pub property: String,
    /// `true` for collection loads (many-to-many on the edit form).
    pub many: bool,
}

/// One column the free-text search ORs over. `property` is set when the
/// column lives on an included reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchColumn {
    pub property: Option<String>,
    pub column: String,
}

impl SearchColumn {
    /// Dotted access path inside the generated query (`No`,
    /// `Customer.Name`).
    pub fn path(&self) -> String {
        match &self.property {
            Some(p) => format!("{p}.{}", self.column),
            None => self.column.clone(),
        }
    }
}

// ============================================================================
// Form fields
// ============================================================================

/// Input control rendered for a scalar column on the edit form.
///
/// Selection is a pure function of the column's semantic type plus name
/// heuristics (see [`FieldControl::for_column`]); unrecognised shapes fall
/// back to [`FieldControl::Text`], never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    Checkbox,
    /// Masked whole-number input.
    NumberMasked,
    /// Currency-styled masked input (floating point and decimals).
    CurrencyMasked,
    /// Date picker; `audit` marks create/update timestamps that render
    /// read-only.
    DatePicker { audit: bool },
    /// Dropdown over enum variants; multi-select for bit-flag sets.
    EnumSelect {
        variants: Vec<String>,
        multiple: bool,
    },
    /// Text input plus file-upload control (image/path-like names).
    TextWithUpload,
    /// Multi-line editor (long-text-like names).
    MultiLine,
    /// Plain text input — also the fallback for anything unrecognised.
    Text,
}

impl FieldControl {
    /// Pick the control for a column.
    pub fn for_column(col: &ColumnInfo) -> Self {
        let lname = col.name.to_lowercase();
        match &col.ty {
            ColumnType::Bool => Self::Checkbox,
            ColumnType::Integer => Self::NumberMasked,
            ColumnType::Float | ColumnType::Decimal => Self::CurrencyMasked,
            ColumnType::DateTime => Self::DatePicker {
                audit: is_audit_timestamp(&lname),
            },
            ColumnType::Enum {
                variants, flags, ..
            } => Self::EnumSelect {
                variants: variants.clone(),
                multiple: *flags,
            },
            ColumnType::Text if is_upload_name(&lname) => Self::TextWithUpload,
            ColumnType::Text if is_long_text_name(&lname) => Self::MultiLine,
            ColumnType::Uuid | ColumnType::Text | ColumnType::Other(_) => Self::Text,
        }
    }
}

fn is_audit_timestamp(lname: &str) -> bool {
    matches!(lname, "create_time" | "update_time")
}

fn is_upload_name(lname: &str) -> bool {
    for stem in ["img", "path"] {
        if lname == stem
            || lname.starts_with(&format!("{stem}_"))
            || lname.ends_with(&format!("_{stem}"))
        {
            return true;
        }
    }
    false
}

fn is_long_text_name(lname: &str) -> bool {
    matches!(
        lname,
        "content" | "text" | "descript" | "description" | "reason" | "html" | "data"
    )
}

/// A scalar column rendered on the edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnField {
    pub column: String,
    pub label: String,
    pub control: FieldControl,
    /// Store-assigned keys (identity / uuid) render read-only and only in
    /// edit mode.
    pub read_only: bool,
}

/// A many-to-one / one-to-one reference rendered as a dropdown or tree
/// selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceField {
    pub property: String,
    pub target: String,
    /// Row label: the local columns' labels, declaration order.
    pub row_label: String,
    /// Filter-bar label: the referenced entity's label.
    pub filter_label: String,
    pub local_columns: Vec<String>,
    pub referenced_columns: Vec<String>,
    /// Best-effort text column on the referenced schema; `None` falls
    /// back to the combined key itself.
    pub display_column: Option<String>,
    /// Self-reference: render a tree selector over a single combined
    /// value, never a flat dropdown.
    pub hierarchical: bool,
    /// View-context variable holding the referenced instances
    /// (`fk_<property>`).
    pub context_var: String,
    /// Form input name: the single local column, or the locals joined
    /// with `,` for selectors binding a composite key as one combined
    /// value.
    pub input_name: String,
}

impl ReferenceField {
    /// Wire name of the single-column filter this reference derives;
    /// `None` for composite references (they filter via components).
    pub fn scalar_wire_name(&self) -> Option<String> {
        if self.local_columns.len() == 1 {
            Some(format!("{}_{}", self.property, self.referenced_columns[0]))
        } else {
            None
        }
    }
}

/// A many-to-many association: multi-select field plus replace-all
/// persistence.
///
/// There is deliberately no diff step: the emitted update always
/// replaces the full association set, so the plan never needs the prior
/// state. Consequence: concurrent editors race and the last writer's
/// full set wins.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationSpec {
    pub property: String,
    pub target: String,
    /// Single referenced key column (composite association keys are
    /// unsupported and never reach the plan).
    pub referenced: String,
    /// Wire parameter (`mn_<property>_<referencedColumn>`), shared by the
    /// list filter and the create/update forms.
    pub param: String,
    pub ty: ColumnType,
    pub display_column: Option<String>,
    /// View-context variable (`mn_<property>`).
    pub context_var: String,
    pub label: String,
}

/// Ordered edit-form surface.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    /// Primary-key column (first).
    Key(ColumnField),
    /// Reference selector (after keys).
    Reference(ReferenceField),
    /// Remaining scalar column, declaration order.
    Scalar(ColumnField),
    /// Many-to-many multi-select (last).
    MultiSelect(AssociationSpec),
}

/// Ordered list-view surface. Same precedence as the edit form, minus
/// associations (the list renders no many-to-many column).
#[derive(Debug, Clone, PartialEq)]
pub enum ListColumn {
    Key {
        column: String,
        label: String,
        identity: bool,
    },
    Reference {
        property: String,
        local_columns: Vec<String>,
        label: String,
        display_column: Option<String>,
    },
    Scalar {
        column: String,
        label: String,
    },
}

impl ListColumn {
    /// Schema column names this list column renders.
    pub fn column_names(&self) -> Vec<&str> {
        match self {
            Self::Key { column, .. } | Self::Scalar { column, .. } => vec![column],
            Self::Reference { local_columns, .. } => {
                local_columns.iter().map(String::as_str).collect()
            }
        }
    }
}

// ============================================================================
// GenerationPlan
// ============================================================================

/// Per-entity aggregate of everything the emitters need.
#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    pub entity: String,
    pub filters: Vec<FilterParam>,
    pub includes: Vec<IncludeDirective>,
    pub search: Vec<SearchColumn>,
    pub list_columns: Vec<ListColumn>,
    pub fields: Vec<FormField>,
    pub associations: Vec<AssociationSpec>,
    /// Properties dropped by the planner (unsupported shapes). Reported
    /// alongside the classifier's exclusions, never fatal.
    pub excluded: Vec<String>,
}

impl GenerationPlan {
    /// Reference fields in plan order (dropdowns and tree selectors).
    pub fn reference_fields(&self) -> impl Iterator<Item = &ReferenceField> {
        self.fields.iter().filter_map(|f| match f {
            FormField::Reference(r) => Some(r),
            _ => None,
        })
    }

    /// All wire parameter names the list operation accepts, in plan order.
    pub fn wire_filter_names(&self) -> Vec<&str> {
        self.filters.iter().flat_map(|f| f.wire_names()).collect()
    }

    /// Derived names used by more than one relation.
    ///
    /// Collisions are *reported*, not repaired: silently renaming a
    /// parameter would change the wire contract of previously generated
    /// consumers. The orchestrator logs these; callers that want hard
    /// failure use [`Self::ensure_unique_names`].
    pub fn name_collisions(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in self.wire_filter_names() {
            *counts.entry(name).or_default() += 1;
        }
        let mut collisions: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(name, _)| name.to_string())
            .collect();
        collisions.sort();
        collisions
    }

    /// Fail on the first derived-name collision.
    pub fn ensure_unique_names(&self) -> Result<(), DomainError> {
        match self.name_collisions().into_iter().next() {
            Some(name) => Err(DomainError::NameCollision {
                entity: self.entity.clone(),
                name,
            }),
            None => Ok(()),
        }
    }
}

// ============================================================================
// RelationPlanner
// ============================================================================

/// Builds a [`GenerationPlan`] from a schema and its classified relations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationPlanner {
    names: NameAllocator,
}

impl RelationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(
        &self,
        schema: &TableSchema,
        relations: &[Relation],
        known: &SchemaMap,
    ) -> GenerationPlan {
        let mut plan = GenerationPlan {
            entity: schema.name.clone(),
            ..Default::default()
        };

        // Free-text search: every text column of the entity itself...
        for col in schema.visible_columns().filter(|c| c.ty.is_text()) {
            plan.search.push(SearchColumn {
                property: None,
                column: col.name.clone(),
            });
        }

        for rel in relations {
            match rel.cardinality {
                Cardinality::ManyToOne | Cardinality::OneToOne => {
                    self.plan_reference(schema, rel, known, &mut plan);
                }
                Cardinality::ManyToMany => {
                    self.plan_association(rel, known, &mut plan);
                }
                // Collection side: no filter/form surface of its own.
                Cardinality::OneToMany => {}
            }
        }

        self.assemble_rows(schema, relations, known, &mut plan);
        plan
    }

    fn plan_reference(
        &self,
        schema: &TableSchema,
        rel: &Relation,
        known: &SchemaMap,
        plan: &mut GenerationPlan,
    ) {
        // The classifier guarantees the target is resolvable; relations
        // assembled by hand may not be.
        let Some(target) = known.get(&rel.target) else {
            plan.excluded.push(rel.property.clone());
            return;
        };

        plan.includes.push(IncludeDirective {
            property: rel.property.clone(),
            many: false,
        });

        // ...plus every text column of each included reference.
        for col in target.visible_columns().filter(|c| c.ty.is_text()) {
            plan.search.push(SearchColumn {
                property: Some(rel.property.clone()),
                column: col.name.clone(),
            });
        }

        let ty_of = |name: &str| {
            schema
                .column(name)
                .map(|c| c.ty.clone())
                .unwrap_or(ColumnType::Other("unresolved".into()))
        };

        if rel.is_composite() {
            let components = rel
                .local_columns
                .iter()
                .zip(rel.referenced_columns.iter())
                .map(|(local, referenced)| FilterComponent {
                    name: self.names.filter_name(&rel.property, referenced),
                    local: local.clone(),
                    referenced: referenced.clone(),
                    ty: ty_of(local),
                })
                .collect();
            plan.filters.push(FilterParam::Composite {
                property: rel.property.clone(),
                combined: self.names.combined_name(&rel.property),
                components,
            });
        } else {
            plan.filters.push(FilterParam::Scalar {
                name: self
                    .names
                    .filter_name(&rel.property, &rel.referenced_columns[0]),
                local: rel.local_columns[0].clone(),
                ty: ty_of(&rel.local_columns[0]),
            });
        }
    }

    fn plan_association(&self, rel: &Relation, known: &SchemaMap, plan: &mut GenerationPlan) {
        // Composite referenced keys are unsupported for associations:
        // exclude rather than emit a partial or garbled surface.
        if rel.referenced_columns.len() != 1 {
            warn!(
                entity = %plan.entity,
                property = %rel.property,
                "excluding many-to-many relation with composite referenced key"
            );
            plan.excluded.push(rel.property.clone());
            return;
        }
        let Some(target) = known.get(&rel.target) else {
            plan.excluded.push(rel.property.clone());
            return;
        };

        let referenced = rel.referenced_columns[0].clone();
        let ty = target
            .column(&referenced)
            .map(|c| c.ty.clone())
            .unwrap_or(ColumnType::Integer);
        let param = self.names.association_name(&rel.property, &referenced);

        plan.includes.push(IncludeDirective {
            property: rel.property.clone(),
            many: true,
        });

        plan.filters.push(FilterParam::Association {
            name: param.clone(),
            property: rel.property.clone(),
            referenced: referenced.clone(),
            ty: ty.clone(),
        });

        plan.associations.push(AssociationSpec {
            property: rel.property.clone(),
            target: rel.target.clone(),
            param,
            referenced,
            ty,
            display_column: target.display_column().map(|c| c.name.clone()),
            context_var: format!("mn_{}", rel.property),
            label: target.label().to_string(),
        });
    }

    /// Assemble the ordered list/edit surfaces with the inclusion set that
    /// guarantees no column renders twice: primary keys first, then
    /// columns consumed by reference relations, then everything else in
    /// declaration order, then (edit only) the association multi-selects.
    fn assemble_rows(
        &self,
        schema: &TableSchema,
        relations: &[Relation],
        known: &SchemaMap,
        plan: &mut GenerationPlan,
    ) {
        let mut rendered: HashSet<String> = HashSet::new();

        for col in schema.primary_columns() {
            rendered.insert(col.name.clone());
            let read_only = col.identity || col.ty == ColumnType::Uuid;
            plan.list_columns.push(ListColumn::Key {
                column: col.name.clone(),
                label: col.label().to_string(),
                identity: col.identity,
            });
            plan.fields.push(FormField::Key(ColumnField {
                column: col.name.clone(),
                label: col.label().to_string(),
                control: FieldControl::for_column(col),
                read_only,
            }));
        }

        // Reference relations consume their local columns. Only relations
        // that actually made it into the plan get a row.
        for rel in relations
            .iter()
            .filter(|r| r.cardinality.is_reference())
            .filter(|r| !plan.excluded.contains(&r.property))
        {
            let Some(field) = self.reference_field(schema, rel, known) else {
                continue;
            };
            for local in &field.local_columns {
                rendered.insert(local.clone());
            }
            plan.list_columns.push(ListColumn::Reference {
                property: field.property.clone(),
                local_columns: field.local_columns.clone(),
                label: field.row_label.clone(),
                display_column: field.display_column.clone(),
            });
            plan.fields.push(FormField::Reference(field));
        }

        for col in schema.visible_columns() {
            if rendered.contains(&col.name) {
                continue;
            }
            plan.list_columns.push(ListColumn::Scalar {
                column: col.name.clone(),
                label: col.label().to_string(),
            });
            plan.fields.push(FormField::Scalar(ColumnField {
                column: col.name.clone(),
                label: col.label().to_string(),
                control: FieldControl::for_column(col),
                read_only: false,
            }));
        }

        for assoc in &plan.associations {
            plan.fields.push(FormField::MultiSelect(assoc.clone()));
        }
    }

    fn reference_field(
        &self,
        schema: &TableSchema,
        rel: &Relation,
        known: &SchemaMap,
    ) -> Option<ReferenceField> {
        let target = known.get(&rel.target)?;

        let row_label = rel
            .local_columns
            .iter()
            .map(|c| {
                schema
                    .column(c)
                    .map(|col| col.label().to_string())
                    .unwrap_or_else(|| c.clone())
            })
            .collect::<Vec<_>>()
            .join(",");

        // Selectors bind one combined value; a composite key needs the
        // joined column list as its input name, a single key binds its
        // own column directly.
        let input_name = if rel.is_composite() {
            rel.local_columns.join(",")
        } else {
            rel.local_columns[0].clone()
        };

        Some(ReferenceField {
            property: rel.property.clone(),
            target: rel.target.clone(),
            row_label,
            filter_label: target.label().to_string(),
            local_columns: rel.local_columns.clone(),
            referenced_columns: rel.referenced_columns.clone(),
            display_column: target.display_column().map(|c| c.name.clone()),
            hierarchical: rel.hierarchical,
            context_var: format!("fk_{}", rel.property),
            input_name,
        })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::relation::RelationClassifier;
    use crate::domain::schema::NavigationProperty;

    fn known(schemas: Vec<TableSchema>) -> SchemaMap {
        schemas.into_iter().map(|s| (s.name.clone(), s)).collect()
    }

    fn customer() -> TableSchema {
        TableSchema::builder("Customer")
            .comment("Customers")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("Name", ColumnType::Text))
            .build()
            .unwrap()
    }

    fn order() -> TableSchema {
        TableSchema::builder("Order")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("No", ColumnType::Text))
            .column(ColumnInfo::new("CustomerId", ColumnType::Integer).nullable())
            .navigation(NavigationProperty::reference(
                "Customer",
                "Customer",
                vec!["CustomerId".into()],
                vec!["Id".into()],
            ))
            .build()
            .unwrap()
    }

    fn plan_for(schema: &TableSchema, map: &SchemaMap) -> GenerationPlan {
        let classified = RelationClassifier::new().classify(schema, map);
        RelationPlanner::new().plan(schema, &classified.relations, map)
    }

    // ── Order{Id pk, CustomerId → Customer.Id} ───────────────────────────────

    #[test]
    fn single_column_reference_derives_customer_id_filter() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let plan = plan_for(&order, &map);

        assert_eq!(plan.wire_filter_names(), vec!["Customer_Id"]);
        match &plan.filters[0] {
            FilterParam::Scalar { local, .. } => assert_eq!(local, "CustomerId"),
            other => panic!("expected scalar filter, got {other:?}"),
        }
    }

    #[test]
    fn reference_dropdown_labelled_by_first_text_column() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let plan = plan_for(&order, &map);

        let field = plan.reference_fields().next().unwrap();
        assert!(!field.hierarchical);
        assert_eq!(field.display_column.as_deref(), Some("Name"));
        assert_eq!(field.context_var, "fk_Customer");
        assert_eq!(field.input_name, "CustomerId");
    }

    // ── Category self-reference ──────────────────────────────────────────────

    #[test]
    fn self_reference_plans_hierarchical_field_and_parent_id_filter() {
        let category = TableSchema::builder("Category")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("Name", ColumnType::Text))
            .column(ColumnInfo::new("ParentId", ColumnType::Integer).nullable())
            .navigation(NavigationProperty::reference(
                "Parent",
                "Category",
                vec!["ParentId".into()],
                vec!["Id".into()],
            ))
            .build()
            .unwrap();
        let map = known(vec![category.clone()]);
        let plan = plan_for(&category, &map);

        assert_eq!(plan.wire_filter_names(), vec!["Parent_Id"]);
        let field = plan.reference_fields().next().unwrap();
        assert!(field.hierarchical, "self-reference must never be a flat dropdown");
    }

    // ── Post many-to-many Tag via PostTag ────────────────────────────────────

    #[test]
    fn many_to_many_plans_intersection_filter_and_multiselect() {
        let post = TableSchema::builder("Post")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("Title", ColumnType::Text))
            .navigation(NavigationProperty::many_to_many(
                "Tags",
                "Tag",
                "PostTag",
                vec!["Id".into()],
            ))
            .build()
            .unwrap();
        let tag = TableSchema::builder("Tag")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("Name", ColumnType::Text))
            .build()
            .unwrap();
        let map = known(vec![post.clone(), tag]);
        let plan = plan_for(&post, &map);

        assert!(plan.wire_filter_names().contains(&"mn_Tags_Id"));
        assert_eq!(plan.associations.len(), 1);
        assert_eq!(plan.associations[0].param, "mn_Tags_Id");
        assert!(matches!(plan.fields.last(), Some(FormField::MultiSelect(_))));
    }

    #[test]
    fn composite_referenced_key_many_to_many_is_excluded() {
        let post = TableSchema::builder("Post")
            .column(ColumnInfo::new("Id", ColumnType::Integer).primary())
            .navigation(NavigationProperty::many_to_many(
                "Tags",
                "Tag",
                "PostTag",
                vec!["A".into(), "B".into()],
            ))
            .build()
            .unwrap();
        let tag = TableSchema::builder("Tag")
            .column(ColumnInfo::new("A", ColumnType::Integer).primary())
            .column(ColumnInfo::new("B", ColumnType::Integer).primary())
            .build()
            .unwrap();
        let map = known(vec![post.clone(), tag]);
        let plan = plan_for(&post, &map);

        assert!(plan.filters.is_empty());
        assert!(plan.associations.is_empty());
        assert_eq!(plan.excluded, vec!["Tags"]);
    }

    // ── composite references ─────────────────────────────────────────────────

    fn shipment_and_warehouse() -> (TableSchema, TableSchema) {
        let warehouse = TableSchema::builder("Warehouse")
            .column(ColumnInfo::new("RegionId", ColumnType::Integer).primary())
            .column(ColumnInfo::new("Code", ColumnType::Text).primary())
            .column(ColumnInfo::new("Name", ColumnType::Text))
            .build()
            .unwrap();
        let shipment = TableSchema::builder("Shipment")
            .column(ColumnInfo::new("Id", ColumnType::Integer).identity().primary())
            .column(ColumnInfo::new("WarehouseRegionId", ColumnType::Integer))
            .column(ColumnInfo::new("WarehouseCode", ColumnType::Text))
            .navigation(NavigationProperty::reference(
                "Warehouse",
                "Warehouse",
                vec!["WarehouseRegionId".into(), "WarehouseCode".into()],
                vec!["RegionId".into(), "Code".into()],
            ))
            .build()
            .unwrap();
        (shipment, warehouse)
    }

    #[test]
    fn composite_reference_derives_component_arrays_and_combined() {
        let (shipment, warehouse) = shipment_and_warehouse();
        let map = known(vec![shipment.clone(), warehouse]);
        let plan = plan_for(&shipment, &map);

        assert_eq!(
            plan.wire_filter_names(),
            vec!["Warehouse_RegionId", "Warehouse_Code"]
        );
        match &plan.filters[0] {
            FilterParam::Composite {
                combined,
                components,
                ..
            } => {
                assert_eq!(combined, "Warehouse_multi");
                // Declared column order, never reordered.
                assert_eq!(components[0].local, "WarehouseRegionId");
                assert_eq!(components[1].local, "WarehouseCode");
            }
            other => panic!("expected composite filter, got {other:?}"),
        }
    }

    #[test]
    fn composite_reference_input_binds_joined_columns() {
        let (shipment, warehouse) = shipment_and_warehouse();
        let map = known(vec![shipment.clone(), warehouse]);
        let plan = plan_for(&shipment, &map);
        let field = plan.reference_fields().next().unwrap();
        assert_eq!(field.input_name, "WarehouseRegionId,WarehouseCode");
    }

    // ── display precedence / no duplicate render ─────────────────────────────

    #[test]
    fn no_column_renders_twice() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let plan = plan_for(&order, &map);

        let mut seen = HashSet::new();
        for col in &plan.list_columns {
            for name in col.column_names() {
                assert!(seen.insert(name.to_string()), "column {name} rendered twice");
            }
        }
        // Every non-ignored column appears exactly once.
        for col in order.visible_columns() {
            assert!(seen.contains(&col.name), "column {} never rendered", col.name);
        }
    }

    #[test]
    fn display_precedence_is_keys_then_references_then_rest() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let plan = plan_for(&order, &map);

        assert!(matches!(plan.list_columns[0], ListColumn::Key { .. }));
        assert!(matches!(plan.list_columns[1], ListColumn::Reference { .. }));
        assert!(matches!(plan.list_columns[2], ListColumn::Scalar { .. }));
        // "No" is the only column left after Id (key) and CustomerId (reference).
        match &plan.list_columns[2] {
            ListColumn::Scalar { column, .. } => assert_eq!(column, "No"),
            _ => unreachable!(),
        }
    }

    #[test]
    fn search_spans_own_and_referenced_text_columns() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let plan = plan_for(&order, &map);

        let paths: Vec<String> = plan.search.iter().map(SearchColumn::path).collect();
        assert_eq!(paths, vec!["No", "Customer.Name"]);
    }

    // ── name collisions ──────────────────────────────────────────────────────

    #[test]
    fn colliding_derived_names_are_detected_not_fixed() {
        // Two navigation properties that derive the same wire name.
        let other = TableSchema::builder("Other")
            .column(ColumnInfo::new("Id", ColumnType::Integer).primary())
            .build()
            .unwrap();
        let entity = TableSchema::builder("Entity")
            .column(ColumnInfo::new("Id", ColumnType::Integer).primary())
            .column(ColumnInfo::new("AId", ColumnType::Integer))
            .column(ColumnInfo::new("BId", ColumnType::Integer))
            .navigation(NavigationProperty::reference(
                "Ref",
                "Other",
                vec!["AId".into()],
                vec!["Id".into()],
            ))
            .navigation(NavigationProperty::reference(
                "Ref",
                "Other",
                vec!["BId".into()],
                vec!["Id".into()],
            ))
            .build()
            .unwrap();
        let map = known(vec![entity.clone(), other]);
        let plan = plan_for(&entity, &map);

        assert_eq!(plan.name_collisions(), vec!["Ref_Id"]);
        assert!(matches!(
            plan.ensure_unique_names(),
            Err(DomainError::NameCollision { .. })
        ));
        // Both filters still present — nothing was silently renamed.
        assert_eq!(plan.filters.len(), 2);
    }

    // ── field controls ───────────────────────────────────────────────────────

    #[test]
    fn control_selection_by_type() {
        let check = |ty: ColumnType, name: &str| {
            FieldControl::for_column(&ColumnInfo::new(name, ty))
        };

        assert_eq!(check(ColumnType::Bool, "Active"), FieldControl::Checkbox);
        assert_eq!(check(ColumnType::Integer, "Count"), FieldControl::NumberMasked);
        assert_eq!(check(ColumnType::Float, "Ratio"), FieldControl::CurrencyMasked);
        assert_eq!(check(ColumnType::Decimal, "Price"), FieldControl::CurrencyMasked);
        assert_eq!(
            check(ColumnType::DateTime, "ShippedAt"),
            FieldControl::DatePicker { audit: false }
        );
        assert_eq!(check(ColumnType::Text, "Title"), FieldControl::Text);
        assert_eq!(
            check(ColumnType::Other("geometry".into()), "Shape"),
            FieldControl::Text,
            "unrecognised types fall back to plain text"
        );
    }

    #[test]
    fn audit_timestamps_render_read_only_pickers() {
        let col = ColumnInfo::new("create_time", ColumnType::DateTime);
        assert_eq!(
            FieldControl::for_column(&col),
            FieldControl::DatePicker { audit: true }
        );
    }

    #[test]
    fn name_heuristics_for_text_columns() {
        let check = |name: &str| {
            FieldControl::for_column(&ColumnInfo::new(name, ColumnType::Text))
        };
        assert_eq!(check("img"), FieldControl::TextWithUpload);
        assert_eq!(check("avatar_img"), FieldControl::TextWithUpload);
        assert_eq!(check("path_prefix"), FieldControl::TextWithUpload);
        assert_eq!(check("content"), FieldControl::MultiLine);
        assert_eq!(check("description"), FieldControl::MultiLine);
        assert_eq!(check("name"), FieldControl::Text);
    }

    #[test]
    fn flag_enums_select_multiple() {
        let col = ColumnInfo::new(
            "Permissions",
            ColumnType::Enum {
                name: "Perm".into(),
                variants: vec!["Read".into(), "Write".into()],
                flags: true,
            },
        );
        assert_eq!(
            FieldControl::for_column(&col),
            FieldControl::EnumSelect {
                variants: vec!["Read".into(), "Write".into()],
                multiple: true
            }
        );
    }

    // ── determinism ──────────────────────────────────────────────────────────

    #[test]
    fn planning_is_deterministic() {
        let order = order();
        let map = known(vec![order.clone(), customer()]);
        let a = plan_for(&order, &map);
        let b = plan_for(&order, &map);
        assert_eq!(a.filters, b.filters);
        assert_eq!(a.list_columns, b.list_columns);
        assert_eq!(a.fields, b.fields);
    }
}
