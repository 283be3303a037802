//! Cross-artifact tests: the controller, list view, and edit view emitted
//! for one entity must agree with each other — every parameter one of
//! them mentions is accepted by the others under exactly the same name.

use admingen_core::domain::{
    ColumnInfo, ColumnType, NavigationProperty, RelationClassifier, RelationPlanner, SchemaMap,
    TableSchema,
};
use admingen_core::emit::{ArtifactEmitter, EmitterConfig};

fn known(schemas: Vec<TableSchema>) -> SchemaMap {
    schemas.into_iter().map(|s| (s.name.clone(), s)).collect()
}

struct Generated {
    controller: String,
    list_view: String,
    edit_view: String,
}

fn generate(schema: &TableSchema, map: &SchemaMap) -> Generated {
    let classified = RelationClassifier::new().classify(schema, map);
    let plan = RelationPlanner::new().plan(schema, &classified.relations, map);
    let emitter = ArtifactEmitter::new(EmitterConfig::default());
    Generated {
        controller: emitter.controller(schema, &plan),
        list_view: emitter.list_view(schema, &plan),
        edit_view: emitter.edit_view(schema, &plan),
    }
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
        .comment("Customer orders")
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

fn post_and_tag() -> (TableSchema, TableSchema) {
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
    (post, tag)
}

// ── filter parameter coherence ───────────────────────────────────────────────

#[test]
fn list_view_filter_names_match_controller_query_fields() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    // Controller accepts the derived parameter...
    assert!(g.controller.contains("pub Customer_Id: Vec<i64>"));
    // ...and the list view's filter bar posts exactly that name.
    assert!(g.list_view.contains("field: 'Customer_Id'"));
}

#[test]
fn controller_filters_reference_by_local_column() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g
        .controller
        .contains("select.filter_in(\"CustomerId\", &q.Customer_Id)"));
    assert!(g.controller.contains(".include(\"Customer\")"));
}

#[test]
fn free_text_search_spans_own_and_referenced_text_columns() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g.controller.contains("search_any(&[\"No\", \"Customer.Name\"], key)"));
}

#[test]
fn edit_view_dropdown_binds_local_column_and_controller_accepts_it() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g.edit_view.contains("<select name=\"CustomerId\">"));
    assert!(g.controller.contains("pub CustomerId: Option<i64>"));
    // Option lists for the dropdown are fetched under the same context
    // variable the view iterates.
    assert!(g.controller.contains("let fk_Customer = choices::<Customer>"));
    assert!(g.edit_view.contains("{% for fk in fk_Customer %}"));
}

// ── composite keys ───────────────────────────────────────────────────────────

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
fn composite_reference_zips_components_with_reserved_separator() {
    let (shipment, warehouse) = shipment_and_warehouse();
    let map = known(vec![shipment.clone(), warehouse]);
    let g = generate(&shipment, &map);

    // Component arrays are individually accepted...
    assert!(g.controller.contains("pub Warehouse_RegionId: Vec<i64>"));
    assert!(g.controller.contains("pub Warehouse_Code: Vec<String>"));
    // ...the combined value zips them pairwise in declared order...
    assert!(g.controller.contains("let Warehouse_multi: Vec<String> = q.Warehouse_RegionId"));
    assert!(g
        .controller
        .contains(".map(|(idx, v)| format!(\"{}|{}\", v, q.Warehouse_Code[idx]))"));
    // ...and the query matches the combined value, not the raw arrays.
    assert!(g.controller.contains(
        "select.filter_combined_in(&[\"WarehouseRegionId\", \"WarehouseCode\"], &Warehouse_multi)"
    ));
}

#[test]
fn composite_delete_zips_key_arrays_positionally() {
    let warehouse = {
        let (_, w) = shipment_and_warehouse();
        w
    };
    let map = known(vec![warehouse.clone()]);
    let g = generate(&warehouse, &map);

    // The i-th element of each array forms the i-th key — never
    // cross-paired.
    assert!(g.controller.contains("for idx in 0..f.RegionId.len()"));
    assert!(g.controller.contains("key.RegionId = f.RegionId[idx].clone();"));
    assert!(g.controller.contains("key.Code = f.Code[idx].clone();"));
    // Row selection posts the combined key in the same column order.
    assert!(g
        .list_view
        .contains("value=\"{{ item.RegionId }}|{{ item.Code }}\" data-keys=\"RegionId,Code\""));
}

// ── many-to-many ─────────────────────────────────────────────────────────────

#[test]
fn many_to_many_surface_is_coherent_across_all_three_artifacts() {
    let (post, tag) = post_and_tag();
    let map = known(vec![post.clone(), tag]);
    let g = generate(&post, &map);

    // Controller: intersection filter + form arrays.
    assert!(g.controller.contains("pub mn_Tags_Id: Vec<i64>"));
    assert!(g
        .controller
        .contains("select.filter_any_related(\"Tags\", \"Id\", &q.mn_Tags_Id)"));
    // List view filters under the same wire name.
    assert!(g.list_view.contains("field: 'mn_Tags_Id'"));
    // Edit view multi-select posts the same wire name.
    assert!(g.edit_view.contains("<select name=\"mn_Tags_Id\""));
}

#[test]
fn many_to_many_create_and_update_replace_the_full_set() {
    let (post, tag) = post_and_tag();
    let map = known(vec![post.clone(), tag]);
    let g = generate(&post, &map);

    let replace = "tx.replace_set::<Post, Tag>(&item, \"Tags\", &f.mn_Tags_Id).await?;";
    // Same replace-all statement in both create and update paths: the
    // supplied set is the set that remains, prior state never consulted.
    assert_eq!(g.controller.matches(replace).count(), 2);
    // No diffing anywhere.
    assert!(!g.controller.contains("diff"));
}

#[test]
fn edit_form_loads_association_and_preselects_current_set() {
    let (post, tag) = post_and_tag();
    let map = known(vec![post.clone(), tag]);
    let g = generate(&post, &map);

    assert!(g.controller.contains(".include_many(\"Tags\")"));
    assert!(g
        .controller
        .contains("let item_mn_Tags = related_keys(&item, \"Tags\", \"Id\");"));
    assert!(g.edit_view.contains("mn.value in item_mn_Tags"));
}

// ── hierarchy ────────────────────────────────────────────────────────────────

#[test]
fn self_reference_renders_tree_selector_not_dropdown() {
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
    let g = generate(&category, &map);

    assert!(g.edit_view.contains("<td id=\"Parent_td\"></td>"));
    assert!(g.edit_view.contains("initTreeSelect(document.getElementById('Parent_td')"));
    assert!(!g.edit_view.contains("<select name=\"ParentId\">"));
    // Controller fetches tree nodes (value/parent pairs), not flat choices.
    assert!(g
        .controller
        .contains("tree_choices::<Category>(&db, &[\"Id\"], &[\"ParentId\"], Some(\"Name\"))"));
    // And the list filter still derives Parent_Id.
    assert!(g.controller.contains("pub Parent_Id: Vec<i64>"));
}

// ── display precedence ───────────────────────────────────────────────────────

#[test]
fn list_view_renders_each_column_exactly_once() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    // CustomerId is consumed by the reference cell; it must not also
    // appear as a plain scalar cell.
    assert_eq!(g.list_view.matches("{{ item.CustomerId }}").count(), 1);
    assert_eq!(g.list_view.matches("<td>{{ item.No }}</td>").count(), 1);
}

#[test]
fn identity_key_renders_read_only_and_only_in_edit_mode() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g.edit_view.contains("Id(identity)"));
    assert!(g.edit_view.contains("readonly value=\"{{ item.Id }}\""));
    // Create never accepts an identity key.
    assert!(!g.controller.contains("pub struct AddForm {\n    pub Id"));
}

// ── operations surface ───────────────────────────────────────────────────────

#[test]
fn routes_cover_the_six_endpoints() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g.controller.contains(".route(\"/admin/order\", get(list))"));
    assert!(g
        .controller
        .contains(".route(\"/admin/order/add\", get(add_form).post(create))"));
    assert!(g
        .controller
        .contains(".route(\"/admin/order/edit\", get(edit_form).post(update))"));
    assert!(g.controller.contains(".route(\"/admin/order/del\", post(del))"));
}

#[test]
fn update_distinguishes_not_found_from_zero_affected() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let g = generate(&order, &map);

    assert!(g
        .controller
        .contains("return Ok(ApiResult::not_found(\"record does not exist\"));"));
    assert!(g.controller.contains("Ok(ApiResult::affected(affected))"));
}

#[test]
fn delete_cascades_dependent_associations() {
    let (post, tag) = post_and_tag();
    let map = known(vec![post.clone(), tag]);
    let g = generate(&post, &map);

    assert!(g.controller.contains("tx.delete_cascade::<Post>(&keys).await?;"));
}

// ── determinism ──────────────────────────────────────────────────────────────

#[test]
fn two_runs_emit_byte_identical_artifacts() {
    let order = order();
    let map = known(vec![order.clone(), customer()]);
    let a = generate(&order, &map);
    let b = generate(&order, &map);

    assert_eq!(a.controller, b.controller);
    assert_eq!(a.list_view, b.list_view);
    assert_eq!(a.edit_view, b.edit_view);
}

#[test]
fn entity_without_primary_key_skips_edit_and_delete() {
    let log = TableSchema::builder("AuditLog")
        .column(ColumnInfo::new("Message", ColumnType::Text))
        .build()
        .unwrap();
    let map = known(vec![log.clone()]);
    let g = generate(&log, &map);

    assert!(g.controller.contains("get(list)"));
    assert!(g.controller.contains("post(create)"));
    assert!(!g.controller.contains("post(update)"));
    assert!(!g.controller.contains("post(del)"));
}
