//! Controller artifact: one axum module per entity.
//!
//! The emitted module carries four logical operations — list (with
//! filtering and pagination), create, update, delete — plus the two GET
//! form endpoints that render the views. Every wire parameter printed
//! here comes out of the plan, which is what keeps the controller and the
//! two views in lockstep.

use crate::domain::plan::{FilterParam, GenerationPlan, ReferenceField};
use crate::domain::schema::{ColumnInfo, ColumnType, TableSchema};
use crate::domain::snake_case;

use super::{EmitterConfig, SourceWriter};

/// Columns accepted on create: non-ignored, non-identity, and a primary
/// key only when the store does not assign it (not identity, not uuid).
fn insertable(schema: &TableSchema) -> Vec<&ColumnInfo> {
    schema
        .visible_columns()
        .filter(|c| !c.identity)
        .filter(|c| !c.primary || c.ty != ColumnType::Uuid)
        .collect()
}

/// Columns overwritten on update: everything non-ignored except the key.
fn updatable(schema: &TableSchema) -> Vec<&ColumnInfo> {
    schema.visible_columns().filter(|c| !c.primary).collect()
}

pub fn emit_controller(
    cfg: &EmitterConfig,
    schema: &TableSchema,
    plan: &GenerationPlan,
) -> String {
    let entity = &schema.name;
    let snake = snake_case(entity);
    let route = cfg.entity_route(entity);
    let pks = schema.primary_columns();
    let has_pk = !pks.is_empty();

    let mut w = SourceWriter::rust();

    w.line(format!(
        "//! CRUD controller for `{entity}` — generated by admingen."
    ))
    .line("//!")
    .line("//! Regenerate instead of editing; manual changes will be overwritten.")
    .blank()
    .line("#![allow(non_snake_case)]")
    .blank()
    .line("use crate::controllers::prelude::*;")
    .blank();

    emit_list_query(&mut w, plan);
    if has_pk {
        emit_edit_query(&mut w, &pks);
    }
    emit_add_form(&mut w, schema, plan);
    if has_pk {
        emit_edit_form_struct(&mut w, schema, plan, &pks);
        emit_del_form(&mut w, &pks);
    }
    emit_routes(&mut w, &route, has_pk);
    emit_list(&mut w, entity, &snake, plan);
    emit_add_form_handler(&mut w, &snake, plan);
    emit_create(&mut w, entity, schema, plan);
    if has_pk {
        emit_edit_form_handler(&mut w, entity, &snake, plan, &pks);
        emit_update(&mut w, entity, schema, plan, &pks);
        emit_del(&mut w, entity, &pks);
    }

    w.finish()
}

// ── wire structs ──────────────────────────────────────────────────────────────

fn emit_list_query(w: &mut SourceWriter, plan: &GenerationPlan) {
    w.line("/// Query surface of the list operation.")
        .line("#[derive(Debug, Default, Deserialize)]")
        .open("pub struct ListQuery {");
    w.line("/// Free-text search, OR-ed across text columns.")
        .line("pub key: Option<String>,");
    for filter in &plan.filters {
        match filter {
            FilterParam::Scalar { name, ty, .. } | FilterParam::Association { name, ty, .. } => {
                w.line("#[serde(default)]");
                w.line(format!("pub {name}: Vec<{}>,", ty.rust_type()));
            }
            FilterParam::Composite { components, .. } => {
                for c in components {
                    w.line("#[serde(default)]");
                    w.line(format!("pub {}: Vec<{}>,", c.name, c.ty.rust_type()));
                }
            }
        }
    }
    w.line("#[serde(default = \"default_page\")]")
        .line("pub page: u64,")
        .line("#[serde(default = \"default_limit\")]")
        .line("pub limit: u64,");
    w.close("}").blank();

    w.open("fn default_page() -> u64 {").line("1").close("}").blank();
    w.open("fn default_limit() -> u64 {").line("20").close("}").blank();
}

fn emit_edit_query(w: &mut SourceWriter, pks: &[&ColumnInfo]) {
    w.line("/// Key locating the row on the edit form.")
        .line("#[derive(Debug, Deserialize)]")
        .open("pub struct EditQuery {");
    for pk in pks {
        w.line(format!("pub {}: {},", pk.name, pk.ty.rust_type()));
    }
    w.close("}").blank();
}

fn association_params(w: &mut SourceWriter, plan: &GenerationPlan) {
    for assoc in &plan.associations {
        w.line("#[serde(default)]");
        w.line(format!("pub {}: Vec<{}>,", assoc.param, assoc.ty.rust_type()));
    }
}

fn emit_add_form(w: &mut SourceWriter, schema: &TableSchema, plan: &GenerationPlan) {
    w.line("#[derive(Debug, Deserialize)]").open("pub struct AddForm {");
    for col in insertable(schema) {
        w.line(format!(
            "pub {}: {},",
            col.name,
            col.ty.param_type(col.nullable)
        ));
    }
    association_params(w, plan);
    w.close("}").blank();
}

fn emit_edit_form_struct(
    w: &mut SourceWriter,
    schema: &TableSchema,
    plan: &GenerationPlan,
    pks: &[&ColumnInfo],
) {
    w.line("#[derive(Debug, Deserialize)]").open("pub struct EditForm {");
    for pk in pks {
        w.line(format!("pub {}: {},", pk.name, pk.ty.rust_type()));
    }
    for col in updatable(schema) {
        w.line(format!(
            "pub {}: {},",
            col.name,
            col.ty.param_type(col.nullable)
        ));
    }
    association_params(w, plan);
    w.close("}").blank();
}

fn emit_del_form(w: &mut SourceWriter, pks: &[&ColumnInfo]) {
    w.line("/// Key arrays for bulk delete; component arrays zip positionally.")
        .line("#[derive(Debug, Deserialize)]")
        .open("pub struct DelForm {");
    for pk in pks {
        w.line("#[serde(default)]");
        w.line(format!("pub {}: Vec<{}>,", pk.name, pk.ty.rust_type()));
    }
    w.close("}").blank();
}

// ── routes ────────────────────────────────────────────────────────────────────

fn emit_routes(w: &mut SourceWriter, route: &str, has_pk: bool) {
    w.open("pub fn routes() -> Router<Db> {");
    w.line("Router::new()");
    w.push();
    w.line(format!(".route(\"{route}\", get(list))"));
    w.line(format!(".route(\"{route}/add\", get(add_form).post(create))"));
    if has_pk {
        w.line(format!(".route(\"{route}/edit\", get(edit_form).post(update))"));
        w.line(format!(".route(\"{route}/del\", post(del))"));
    }
    w.pop();
    w.close("}").blank();
}

// ── handlers ──────────────────────────────────────────────────────────────────

fn choice_fetch_lines(w: &mut SourceWriter, plan: &GenerationPlan) {
    for field in plan.reference_fields() {
        w.line(choice_fetch(field));
    }
    for assoc in &plan.associations {
        let display = display_arg(assoc.display_column.as_deref());
        w.line(format!(
            "let {} = choices::<{}>(&db, &[\"{}\"], {display}).await?;",
            assoc.context_var, assoc.target, assoc.referenced
        ));
    }
}

fn choice_fetch(field: &ReferenceField) -> String {
    let display = display_arg(field.display_column.as_deref());
    let keys = quoted_list(&field.referenced_columns);
    if field.hierarchical {
        let parents = quoted_list(&field.local_columns);
        format!(
            "let {} = tree_choices::<{}>(&db, &[{keys}], &[{parents}], {display}).await?;",
            field.context_var, field.target
        )
    } else {
        format!(
            "let {} = choices::<{}>(&db, &[{keys}], {display}).await?;",
            field.context_var, field.target
        )
    }
}

fn display_arg(display: Option<&str>) -> String {
    match display {
        Some(col) => format!("Some(\"{col}\")"),
        None => "None".into(),
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn context_inserts(w: &mut SourceWriter, plan: &GenerationPlan) {
    for field in plan.reference_fields() {
        w.line(format!("ctx.insert(\"{0}\", &{0});", field.context_var));
    }
    for assoc in &plan.associations {
        w.line(format!("ctx.insert(\"{0}\", &{0});", assoc.context_var));
    }
}

fn emit_list(w: &mut SourceWriter, entity: &str, snake: &str, plan: &GenerationPlan) {
    w.line("/// List with free-text search, relation filters, and pagination.")
        .open("pub async fn list(State(db): State<Db>, Query(q): Query<ListQuery>) -> Result<Html<String>, ApiError> {");

    // Combined values for composite references are derived from the
    // component arrays before the query is assembled, zipping pairwise in
    // declared column order.
    for filter in &plan.filters {
        if let FilterParam::Composite {
            combined,
            components,
            ..
        } = filter
        {
            let first = &components[0].name;
            let mut fmt = String::from("{}");
            let mut args = String::from("v");
            for c in &components[1..] {
                fmt.push_str("|{}");
                args.push_str(&format!(", q.{}[idx]", c.name));
            }
            w.line(format!("let {combined}: Vec<String> = q.{first}"));
            w.push();
            w.line(".iter()");
            w.line(".enumerate()");
            w.line(format!(".map(|(idx, v)| format!(\"{fmt}\", {args}))"));
            w.line(".collect();");
            w.pop();
        }
    }

    let includes: Vec<_> = plan.includes.iter().filter(|i| !i.many).collect();
    // `mut` only when a search or filter branch reassigns the builder.
    let binding = if plan.search.is_empty() && plan.filters.is_empty() {
        "let select"
    } else {
        "let mut select"
    };
    if includes.is_empty() {
        w.line(format!("{binding} = db.select::<{entity}>();"));
    } else {
        w.line(format!("{binding} = db.select::<{entity}>()"));
        w.push();
        for (i, inc) in includes.iter().enumerate() {
            let tail = if i + 1 == includes.len() { ";" } else { "" };
            w.line(format!(".include(\"{}\"){tail}", inc.property));
        }
        w.pop();
    }

    if !plan.search.is_empty() {
        let paths = plan
            .search
            .iter()
            .map(|s| format!("\"{}\"", s.path()))
            .collect::<Vec<_>>()
            .join(", ");
        w.open("if let Some(key) = q.key.as_deref().filter(|k| !k.is_empty()) {");
        w.line(format!("select = select.search_any(&[{paths}], key);"));
        w.close("}");
    }

    for filter in &plan.filters {
        match filter {
            FilterParam::Scalar { name, local, .. } => {
                w.open(format!("if !q.{name}.is_empty() {{"));
                w.line(format!("select = select.filter_in(\"{local}\", &q.{name});"));
                w.close("}");
            }
            FilterParam::Composite {
                combined,
                components,
                ..
            } => {
                let locals = quoted_list(
                    &components
                        .iter()
                        .map(|c| c.local.clone())
                        .collect::<Vec<_>>(),
                );
                w.open(format!("if !{combined}.is_empty() {{"));
                w.line(format!(
                    "select = select.filter_combined_in(&[{locals}], &{combined});"
                ));
                w.close("}");
            }
            FilterParam::Association {
                name,
                property,
                referenced,
                ..
            } => {
                w.open(format!("if !q.{name}.is_empty() {{"));
                w.line(format!(
                    "select = select.filter_any_related(\"{property}\", \"{referenced}\", &q.{name});"
                ));
                w.close("}");
            }
        }
    }

    w.line("let count = select.count().await?;");
    w.line("let items = select.page(q.page, q.limit).fetch_all().await?;");
    choice_fetch_lines(w, plan);
    w.line("let mut ctx = ViewContext::new();");
    w.line("ctx.insert(\"items\", &items);");
    w.line("ctx.insert(\"count\", &count);");
    w.line("ctx.insert(\"page\", &q.page);");
    w.line("ctx.insert(\"limit\", &q.limit);");
    context_inserts(w, plan);
    w.line(format!("render(\"{snake}/list.html\", &ctx)"));
    w.close("}").blank();
}

fn emit_add_form_handler(w: &mut SourceWriter, snake: &str, plan: &GenerationPlan) {
    w.line("/// Empty edit view (create mode).")
        .open("pub async fn add_form(State(db): State<Db>) -> Result<Html<String>, ApiError> {");
    if plan.reference_fields().next().is_none() && plan.associations.is_empty() {
        w.line("let _ = db;");
    }
    choice_fetch_lines(w, plan);
    w.line("let mut ctx = ViewContext::new();");
    context_inserts(w, plan);
    w.line(format!("render(\"{snake}/edit.html\", &ctx)"));
    w.close("}").blank();
}

fn emit_create(w: &mut SourceWriter, entity: &str, schema: &TableSchema, plan: &GenerationPlan) {
    w.open("pub async fn create(State(db): State<Db>, Form(f): Form<AddForm>) -> Result<ApiResult, ApiError> {");
    w.line(format!("let mut item = {entity}::default();"));
    for col in insertable(schema) {
        w.line(format!("item.{0} = f.{0};", col.name));
    }
    w.line("let mut tx = db.begin().await?;");
    w.line("tx.insert(&mut item).await?;");
    emit_replace_associations(w, entity, plan, "f");
    w.line("tx.commit().await?;");
    w.line("Ok(ApiResult::created(item))");
    w.close("}").blank();
}

/// Full-replacement association persistence. Create and update share the
/// exact same shape: whatever set arrives is the set that remains.
fn emit_replace_associations(
    w: &mut SourceWriter,
    entity: &str,
    plan: &GenerationPlan,
    form_var: &str,
) {
    for assoc in &plan.associations {
        w.line(format!(
            "// {} association: replace the full set",
            assoc.property
        ));
        w.line(format!(
            "tx.replace_set::<{entity}, {}>(&item, \"{}\", &{form_var}.{}).await?;",
            assoc.target, assoc.property, assoc.param
        ));
    }
}

fn pk_filter_chain(pks: &[&ColumnInfo], source: &str) -> String {
    pks.iter()
        .map(|pk| format!(".filter_eq(\"{0}\", &{source}.{0})", pk.name))
        .collect::<Vec<_>>()
        .join("")
}

fn emit_edit_form_handler(
    w: &mut SourceWriter,
    entity: &str,
    snake: &str,
    plan: &GenerationPlan,
    pks: &[&ColumnInfo],
) {
    w.line("/// Edit view for an existing row.")
        .open("pub async fn edit_form(State(db): State<Db>, Query(q): Query<EditQuery>) -> Result<Html<String>, ApiError> {");

    w.line(format!("let Some(item) = db.select::<{entity}>()"));
    w.push();
    for inc in plan.includes.iter().filter(|i| i.many) {
        w.line(format!(".include_many(\"{}\")", inc.property));
    }
    for pk in pks {
        w.line(format!(".filter_eq(\"{0}\", &q.{0})", pk.name));
    }
    w.line(".fetch_optional()");
    w.line(".await?");
    w.pop();
    w.open("else {");
    w.line("return Err(ApiError::not_found(\"record does not exist\"));");
    w.close("};");

    choice_fetch_lines(w, plan);
    for assoc in &plan.associations {
        w.line(format!(
            "let item_{} = related_keys(&item, \"{}\", \"{}\");",
            assoc.context_var, assoc.property, assoc.referenced
        ));
    }
    w.line("let mut ctx = ViewContext::new();");
    w.line("ctx.insert(\"item\", &item);");
    context_inserts(w, plan);
    for assoc in &plan.associations {
        w.line(format!(
            "ctx.insert(\"item_{0}\", &item_{0});",
            assoc.context_var
        ));
    }
    w.line(format!("render(\"{snake}/edit.html\", &ctx)"));
    w.close("}").blank();
}

fn emit_update(
    w: &mut SourceWriter,
    entity: &str,
    schema: &TableSchema,
    plan: &GenerationPlan,
    pks: &[&ColumnInfo],
) {
    w.line("/// Overwrites entity fields and fully replaces associations.")
        .line("/// Not-found is reported distinctly from zero affected rows.")
        .open("pub async fn update(State(db): State<Db>, Form(f): Form<EditForm>) -> Result<ApiResult, ApiError> {");
    w.line("let mut tx = db.begin().await?;");
    w.line(format!(
        "let Some(mut item) = tx.select::<{entity}>(){}.fetch_optional().await?",
        pk_filter_chain(pks, "f")
    ));
    w.open("else {");
    w.line("return Ok(ApiResult::not_found(\"record does not exist\"));");
    w.close("};");
    for col in updatable(schema) {
        w.line(format!("item.{0} = f.{0};", col.name));
    }
    w.line("let affected = tx.update(&item).await?;");
    emit_replace_associations(w, entity, plan, "f");
    w.line("tx.commit().await?;");
    w.line("Ok(ApiResult::affected(affected))");
    w.close("}").blank();
}

fn emit_del(w: &mut SourceWriter, entity: &str, pks: &[&ColumnInfo]) {
    let first = &pks[0].name;
    w.line("/// Bulk delete by key arrays; dependent associations are removed")
        .line("/// before the owning rows.")
        .open("pub async fn del(State(db): State<Db>, Form(f): Form<DelForm>) -> Result<ApiResult, ApiError> {");
    // The i-th element of every key-column array addresses one row; the
    // zip is positional and never cross-pairs.
    w.line(format!("let mut keys: Vec<{entity}> = Vec::new();"));
    w.open(format!("for idx in 0..f.{first}.len() {{"));
    w.line(format!("let mut key = {entity}::default();"));
    for pk in pks {
        w.line(format!("key.{0} = f.{0}[idx].clone();", pk.name));
    }
    w.line("keys.push(key);");
    w.close("}");
    w.open("if keys.is_empty() {");
    w.line("return Ok(ApiResult::affected(0));");
    w.close("}");
    w.line("let mut tx = db.begin().await?;");
    w.line(format!(
        "let affected = tx.delete_cascade::<{entity}>(&keys).await?;"
    ));
    w.line("tx.commit().await?;");
    w.line("Ok(ApiResult::affected(affected))");
    w.close("}");
}
