//! Artifact emission: a [`GenerationPlan`] plus its [`TableSchema`] →
//! three coupled source artifacts.
//!
//! The emitters are deliberately dumb. Every name they print was derived
//! by the planner; formatting is the only decision made here. That split
//! gives two independently testable units — classification/planning and
//! rendering — instead of one string-concatenating monolith.
//!
//! Determinism matters: the same schema and plan must produce
//! byte-identical artifacts on every run, so nothing in this module reads
//! clocks, counters, or randomness.

mod controller;
mod edit_view;
mod list_view;

use crate::domain::plan::GenerationPlan;
use crate::domain::schema::{ColumnType, TableSchema};
use crate::domain::snake_case;

pub use controller::emit_controller;
pub use edit_view::emit_edit_view;
pub use list_view::emit_list_view;

/// Formatting-level options shared by the three emitters.
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// URL prefix for generated routes, normalized to `/…/` form.
    pub route_base: String,
    /// Rust path of the consumer's entity models (`crate::models`).
    pub model_path: String,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            route_base: "/admin/".into(),
            model_path: "crate::models".into(),
        }
    }
}

impl EmitterConfig {
    /// Route for an entity: `<base>/<entity_snake>`.
    pub fn entity_route(&self, entity: &str) -> String {
        let base = self.route_base.trim_matches('/');
        if base.is_empty() {
            format!("/{}", snake_case(entity))
        } else {
            format!("/{base}/{}", snake_case(entity))
        }
    }
}

/// Renders the three artifact bodies for one entity.
#[derive(Debug, Clone, Default)]
pub struct ArtifactEmitter {
    config: EmitterConfig,
}

impl ArtifactEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Controller module source (`src/controllers/<entity_snake>.rs`).
    pub fn controller(&self, schema: &TableSchema, plan: &GenerationPlan) -> String {
        emit_controller(&self.config, schema, plan)
    }

    /// List view template (`templates/<entity_snake>/list.html`).
    pub fn list_view(&self, schema: &TableSchema, plan: &GenerationPlan) -> String {
        emit_list_view(schema, plan)
    }

    /// Edit view template (`templates/<entity_snake>/edit.html`).
    pub fn edit_view(&self, schema: &TableSchema, plan: &GenerationPlan) -> String {
        emit_edit_view(schema, plan)
    }

    /// Shared support module emitted once per tree when requested
    /// (result envelope, option-list helpers, template registry).
    pub fn support_module(&self) -> &'static str {
        SUPPORT_MODULE
    }

    /// Import directives every generated controller relies on. Merged
    /// into the shared manifest, never duplicated.
    pub fn base_imports(&self) -> Vec<String> {
        vec![
            "pub use axum::Router;".into(),
            "pub use axum::extract::{Form, Query, State};".into(),
            "pub use axum::response::Html;".into(),
            "pub use axum::routing::{get, post};".into(),
            "pub use serde::Deserialize;".into(),
            "pub use crate::controllers::api_result::{ApiError, ApiResult, Choice, TreeChoice, ViewContext, choices, related_keys, render, tree_choices};".into(),
            "pub use crate::db::Db;".into(),
        ]
    }

    /// Import directives one entity's artifacts add: its model type, the
    /// model types of every entity it references, and the surface types
    /// its columns use.
    pub fn schema_imports(&self, schema: &TableSchema) -> Vec<String> {
        let model = &self.config.model_path;
        let mut imports = vec![format!("pub use {model}::{};", schema.name)];
        for nav in schema.navigations.iter().filter(|n| !n.ignored) {
            imports.push(format!("pub use {model}::{};", nav.target));
        }
        for col in schema.visible_columns() {
            match &col.ty {
                ColumnType::DateTime => {
                    imports.push("pub use chrono::{DateTime, Utc};".into());
                }
                ColumnType::Uuid => imports.push("pub use uuid::Uuid;".into()),
                ColumnType::Decimal => imports.push("pub use rust_decimal::Decimal;".into()),
                ColumnType::Enum { name, .. } => {
                    imports.push(format!("pub use {model}::{name};"));
                }
                _ => {}
            }
        }
        imports
    }
}

// ============================================================================
// SourceWriter
// ============================================================================

/// Minimal indented-line builder the emitters share.
///
/// Not a template engine on purpose: generated output must be stable to
/// the byte, and a hand-rolled writer keeps every space accountable.
#[derive(Debug)]
pub(crate) struct SourceWriter {
    buf: String,
    indent: usize,
    unit: &'static str,
}

impl SourceWriter {
    /// Rust-flavoured writer (4-space indent).
    pub fn rust() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
            unit: "    ",
        }
    }

    /// Markup-flavoured writer (2-space indent).
    pub fn markup() -> Self {
        Self {
            buf: String::new(),
            indent: 0,
            unit: "  ",
        }
    }

    pub fn line(&mut self, s: impl AsRef<str>) -> &mut Self {
        let s = s.as_ref();
        if s.is_empty() {
            self.buf.push('\n');
            return self;
        }
        for _ in 0..self.indent {
            self.buf.push_str(self.unit);
        }
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Write a line and indent subsequent ones (`open("fn x() {")`).
    pub fn open(&mut self, s: impl AsRef<str>) -> &mut Self {
        self.line(s);
        self.indent += 1;
        self
    }

    /// Dedent and write the closing line (`close("}")`).
    pub fn close(&mut self, s: impl AsRef<str>) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.line(s);
        self
    }

    /// Bare indent step, for builder chains that close without a brace.
    pub fn push(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    pub fn pop(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

// ============================================================================
// Support module (emitted verbatim on first-run batches)
// ============================================================================

const SUPPORT_MODULE: &str = r#"//! Shared support for generated admin controllers — generated by admingen.
//!
//! Regenerate instead of editing; manual changes will be overwritten.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::Value;
use tera::Tera;

use crate::db::{Db, DbError, Entity};

pub type ViewContext = tera::Context;

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    Tera::new("templates/**/*.html").expect("template directory must parse")
});

/// Uniform envelope for mutating admin operations.
#[derive(Debug, Serialize)]
pub struct ApiResult {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResult {
    pub fn created<T: Serialize>(item: T) -> Self {
        Self {
            code: 0,
            message: "created".into(),
            data: serde_json::to_value(item).ok(),
        }
    }

    /// Update/delete outcome. `affected == 0` means the row was found but
    /// nothing changed — distinct from not-found.
    pub fn affected(rows: u64) -> Self {
        Self {
            code: 0,
            message: format!("ok, affected rows: {rows}"),
            data: Some(Value::from(rows)),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self {
            code: 404,
            message: message.into(),
            data: None,
        }
    }
}

impl IntoResponse for ApiResult {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| "{}".into());
        ([("content-type", "application/json")], body).into_response()
    }
}

/// Failure surface of generated handlers.
#[derive(Debug)]
pub enum ApiError {
    Db(DbError),
    Render(tera::Error),
    NotFound(String),
}

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.into())
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}

impl From<tera::Error> for ApiError {
    fn from(e: tera::Error) -> Self {
        Self::Render(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m).into_response(),
            Self::Db(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
            Self::Render(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

/// One selectable option: combined key + display text.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: String,
    pub text: String,
}

/// Tree node option for hierarchical selectors.
#[derive(Debug, Clone, Serialize)]
pub struct TreeChoice {
    pub value: String,
    pub parent: String,
    pub text: String,
}

fn combined(item: &Value, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| match item.get(*c) {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn display(item: &Value, column: Option<&str>, fallback: &str) -> String {
    column
        .and_then(|c| item.get(c))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| fallback.to_string())
}

/// All instances of `T` as dropdown options. `value` concatenates the key
/// columns in declared order with `|`.
pub async fn choices<T: Entity>(
    db: &Db,
    key_columns: &[&str],
    display_column: Option<&str>,
) -> Result<Vec<Choice>, DbError> {
    let rows = db.select::<T>().fetch_json().await?;
    Ok(rows
        .iter()
        .map(|row| {
            let value = combined(row, key_columns);
            let text = display(row, display_column, &value);
            Choice { value, text }
        })
        .collect())
}

/// All instances of `T` as tree nodes, linked by the parent key columns.
pub async fn tree_choices<T: Entity>(
    db: &Db,
    key_columns: &[&str],
    parent_columns: &[&str],
    display_column: Option<&str>,
) -> Result<Vec<TreeChoice>, DbError> {
    let rows = db.select::<T>().fetch_json().await?;
    Ok(rows
        .iter()
        .map(|row| {
            let value = combined(row, key_columns);
            let text = display(row, display_column, &value);
            TreeChoice {
                value,
                parent: combined(row, parent_columns),
                text,
            }
        })
        .collect())
}

/// Combined keys of an already-loaded association collection; used to
/// preselect multi-select options on the edit form.
pub fn related_keys<T: Serialize>(item: &T, property: &str, key_column: &str) -> Vec<String> {
    let value = match serde_json::to_value(item) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    value
        .get(property)
        .and_then(Value::as_array)
        .map(|rows| rows.iter().map(|row| combined(row, &[key_column])).collect())
        .unwrap_or_default()
}

/// Render a template into an HTML response.
pub fn render(template: &str, ctx: &ViewContext) -> Result<Html<String>, ApiError> {
    Ok(Html(TEMPLATES.render(template, ctx)?))
}
"#;

// ── tests ─────────────────────────────────────────────────────────────────────
