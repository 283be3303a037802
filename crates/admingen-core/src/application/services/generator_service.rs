//! Generator Service - main application orchestrator.
//!
//! This service coordinates the entire generation workflow:
//! 1. Resolve every schema up front (fail fast, before any write)
//! 2. Merge the shared import manifest once per batch
//! 3. Per entity: classify → plan → emit the three artifacts → write
//!
//! It implements the driving port (incoming) and uses driven ports
//! (outgoing). Processing is synchronous and strictly in the supplied
//! entity order; there is no internal parallelism and no rollback of
//! artifacts written before a failure.

use std::path::PathBuf;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{OutputSink, SchemaProvider},
    },
    domain::{
        ImportManifest, RelationClassifier, RelationPlanner, SchemaMap, TableSchema, snake_case,
    },
    emit::{ArtifactEmitter, EmitterConfig},
    error::AdmingenResult,
};

/// Relative path of the shared import manifest inside the output tree.
pub const MANIFEST_PATH: &str = "src/controllers/prelude.rs";

/// Relative path of the once-per-tree support module.
pub const SUPPORT_PATH: &str = "src/controllers/api_result.rs";

/// Batch-level options: route prefix, model namespace, and whether this
/// batch also writes the shared support module (first batch into a
/// tree).
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// URL prefix for generated routes.
    pub route_base: String,
    /// Rust path of the consumer's entity models.
    pub model_path: String,
    /// Also write the shared support module (first batch into a tree).
    pub emit_support: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            route_base: "/admin/".into(),
            model_path: "crate::models".into(),
            emit_support: false,
        }
    }
}

impl GeneratorOptions {
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !self.route_base.starts_with('/') {
            return Err(ApplicationError::InvalidOptions(format!(
                "route base must start with '/': {}",
                self.route_base
            )));
        }
        if self.model_path.is_empty() {
            return Err(ApplicationError::InvalidOptions(
                "model path cannot be empty".into(),
            ));
        }
        Ok(())
    }

    fn emitter_config(&self) -> EmitterConfig {
        EmitterConfig {
            route_base: self.route_base.clone(),
            model_path: self.model_path.clone(),
        }
    }
}

/// What one batch did. Returned for CLI display and logging; the plan
/// objects themselves are discarded after emission.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Instance id of this batch run (provenance in logs).
    pub batch_id: Uuid,
    pub entities: usize,
    pub files_written: usize,
    /// Relations excluded as unsupported or unresolvable (non-fatal).
    pub relations_skipped: usize,
    /// Derived-name collisions detected (reported, never auto-resolved).
    pub name_collisions: Vec<String>,
    /// Lines the manifest merge appended (0 on a re-run — idempotence).
    pub manifest_appended: usize,
}

/// Main generation service.
///
/// Orchestrates schema resolution, planning, emission, and writing.
pub struct GeneratorService {
    schemas: Box<dyn SchemaProvider>,
    sink: Box<dyn OutputSink>,
}

impl GeneratorService {
    /// Create a new generator service with the given adapters.
    pub fn new(schemas: Box<dyn SchemaProvider>, sink: Box<dyn OutputSink>) -> Self {
        Self { schemas, sink }
    }

    /// All entity identifiers the schema provider can resolve.
    pub fn list_entities(&self) -> AdmingenResult<Vec<String>> {
        self.schemas.list()
    }

    /// Generate the artifact triple for every entity, in order.
    ///
    /// Fail-fast: an unresolvable entity or a failed write aborts the
    /// batch. Artifacts already written stay on disk (documented
    /// limitation — there is no rollback).
    #[instrument(skip_all, fields(entities = entities.len()))]
    pub fn generate(
        &self,
        entities: &[String],
        options: &GeneratorOptions,
    ) -> AdmingenResult<BatchReport> {
        options.validate()?;
        let emitter = ArtifactEmitter::new(options.emitter_config());
        let classifier = RelationClassifier::new();
        let planner = RelationPlanner::new();

        let mut report = BatchReport {
            batch_id: Uuid::new_v4(),
            entities: entities.len(),
            files_written: 0,
            relations_skipped: 0,
            name_collisions: Vec::new(),
            manifest_appended: 0,
        };
        info!(batch = %report.batch_id, "generation batch started");

        // ── 1. Resolve schemas up front ───────────────────────────────────
        // Every requested entity must resolve before anything is written;
        // a missing schema is fatal for the whole batch.
        let mut resolved: Vec<TableSchema> = Vec::with_capacity(entities.len());
        for entity in entities {
            resolved.push(self.schemas.resolve(entity)?);
        }

        // Referenced entities are resolved best-effort: a missing target
        // only degrades the relations that need it.
        let mut known: SchemaMap = resolved
            .iter()
            .map(|s| (s.name.clone(), s.clone()))
            .collect();
        for schema in &resolved {
            for nav in schema.navigations.iter().filter(|n| !n.ignored) {
                if known.contains_key(&nav.target) {
                    continue;
                }
                match self.schemas.resolve(&nav.target) {
                    Ok(target) => {
                        known.insert(nav.target.clone(), target);
                    }
                    Err(e) => {
                        warn!(
                            target = %nav.target,
                            error = %e,
                            "referenced schema unavailable; dependent relations degrade"
                        );
                    }
                }
            }
        }

        // ── 2. Shared import manifest (once per batch) ────────────────────
        let mut required = emitter.base_imports();
        for schema in &resolved {
            required.extend(emitter.schema_imports(schema));
        }
        report.manifest_appended = self.merge_manifest(&required)?;

        if options.emit_support {
            self.write(SUPPORT_PATH, emitter.support_module(), &mut report)?;
        }

        // ── 3. Per-entity emission ────────────────────────────────────────
        for schema in &resolved {
            let classification = classifier.classify(schema, &known);
            report.relations_skipped += classification.excluded.len();

            let plan = planner.plan(schema, &classification.relations, &known);
            report.relations_skipped += plan.excluded.len();

            for name in plan.name_collisions() {
                warn!(
                    entity = %schema.name,
                    name = %name,
                    "derived parameter name collision; generated artifacts will conflict"
                );
                report.name_collisions.push(format!("{}::{name}", schema.name));
            }

            let snake = snake_case(&schema.name);
            self.write(
                &format!("src/controllers/{snake}.rs"),
                &emitter.controller(schema, &plan),
                &mut report,
            )?;
            self.write(
                &format!("templates/{snake}/list.html"),
                &emitter.list_view(schema, &plan),
                &mut report,
            )?;
            self.write(
                &format!("templates/{snake}/edit.html"),
                &emitter.edit_view(schema, &plan),
                &mut report,
            )?;

            info!(entity = %schema.name, "artifacts emitted");
        }

        info!(
            batch = %report.batch_id,
            files = report.files_written,
            skipped = report.relations_skipped,
            "generation batch completed"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Read-merge-write of the shared manifest. Running this twice with
    /// the same required set leaves the file byte-identical.
    fn merge_manifest(&self, required: &[String]) -> AdmingenResult<usize> {
        let path = PathBuf::from(MANIFEST_PATH);
        let mut manifest = self
            .sink
            .read_lines(&path)?
            .map(ImportManifest::from_lines)
            .unwrap_or_default();
        let appended = manifest.merge(required.iter().map(String::as_str));
        self.sink.write(&path, &manifest.render())?;
        Ok(appended)
    }

    fn write(&self, path: &str, content: &str, report: &mut BatchReport) -> AdmingenResult<()> {
        self.sink.write(&PathBuf::from(path), content)?;
        report.files_written += 1;
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
