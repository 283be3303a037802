//! Implementation of the `admingen generate` command.
//!
//! Responsibility: translate CLI arguments into `GeneratorOptions`, call
//! the core generator service, and display results. No generation logic
//! lives here.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use admingen_adapters::LocalOutputSink;
use admingen_core::application::ports::SchemaProvider as _;
use admingen_core::application::{BatchReport, GeneratorOptions, GeneratorService};

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    commands::schema_provider,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `admingen generate` command.
///
/// Dispatch sequence:
/// 1. Resolve the schema source (directory / demo / configured default)
/// 2. Determine the entity set (explicit list, or everything resolvable)
/// 3. Confirm with user unless `--yes` or `--quiet`
/// 4. Early-exit if `--dry-run`
/// 5. Execute the batch via `GeneratorService`
/// 6. Print the batch report
#[instrument(skip_all, fields(output = %args.output.display()))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Schema source
    let provider = schema_provider(args.schemas.as_ref(), args.demo, &config)?;

    // 2. Entity set
    let available = provider.list().map_err(CliError::Core)?;
    let entities = if args.entities.is_empty() {
        available.clone()
    } else {
        args.entities.clone()
    };
    if entities.is_empty() {
        return Err(CliError::NoEntities { available });
    }

    let options = GeneratorOptions {
        route_base: args
            .route_base
            .clone()
            .unwrap_or_else(|| config.defaults.route_base.clone()),
        model_path: args
            .model_path
            .clone()
            .unwrap_or_else(|| config.defaults.model_path.clone()),
        emit_support: args.with_support,
    };

    debug!(
        entities = entities.len(),
        route_base = %options.route_base,
        model_path = %options.model_path,
        "generation configured"
    );

    // 3. Show configuration and confirm
    if !global.quiet && !args.yes {
        show_configuration(&entities, &options, &args, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 4. Dry run: describe but do not write.
    if args.dry_run {
        output.info(&format!(
            "Dry run: would generate {} entit{} into {}",
            entities.len(),
            if entities.len() == 1 { "y" } else { "ies" },
            args.output.display(),
        ))?;
        for entity in &entities {
            output.print(&format!("  {entity}: controller + list view + edit view"))?;
        }
        if args.with_support {
            output.print("  (+ shared support module)")?;
        }
        return Ok(());
    }

    // 5. Run the batch
    let service = GeneratorService::new(provider, Box::new(LocalOutputSink::new(&args.output)));

    let spinner = progress_spinner(&global);
    spinner.set_message(format!("Generating {} entities...", entities.len()));
    info!(entities = entities.len(), "generation started");

    let report = service.generate(&entities, &options).map_err(CliError::Core);
    spinner.finish_and_clear();
    let report = report?;

    info!(batch = %report.batch_id, "generation completed");

    // 6. Report
    print_report(&report, &args, &output)?;
    Ok(())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn progress_spinner(global: &GlobalArgs) -> ProgressBar {
    if global.quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template must parse"),
    );
    spinner
}

fn show_configuration(
    entities: &[String],
    options: &GeneratorOptions,
    args: &GenerateArgs,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Entities:    {}", entities.join(", ")))?;
    out.print(&format!("  Output:      {}", args.output.display()))?;
    out.print(&format!("  Route base:  {}", options.route_base))?;
    out.print(&format!("  Model path:  {}", options.model_path))?;
    if options.emit_support {
        out.print("  Support:     shared module will be emitted")?;
    }
    out.print("")?;
    Ok(())
}

fn print_report(report: &BatchReport, args: &GenerateArgs, out: &OutputManager) -> CliResult<()> {
    out.success(&format!(
        "Generated {} entit{} ({} files) into {}",
        report.entities,
        if report.entities == 1 { "y" } else { "ies" },
        report.files_written,
        args.output.display(),
    ))?;

    if report.manifest_appended > 0 {
        out.print(&format!(
            "  Import manifest: {} line(s) appended",
            report.manifest_appended
        ))?;
    } else {
        out.print("  Import manifest: already up to date")?;
    }
    if report.relations_skipped > 0 {
        out.warning(&format!(
            "{} relation(s) skipped (unsupported or unresolvable shapes)",
            report.relations_skipped
        ))?;
    }
    for collision in &report.name_collisions {
        out.warning(&format!(
            "Derived parameter name collision: {collision} (rename a navigation property)"
        ))?;
    }
    out.print(&format!(
        "  Finished at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ))?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}
