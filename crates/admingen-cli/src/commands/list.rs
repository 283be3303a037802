//! Implementation of the `admingen list` command.

use admingen_core::application::ports::SchemaProvider as _;

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    commands::schema_provider,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let provider = schema_provider(args.schemas.as_ref(), args.demo, &config)?;
    let entities = provider.list().map_err(CliError::Core)?;

    match args.format {
        ListFormat::Table => {
            output.header("Resolvable entities:")?;
            for entity in &entities {
                let schema = provider.resolve(entity).map_err(CliError::Core)?;
                let relations = schema
                    .navigations
                    .iter()
                    .filter(|n| !n.ignored)
                    .count();
                output.print(&format!(
                    "  {} ({} columns, {} relations)",
                    entity,
                    schema.columns.len(),
                    relations,
                ))?;
            }
        }

        ListFormat::Json => {
            // Serialise as a JSON array to stdout (bypasses OutputManager
            // because JSON output must be parseable even in non-TTY
            // pipes).
            let json =
                serde_json::to_string_pretty(&entities).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }

        ListFormat::List => {
            for entity in &entities {
                println!("{entity}");
            }
        }

        ListFormat::Csv => {
            println!("entity,columns,relations");
            for entity in &entities {
                let schema = provider.resolve(entity).map_err(CliError::Core)?;
                println!(
                    "{},{},{}",
                    entity,
                    schema.columns.len(),
                    schema.navigations.iter().filter(|n| !n.ignored).count(),
                );
            }
        }
    }

    Ok(())
}
