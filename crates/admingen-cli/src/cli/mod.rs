//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! aliases, help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "admingen",
    bin_name = "admingen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2699} Schema-driven CRUD admin scaffolding",
    long_about = "Admingen turns entity schemas into coherent controller, \
                  list-view, and edit-view source artifacts.",
    after_help = "EXAMPLES:\n\
        \x20 admingen generate --schemas ./schemas --output ./generated\n\
        \x20 admingen generate Order Customer --schemas ./schemas --output ./generated --with-support\n\
        \x20 admingen list --demo\n\
        \x20 admingen completions bash > /usr/share/bash-completion/completions/admingen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate CRUD artifacts for entities.
    #[command(
        visible_alias = "g",
        about = "Generate controller/list/edit artifacts",
        after_help = "EXAMPLES:\n\
            \x20 admingen generate --schemas ./schemas --output ./generated\n\
            \x20 admingen generate Order --demo --output /tmp/out --route-base /backoffice/\n\
            \x20 admingen generate --demo --output /tmp/out --with-support --dry-run"
    )]
    Generate(GenerateArgs),

    /// List resolvable entities.
    #[command(
        visible_alias = "ls",
        about = "List entities the schema source can resolve",
        after_help = "EXAMPLES:\n\
            \x20 admingen list --schemas ./schemas\n\
            \x20 admingen list --demo --format json"
    )]
    List(ListArgs),

    /// Initialise an Admingen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 admingen init           # default location\n\
            \x20 admingen init --force   # overwrite existing"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 admingen completions bash > ~/.local/share/bash-completion/completions/admingen\n\
            \x20 admingen completions zsh  > ~/.zfunc/_admingen"
    )]
    Completions(CompletionsArgs),

    /// Manage the Admingen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 admingen config get defaults.route_base\n\
            \x20 admingen config list"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `admingen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Entities to generate (all resolvable entities when omitted).
    #[arg(value_name = "ENTITY", help = "Entity identifiers (default: all)")]
    pub entities: Vec<String>,

    /// Directory of entity manifests (`*.toml`).
    #[arg(
        short = 's',
        long = "schemas",
        value_name = "DIR",
        help = "Schema manifest directory",
        conflicts_with = "demo"
    )]
    pub schemas: Option<PathBuf>,

    /// Use the built-in demo schemas instead of a schema directory.
    #[arg(long = "demo", help = "Generate from the built-in demo schemas")]
    pub demo: bool,

    /// Output directory for the generated tree.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory"
    )]
    pub output: PathBuf,

    /// URL prefix for generated routes.
    #[arg(
        long = "route-base",
        value_name = "PATH",
        help = "Route prefix (default: /admin/)"
    )]
    pub route_base: Option<String>,

    /// Rust path of the consumer's entity models.
    #[arg(
        long = "model-path",
        value_name = "PATH",
        help = "Model path (default: crate::models)"
    )]
    pub model_path: Option<String>,

    /// Also emit the shared support module (first batch into a tree).
    #[arg(long = "with-support", help = "Emit the shared support module")]
    pub with_support: bool,

    /// Preview what would be generated without writing any files.
    #[arg(long = "dry-run", help = "Show what would be generated without writing")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and generate immediately"
    )]
    pub yes: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `admingen list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Directory of entity manifests (`*.toml`).
    #[arg(
        short = 's',
        long = "schemas",
        value_name = "DIR",
        help = "Schema manifest directory",
        conflicts_with = "demo"
    )]
    pub schemas: Option<PathBuf>,

    /// Use the built-in demo schemas.
    #[arg(long = "demo", help = "List the built-in demo schemas")]
    pub demo: bool,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
    /// CSV rows.
    Csv,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `admingen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `admingen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `admingen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.route_base`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
