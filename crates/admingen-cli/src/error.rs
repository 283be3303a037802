//! Comprehensive error handling for the Admingen CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::error;

use admingen_core::error::{AdmingenError, ErrorCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Comprehensive CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `admingen-core`.
    ///
    /// Wrapped here so that the CLI can attach suggestions drawn from the
    /// core error's category without touching core internals.
    #[error("Generation failed: {0}")]
    Core(#[from] AdmingenError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// No schema source was specified.
    #[error("No schema source: pass --schemas <DIR> or --demo")]
    NoSchemaSource,

    /// The requested entity set resolved to nothing.
    #[error("No entities to generate")]
    NoEntities { available: Vec<String> },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Run: admingen init to create a fresh config".into(),
            ],
            Self::Core(e) => e.suggestions(),
            Self::IoError { .. } => vec![
                "Check file permissions and disk space".into(),
            ],
            Self::Cancelled => vec![],
            Self::NoSchemaSource => vec![
                "Pass --schemas <DIR> pointing at entity manifests".into(),
                "Or pass --demo to use the built-in demo schemas".into(),
            ],
            Self::NoEntities { available } => {
                let mut out = vec!["The schema source resolved no matching entities".into()];
                if !available.is_empty() {
                    out.push(format!("Available: {}", available.join(", ")));
                }
                out
            }
        }
    }

    /// Map this error to a process exit code.
    ///
    /// | Code | Meaning                 |
    /// |------|-------------------------|
    /// |  1   | Internal / system error |
    /// |  2   | User / input error      |
    /// |  3   | Resource not found      |
    /// |  4   | Configuration error     |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidInput { .. } | Self::Cancelled | Self::NoSchemaSource => 2,
            Self::NoEntities { .. } => 3,
            Self::ConfigError { .. } => 4,
            Self::Core(e) => match e.category() {
                ErrorCategory::Validation | ErrorCategory::Conflict => 2,
                ErrorCategory::NotFound => 3,
                ErrorCategory::Internal => 1,
            },
            Self::IoError { .. } => 1,
        }
    }

    /// Emit a structured log event at the right severity.
    pub fn log(&self) {
        match self {
            Self::Cancelled => tracing::info!("operation cancelled by user"),
            other => error!(error = %other, exit_code = other.exit_code(), "command failed"),
        }
    }

    /// Render a colored, human-facing message block.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = format!("{} {}\n", "error:".red().bold(), self);
        for suggestion in self.suggestions() {
            out.push_str(&format!("  {} {suggestion}\n", "hint:".cyan()));
        }
        if verbose {
            if let Some(source) = std::error::Error::source(self) {
                out.push_str(&format!("  {} {source}\n", "cause:".dimmed()));
            }
        }
        out
    }

    /// Render a plain-text message block (non-TTY stderr).
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("error: {self}\n");
        for suggestion in self.suggestions() {
            out.push_str(&format!("  hint: {suggestion}\n"));
        }
        if verbose {
            if let Some(source) = std::error::Error::source(self) {
                out.push_str(&format!("  cause: {source}\n"));
            }
        }
        out
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
