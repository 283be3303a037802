//! Local filesystem sink using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use admingen_core::{
    application::{ApplicationError, ports::OutputSink},
    error::AdmingenResult,
};

/// Production sink rooted at an output directory. Artifact paths coming
/// from the core are relative; this adapter anchors them and creates
/// parent directories on demand.
#[derive(Debug, Clone)]
pub struct LocalOutputSink {
    root: PathBuf,
}

impl LocalOutputSink {
    /// Create a sink writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn anchored(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl OutputSink for LocalOutputSink {
    fn write(&self, path: &Path, content: &str) -> AdmingenResult<()> {
        let full = self.anchored(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(&full, e, "create directory"))?;
        }
        std::fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))?;
        debug!(path = %full.display(), bytes = content.len(), "artifact written");
        Ok(())
    }

    fn read_lines(&self, path: &Path) -> AdmingenResult<Option<Vec<String>>> {
        let full = self.anchored(path);
        if !full.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&full).map_err(|e| map_io_error(&full, e, "read file"))?;
        Ok(Some(content.lines().map(String::from).collect()))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> admingen_core::error::AdmingenError {
    ApplicationError::Sink {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

// ── tests ─────────────────────────────────────────────────────────────────────
