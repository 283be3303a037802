//! In-memory output sink for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use admingen_core::{
    application::{ApplicationError, ports::OutputSink},
    error::AdmingenResult,
};

/// In-memory sink capturing every write for inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutputSink {
    files: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl MemoryOutputSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a written artifact's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.read().ok()?;
        files.get(path.as_ref()).cloned()
    }

    /// All written paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let files = self.files.read().expect("sink lock poisoned");
        let mut paths: Vec<PathBuf> = files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Clear all contents.
    pub fn clear(&self) {
        self.files.write().expect("sink lock poisoned").clear();
    }
}

impl OutputSink for MemoryOutputSink {
    fn write(&self, path: &Path, content: &str) -> AdmingenResult<()> {
        let mut files = self
            .files
            .write()
            .map_err(|_| ApplicationError::StoreLock)?;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_lines(&self, path: &Path) -> AdmingenResult<Option<Vec<String>>> {
        let files = self
            .files
            .read()
            .map_err(|_| ApplicationError::StoreLock)?;
        Ok(files
            .get(path)
            .map(|c| c.lines().map(String::from).collect()))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
