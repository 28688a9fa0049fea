//! Backing storage for the layout text

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::persist::write_atomically;

/// Where an edit session reads and persists its layout text
pub trait LayoutStore {
    fn load(&self) -> io::Result<String>;
    fn store(&mut self, text: &str) -> io::Result<()>;

    /// Human-readable name used in messages
    fn name(&self) -> String;
}

/// A layout file on disk; writes replace the file atomically
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LayoutStore for FileStore {
    fn load(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    fn store(&mut self, text: &str) -> io::Result<()> {
        write_atomically(&self.path, text.as_bytes())?;
        info!(path = %self.path.display(), "saved layout");
        Ok(())
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Layout text held in memory, for previews and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    text: Option<String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            writes: 0,
        }
    }

    /// An empty store: every load fails
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Number of successful `store` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LayoutStore for MemoryStore {
    fn load(&self) -> io::Result<String> {
        self.text
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no layout stored"))
    }

    fn store(&mut self, text: &str) -> io::Result<()> {
        self.text = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }

    fn name(&self) -> String {
        "<memory>".to_string()
    }
}
