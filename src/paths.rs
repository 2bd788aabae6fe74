//! Typed paths into the working root.
//!
//! Centralizing path construction keeps file access consistent across the
//! workflow and lets tests point every component at a temp directory.
use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = ".jokes.json";
pub const ANALYTICS_FILE: &str = ".joke_analytics.json";
pub const DOCUMENT_FILE: &str = "README.md";

/// Convenience wrapper for locating the files a run reads and writes.
#[derive(Debug, Clone)]
pub struct JokePaths {
    root: PathBuf,
    document: Option<PathBuf>,
}

impl JokePaths {
    /// Create a new path helper rooted at the working root.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            document: None,
        }
    }

    /// Override the target document location.
    pub fn with_document(mut self, document: PathBuf) -> Self {
        self.document = Some(document);
        self
    }

    /// Return the working root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `.jokes.json` path.
    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    /// Return the `.joke_analytics.json` path.
    pub fn analytics_path(&self) -> PathBuf {
        self.root.join(ANALYTICS_FILE)
    }

    /// Return the target document path (`README.md` unless overridden).
    pub fn document_path(&self) -> PathBuf {
        match &self.document {
            Some(document) if document.is_absolute() => document.clone(),
            Some(document) => self.root.join(document),
            None => self.root.join(DOCUMENT_FILE),
        }
    }
}
