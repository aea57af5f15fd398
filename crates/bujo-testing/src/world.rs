//! JournalWorld pattern for declarative integration test setup.
//!
//! Builds an isolated journal directory tree inside a tempdir; tests point a
//! `Config` at `journal_dir()` and drive the real indexing machinery against
//! it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Declarative journal tree builder.
///
/// # Example
/// ```no_run
/// use bujo_testing::JournalWorld;
///
/// let world = JournalWorld::new()
///     .with_daily("2024-12-03", &["# December 03, 2024", "* [ ] Buy milk"])
///     .with_collection("projects/website", &["[ ] Draft layout"]);
/// ```
pub struct JournalWorld {
    _temp_dir: TempDir,
    journal_dir: PathBuf,
    data_dir: PathBuf,
}

impl Default for JournalWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalWorld {
    /// Create a new isolated journal environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let journal_dir = temp_dir.path().join("bujo");
        let data_dir = journal_dir.join("data");

        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            _temp_dir: temp_dir,
            journal_dir,
            data_dir,
        }
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Absolute path of a file relative to the data directory.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.data_dir.join(rel)
    }

    /// Place a file with the given lines, creating parent directories.
    pub fn with_file(self, rel: &str, lines: &[&str]) -> Self {
        self.write_file(rel, lines)
            .unwrap_or_else(|err| panic!("Failed to write {}: {}", rel, err));
        self
    }

    /// Place a daily log (`daily/<date>.md`).
    pub fn with_daily(self, date: &str, lines: &[&str]) -> Self {
        let rel = format!("daily/{}.md", date);
        self.with_file(&rel, lines)
    }

    /// Place a monthly log (`months/<month>.md`).
    pub fn with_monthly(self, month: &str, lines: &[&str]) -> Self {
        let rel = format!("months/{}.md", month);
        self.with_file(&rel, lines)
    }

    /// Place a collection file (`collections/<name>.md`).
    pub fn with_collection(self, name: &str, lines: &[&str]) -> Self {
        let rel = format!("collections/{}.md", name);
        self.with_file(&rel, lines)
    }

    /// Write (or overwrite) a file relative to the data directory.
    pub fn write_file(&self, rel: &str, lines: &[&str]) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating parent dirs for {}", rel))?;
        }

        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        std::fs::write(&path, content).with_context(|| format!("writing {}", rel))?;
        Ok(())
    }

    /// Write raw bytes (for malformed-input tests).
    pub fn write_bytes(&self, rel: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating parent dirs for {}", rel))?;
        }
        std::fs::write(&path, bytes).with_context(|| format!("writing {}", rel))?;
        Ok(())
    }

    /// Delete a file relative to the data directory.
    pub fn remove_file(&self, rel: &str) -> Result<()> {
        std::fs::remove_file(self.path(rel)).with_context(|| format!("removing {}", rel))?;
        Ok(())
    }
}
