//! Output writing.
//!
//! Writes the generated document to disk, skipping the write when the file
//! already holds the same content, and supports a dry-run mode that only
//! reports what would be written.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf, bytes: usize },

    /// File already had this content and was left alone.
    Unchanged { path: PathBuf },

    /// Dry run: nothing was touched.
    DryRun { content: String, path: PathBuf },
}

/// Freshness of an existing output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    UpToDate,
    Stale,
    Missing,
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if Self::status(path, content) == OutputStatus::UpToDate {
            tracing::debug!(path = %path.display(), "output unchanged");
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Compare the file at `path` against `expected`, ignoring surrounding
    /// whitespace. An unreadable file counts as missing.
    pub fn status(path: &Path, expected: &str) -> OutputStatus {
        match std::fs::read_to_string(path) {
            Ok(existing) if existing.trim() == expected.trim() => OutputStatus::UpToDate,
            Ok(_) => OutputStatus::Stale,
            Err(_) => OutputStatus::Missing,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Whether the file on disk was modified.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT: &str = "{\"type\":\"object\"}\n";

    #[test]
    fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/schema.json");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert_eq!(result.path(), path.as_path());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_identical_content_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        let writer = FileWriter::new(false);

        assert!(writer.write(&path, CONTENT).unwrap().was_written());
        assert!(matches!(
            writer.write(&path, CONTENT).unwrap(),
            WriteResult::Unchanged { .. }
        ));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());

        match writer.write(&path, CONTENT).unwrap() {
            WriteResult::DryRun { content, .. } => assert_eq!(content, CONTENT),
            other => panic!("expected a dry run, got {:?}", other),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");

        assert_eq!(FileWriter::status(&path, CONTENT), OutputStatus::Missing);

        std::fs::write(&path, CONTENT.trim()).unwrap();
        assert_eq!(FileWriter::status(&path, CONTENT), OutputStatus::UpToDate);

        std::fs::write(&path, "{}").unwrap();
        assert_eq!(FileWriter::status(&path, CONTENT), OutputStatus::Stale);
    }
}
