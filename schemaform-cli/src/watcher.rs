//! File watching for `generate --watch`.
//!
//! Debounces file system events under the input directory and forwards
//! changes to definition files (and the config file) over a channel.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// A debounced change.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A file was created or modified.
    Changed(PathBuf),
    /// A file was removed.
    Removed(PathBuf),
    /// The watcher reported an error.
    Error(String),
}

/// Watches a directory for definition changes.
pub struct FileWatcher {
    root: PathBuf,
    extensions: Vec<String>,
    debounce_ms: u64,
}

impl FileWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: vec!["toml".to_string(), "json".to_string()],
            debounce_ms: 500,
        }
    }

    /// Only report files with these extensions.
    pub fn with_extensions(mut self, extensions: &[String]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching. The debouncer must be kept alive for events to flow.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let extensions = self.extensions.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(change) = classify(&extensions, event.path) {
                            if tx.send(change).is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        tracing::debug!(root = %self.root.display(), "watching for changes");
        Ok((debouncer, rx))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Map a raw path to an event, dropping files nobody cares about.
fn classify(extensions: &[String], path: PathBuf) -> Option<WatchEvent> {
    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    if !extensions.iter().any(|accepted| *accepted == ext) {
        return None;
    }
    Some(if path.exists() {
        WatchEvent::Changed(path)
    } else {
        WatchEvent::Removed(path)
    })
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Changed(p) | WatchEvent::Removed(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
