//! # schemaform-cli
//!
//! Library behind the `schemaform` binary: reads class definition files,
//! builds a [`schemaform::ClassRegistry`] and writes the form schema JSON.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Definition file discovery and filtering
//! - [`loader`] - TOML/JSON definition parsing into registry classes
//! - [`generator`] - Registry description and JSON rendering
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod scanner;
pub mod watcher;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedOutput, SchemaGenerator};
pub use loader::{DefinitionLoader, LoadedClass};
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::FileWriter;
