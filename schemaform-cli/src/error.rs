//! Error types for the CLI.
//!
//! Every stage of a run (scan, load, generate, write, watch) has its own
//! error enum; [`CliError`] aggregates them for `main`.

use std::path::PathBuf;

use schemaform::ConversionError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during definition file discovery.
    #[error("Failed to scan directory: {0}")]
    Scan(#[from] ScanError),

    /// Error reading or parsing a class definition file.
    #[error("Failed to load class definitions: {0}")]
    Load(#[from] LoadError),

    /// Error converting classes into a form schema.
    #[error("Failed to generate schema: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Validation failed (output out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during definition file discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No definition files found in directory.
    #[error("No class definition files found in: {path}")]
    NoDefinitionFiles { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from ignore crate walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error reading or parsing a class definition file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file content is not a valid TOML definition.
    #[error("Invalid TOML definition in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// The file content is not a valid JSON definition.
    #[error("Invalid JSON definition in {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// The file extension has no known format.
    #[error("Unsupported definition format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// The definition has an empty `id`.
    #[error("Missing class id in {path}")]
    MissingId { path: PathBuf },

    /// Two files define the same class id.
    #[error("Class '{id}' is defined in both {first} and {second}")]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Multiple load errors collected.
    #[error("Multiple load errors:\n{}", format_errors(.0))]
    Multiple(Vec<LoadError>),
}

/// Error converting classes into a form schema.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A class failed to convert.
    #[error("Class '{class}': {source}")]
    Conversion {
        class: String,
        #[source]
        source: ConversionError,
    },

    /// `--class` names an id that was not loaded.
    #[error("Unknown class '{id}'")]
    UnknownClass { id: String },

    /// The schema could not be rendered as JSON.
    #[error("Failed to serialize form schema: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),
}

fn format_errors(errors: &[LoadError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ScanError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a no definition files error.
    pub fn no_definition_files(path: PathBuf) -> Self {
        Self::NoDefinitionFiles { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl LoadError {
    /// Collapse a list of errors into one. A single error is returned as is.
    pub fn collect(mut errors: Vec<LoadError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }
}

impl GenerateError {
    /// Attach the failing class id to a conversion error.
    pub fn conversion(class: impl Into<String>, source: ConversionError) -> Self {
        Self::Conversion {
            class: class.into(),
            source,
        }
    }
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_names_the_class() {
        let error = GenerateError::conversion("rainbow", ConversionError::unsupported("Match"));
        assert_eq!(
            error.to_string(),
            "Class 'rainbow': Unable to convert schema: unsupported validator 'Match'"
        );
    }

    #[test]
    fn test_collect_load_errors() {
        assert!(LoadError::collect(Vec::new()).is_none());

        let single = LoadError::collect(vec![LoadError::MissingId {
            path: PathBuf::from("a.toml"),
        }]);
        assert!(matches!(single, Some(LoadError::MissingId { .. })));

        let multiple = LoadError::collect(vec![
            LoadError::MissingId {
                path: PathBuf::from("a.toml"),
            },
            LoadError::UnsupportedFormat {
                path: PathBuf::from("b.yaml"),
            },
        ])
        .unwrap();
        let message = multiple.to_string();
        assert!(message.contains("1. Missing class id in a.toml"));
        assert!(message.contains("2. Unsupported definition format: b.yaml"));
    }
}
