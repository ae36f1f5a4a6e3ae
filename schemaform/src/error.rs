//! Error types for schema conversion.

use thiserror::Error;

/// Error raised while converting a validation tree.
///
/// Conversion is all-or-nothing: when any node fails, no partial
/// [`FormSchema`](crate::FormSchema) is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The tree contains a validator the converter has no rule for.
    #[error("Unable to convert schema: unsupported validator '{kind}'")]
    UnsupportedNode { kind: String },

    /// A key's default provider failed.
    #[error("Default value provider for '{key}' failed: {source}")]
    DefaultProvider {
        key: String,
        #[source]
        source: DefaultError,
    },

    /// Two entries of one mapping share a plain key name.
    #[error("Duplicate key '{key}' in mapping")]
    DuplicateKey { key: String },
}

impl ConversionError {
    /// Create an unsupported node error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedNode { kind: kind.into() }
    }
}

/// Failure reported by a default value provider.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct DefaultError {
    message: String,
}

impl DefaultError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for DefaultError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}
