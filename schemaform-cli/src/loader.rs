//! Class definition loading.
//!
//! A definition file names one registry class and its validation tree:
//!
//! ```toml
//! id = "solid"
//!
//! [schema]
//! kind = "mapping"
//!
//! [[schema.entries]]
//! name = "color"
//! required = true
//! value = { kind = "type", name = "string" }
//! ```
//!
//! TOML and JSON are accepted, picked by file extension.

use std::collections::HashMap;
use std::path::PathBuf;

use schemaform::{ClassRegistry, ValidationNode};
use serde::Deserialize;

use crate::error::{CliResult, LoadError};
use crate::scanner::SourceFile;

/// On-disk shape of a definition file.
#[derive(Debug, Deserialize)]
struct ClassDefinition {
    id: String,
    schema: ValidationNode,
}

/// A class read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedClass {
    /// Registry id.
    pub id: String,

    /// Validation tree of the class.
    pub schema: ValidationNode,

    /// File the class was read from.
    pub path: PathBuf,
}

/// Turns scanned files into registry classes.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Parse one definition file.
    pub fn load_file(file: &SourceFile) -> Result<LoadedClass, LoadError> {
        let definition: ClassDefinition = match file.extension().as_deref() {
            Some("toml") => toml::from_str(&file.content).map_err(|e| LoadError::InvalidToml {
                path: file.path.clone(),
                message: e.to_string(),
            })?,
            Some("json") => {
                serde_json::from_str(&file.content).map_err(|e| LoadError::InvalidJson {
                    path: file.path.clone(),
                    message: e.to_string(),
                })?
            }
            _ => {
                return Err(LoadError::UnsupportedFormat {
                    path: file.path.clone(),
                })
            }
        };

        let id = definition.id.trim();
        if id.is_empty() {
            return Err(LoadError::MissingId {
                path: file.path.clone(),
            });
        }

        Ok(LoadedClass {
            id: id.to_string(),
            schema: definition.schema,
            path: file.path.clone(),
        })
    }

    /// Parse every file, keeping file order.
    ///
    /// All failures are collected; any failure, including two files with
    /// the same id, fails the whole load.
    pub fn load_files(files: &[SourceFile]) -> CliResult<Vec<LoadedClass>> {
        let mut classes = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for file in files {
            match Self::load_file(file) {
                Ok(class) => {
                    if let Some(first) = seen.get(&class.id) {
                        errors.push(LoadError::DuplicateId {
                            id: class.id.clone(),
                            first: first.clone(),
                            second: class.path.clone(),
                        });
                        continue;
                    }
                    seen.insert(class.id.clone(), class.path.clone());
                    classes.push(class);
                }
                Err(e) => errors.push(e),
            }
        }

        if let Some(error) = LoadError::collect(errors) {
            return Err(error.into());
        }

        tracing::debug!(classes = classes.len(), "loaded class definitions");
        Ok(classes)
    }

    /// Register the classes in order.
    pub fn into_registry(classes: Vec<LoadedClass>) -> ClassRegistry {
        let mut registry = ClassRegistry::new();
        for class in classes {
            registry.register(class.id, class.schema);
        }
        registry
    }

    /// Load `files` straight into a registry.
    pub fn load_registry(files: &[SourceFile]) -> CliResult<ClassRegistry> {
        Self::load_files(files).map(Self::into_registry)
    }
}
