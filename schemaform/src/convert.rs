//! Validation tree to form schema conversion.
//!
//! [`SchemaConverter`] walks a [`ValidationNode`] depth-first and maps every
//! node kind onto the [`FormSchema`] vocabulary:
//!
//! | Node | Form schema |
//! |------|-------------|
//! | `Mapping` | `properties` + `required`, with `title`/`description`/`default` per key |
//! | `All` | shallow merge of every child, later children win |
//! | `Length` | `lengthMin` / `lengthMax` |
//! | `Range`, `Clamp` | `valueMin` / `valueMax` |
//! | `Datetime` | `{ type: "datetime", format }` |
//! | `In` | `{ type: "select", options }` |
//! | `Coerce` | the converted target |
//! | `Type` | `{ type: <json type name> }` |
//! | `Opaque` | [`ConversionError::UnsupportedNode`] |

use serde::Deserialize;
use serde_json::Number;

use crate::error::ConversionError;
use crate::node::{MappingEntry, ValidationNode};
use crate::schema::{FormSchema, OrderedMap};
use crate::title::titleize;

/// What to do when two mapping entries share a plain key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// The later entry replaces the earlier one in place. A name that is
    /// required twice is listed twice in `required`.
    #[default]
    Overwrite,

    /// Fail with [`ConversionError::DuplicateKey`].
    Reject,
}

/// Converter configuration.
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ConverterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duplicate key policy.
    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}

/// Converts validation trees into form schemas.
///
/// Conversion is pure: the same tree always yields the same schema, and a
/// converter can be shared between threads.
///
/// # Example
///
/// ```rust
/// use schemaform::{SchemaConverter, SchemaKey, ValidationNode};
///
/// let node = ValidationNode::mapping([(
///     SchemaKey::required("led_count"),
///     ValidationNode::integer(),
/// )]);
///
/// let schema = SchemaConverter::new().convert(&node).unwrap();
/// assert_eq!(
///     schema.to_json(),
///     r#"{"properties":{"led_count":{"type":"integer","title":"Led Count"}},"required":["led_count"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaConverter {
    config: ConverterConfig,
}

impl SchemaConverter {
    /// Create a converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with the given configuration.
    pub fn with_config(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a validation tree.
    pub fn convert(&self, node: &ValidationNode) -> Result<FormSchema, ConversionError> {
        match node {
            ValidationNode::Mapping { entries } => self.convert_mapping(entries),
            ValidationNode::All { validators } => self.convert_all(validators),
            ValidationNode::Length { min, max } => Ok(FormSchema {
                length_min: *min,
                length_max: *max,
                ..FormSchema::default()
            }),
            ValidationNode::Range { min, max } | ValidationNode::Clamp { min, max } => {
                Ok(value_bounds(min, max))
            }
            ValidationNode::Datetime { format } => {
                Ok(FormSchema::of_type("datetime").with_format(format.clone()))
            }
            ValidationNode::In { options } => {
                Ok(FormSchema::of_type("select").with_options(options.iter().cloned()))
            }
            ValidationNode::Coerce { target } => self.convert(target),
            ValidationNode::Type { name } => Ok(FormSchema::of_type(name.as_str())),
            ValidationNode::Opaque { name } => {
                tracing::warn!(validator = %name, "validator has no form schema equivalent");
                Err(ConversionError::unsupported(name.clone()))
            }
        }
    }

    fn convert_mapping(&self, entries: &[MappingEntry]) -> Result<FormSchema, ConversionError> {
        let mut properties = OrderedMap::new();
        let mut required = Vec::new();

        for entry in entries {
            let key = &entry.key;
            let mut child = self.convert(&entry.value)?;

            child.title = Some(titleize(&key.name));
            if let Some(description) = &key.description {
                child.description = Some(description.clone());
            }
            if let Some(default) = &key.default {
                let value = default.resolve().map_err(|source| {
                    tracing::warn!(key = %key.name, error = %source, "default value provider failed");
                    ConversionError::DefaultProvider {
                        key: key.name.clone(),
                        source,
                    }
                })?;
                child.default = Some(value);
            }
            if key.is_required() {
                required.push(key.name.clone());
            }

            if properties.contains_key(&key.name) {
                match self.config.duplicate_keys {
                    DuplicateKeyPolicy::Overwrite => {
                        tracing::debug!(key = %key.name, "duplicate key overwrites earlier entry");
                    }
                    DuplicateKeyPolicy::Reject => {
                        tracing::warn!(key = %key.name, "duplicate key rejected");
                        return Err(ConversionError::DuplicateKey {
                            key: key.name.clone(),
                        });
                    }
                }
            }
            properties.insert(key.name.clone(), child);
        }

        Ok(FormSchema {
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
            ..FormSchema::default()
        })
    }

    fn convert_all(&self, validators: &[ValidationNode]) -> Result<FormSchema, ConversionError> {
        let mut merged = FormSchema::default();
        for validator in validators {
            merged.merge(self.convert(validator)?);
        }
        Ok(merged)
    }
}

fn value_bounds(min: &Option<Number>, max: &Option<Number>) -> FormSchema {
    FormSchema {
        value_min: min.clone(),
        value_max: max.clone(),
        ..FormSchema::default()
    }
}

/// Convert a validation tree with the default converter.
pub fn convert(node: &ValidationNode) -> Result<FormSchema, ConversionError> {
    SchemaConverter::new().convert(node)
}
