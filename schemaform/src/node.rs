//! Validation node definitions.
//!
//! This module defines the tree that describes a validation schema: mappings
//! of annotated keys, composite `All` nodes, constraints and primitive type
//! tags. The tree is what [`SchemaConverter`](crate::SchemaConverter) walks
//! to produce a [`FormSchema`](crate::FormSchema).
//!
//! Nodes can be built in code with the constructor helpers or loaded from a
//! TOML/JSON document:
//!
//! ```toml
//! kind = "mapping"
//!
//! [[entries]]
//! name = "led_count"
//! required = true
//! description = "Number of pixels on the strip"
//!
//! [entries.value]
//! kind = "all"
//! validators = [
//!     { kind = "coerce", target = { kind = "type", name = "integer" } },
//!     { kind = "range", min = 1 },
//! ]
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::error::DefaultError;

/// Format used by [`ValidationNode::Datetime`] when a definition omits one.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%fZ";

/// One node of a validation-schema tree.
///
/// Every validator kind the converter understands has its own variant.
/// Validators with no JSON form are carried as [`ValidationNode::Opaque`]
/// and rejected at conversion time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationNode {
    /// Ordered set of annotated keys, each with its own validator.
    Mapping { entries: Vec<MappingEntry> },

    /// All validators must pass; their descriptions are merged in order.
    All { validators: Vec<ValidationNode> },

    /// Length bounds for strings and arrays.
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },

    /// Numeric range check.
    Range {
        #[serde(default)]
        min: Option<Number>,
        #[serde(default)]
        max: Option<Number>,
    },

    /// Numeric clamp; described exactly like a range.
    Clamp {
        #[serde(default)]
        min: Option<Number>,
        #[serde(default)]
        max: Option<Number>,
    },

    /// Datetime string in the given `strftime` format.
    Datetime {
        #[serde(default = "default_datetime_format")]
        format: String,
    },

    /// Membership in a fixed list of literal values.
    In { options: Vec<Value> },

    /// Coerce the input, then validate it against `target`.
    Coerce { target: Box<ValidationNode> },

    /// Bare primitive type tag.
    Type { name: PrimitiveType },

    /// A validator that has no JSON description (custom callables, regex
    /// matchers, ...). Identified only by name.
    Opaque { name: String },
}

fn default_datetime_format() -> String {
    DEFAULT_DATETIME_FORMAT.to_string()
}

impl ValidationNode {
    /// Create a mapping node from `(key, validator)` pairs, keeping their order.
    pub fn mapping(entries: impl IntoIterator<Item = (SchemaKey, ValidationNode)>) -> Self {
        ValidationNode::Mapping {
            entries: entries
                .into_iter()
                .map(|(key, value)| MappingEntry::new(key, value))
                .collect(),
        }
    }

    /// Create a composite node whose validators must all pass.
    pub fn all(validators: impl IntoIterator<Item = ValidationNode>) -> Self {
        ValidationNode::All {
            validators: validators.into_iter().collect(),
        }
    }

    /// Create a length constraint.
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        ValidationNode::Length { min, max }
    }

    /// Create a range constraint.
    pub fn range(min: Option<Number>, max: Option<Number>) -> Self {
        ValidationNode::Range { min, max }
    }

    /// Create a clamp constraint.
    pub fn clamp(min: Option<Number>, max: Option<Number>) -> Self {
        ValidationNode::Clamp { min, max }
    }

    /// Create a datetime node with the given format string.
    pub fn datetime(format: impl Into<String>) -> Self {
        ValidationNode::Datetime {
            format: format.into(),
        }
    }

    /// Create an enum-membership node.
    pub fn one_of(options: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        ValidationNode::In {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Wrap `target` in a coercion.
    pub fn coerce(target: ValidationNode) -> Self {
        ValidationNode::Coerce {
            target: Box::new(target),
        }
    }

    /// Create a primitive type tag.
    pub fn of_type(name: PrimitiveType) -> Self {
        ValidationNode::Type { name }
    }

    pub fn integer() -> Self {
        Self::of_type(PrimitiveType::Integer)
    }

    pub fn string() -> Self {
        Self::of_type(PrimitiveType::String)
    }

    pub fn number() -> Self {
        Self::of_type(PrimitiveType::Number)
    }

    pub fn boolean() -> Self {
        Self::of_type(PrimitiveType::Boolean)
    }

    pub fn array() -> Self {
        Self::of_type(PrimitiveType::Array)
    }

    /// Create a validator that cannot be described.
    pub fn opaque(name: impl Into<String>) -> Self {
        ValidationNode::Opaque { name: name.into() }
    }

    /// Short name of the node kind, used in logs and errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValidationNode::Mapping { .. } => "mapping",
            ValidationNode::All { .. } => "all",
            ValidationNode::Length { .. } => "length",
            ValidationNode::Range { .. } => "range",
            ValidationNode::Clamp { .. } => "clamp",
            ValidationNode::Datetime { .. } => "datetime",
            ValidationNode::In { .. } => "in",
            ValidationNode::Coerce { .. } => "coerce",
            ValidationNode::Type { .. } => "type",
            ValidationNode::Opaque { .. } => "opaque",
        }
    }
}

/// Primitive type tags with a fixed JSON type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Integer,
    String,
    Number,
    Boolean,
    Array,
}

impl PrimitiveType {
    /// Every primitive type, in table order.
    pub const ALL: [PrimitiveType; 5] = [
        PrimitiveType::Integer,
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::Boolean,
        PrimitiveType::Array,
    ];

    /// The JSON type name emitted for this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Integer => "integer",
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Array => "array",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key of a mapping node together with its validator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEntry")]
pub struct MappingEntry {
    pub key: SchemaKey,
    pub value: ValidationNode,
}

impl MappingEntry {
    pub fn new(key: SchemaKey, value: ValidationNode) -> Self {
        Self { key, value }
    }
}

/// On-disk shape of a mapping entry: the key annotations sit next to the
/// validator instead of in a nested table.
#[derive(Deserialize)]
struct RawEntry {
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "present")]
    default: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    value: ValidationNode,
}

/// Keeps an explicit `null` default instead of folding it into `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<RawEntry> for MappingEntry {
    fn from(raw: RawEntry) -> Self {
        let presence = if raw.required {
            Presence::Required
        } else {
            Presence::Optional
        };
        MappingEntry {
            key: SchemaKey {
                name: raw.name,
                presence,
                default: raw.default.map(DefaultValue::Literal),
                description: raw.description,
            },
            value: raw.value,
        }
    }
}

/// Whether a key must be present in valid data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    Required,
    #[default]
    Optional,
}

/// An annotated mapping key.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaKey {
    /// Plain key name, annotations stripped.
    pub name: String,
    pub presence: Presence,
    pub default: Option<DefaultValue>,
    pub description: Option<String>,
}

impl SchemaKey {
    /// A key that must be present.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            presence: Presence::Required,
            default: None,
            description: None,
        }
    }

    /// A key that may be omitted.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::required(name)
        }
    }

    /// Set a literal default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Set a default produced on demand.
    pub fn with_default_fn<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Result<Value, DefaultError> + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::provider(provider));
        self
    }

    /// Set a human-readable description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

/// Default value of a key: either a literal or a zero-argument producer.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(Value),
    Provider(DefaultProvider),
}

impl DefaultValue {
    /// Wrap a producer function.
    pub fn provider<F>(provider: F) -> Self
    where
        F: Fn() -> Result<Value, DefaultError> + Send + Sync + 'static,
    {
        DefaultValue::Provider(DefaultProvider(Arc::new(provider)))
    }

    /// Produce the concrete default value.
    pub fn resolve(&self) -> Result<Value, DefaultError> {
        match self {
            DefaultValue::Literal(value) => Ok(value.clone()),
            DefaultValue::Provider(provider) => provider.call(),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Literal(value)
    }
}

type ProviderFn = dyn Fn() -> Result<Value, DefaultError> + Send + Sync;

/// Shared handle to a default-producing function.
#[derive(Clone)]
pub struct DefaultProvider(Arc<ProviderFn>);

impl DefaultProvider {
    pub fn call(&self) -> Result<Value, DefaultError> {
        (self.0)()
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultProvider(..)")
    }
}

/// Two providers are equal only when they share the same function.
impl PartialEq for DefaultProvider {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_key_builders() {
        let key = SchemaKey::optional("speed")
            .with_default(1.5)
            .with_description("Effect speed");

        assert_eq!(key.name, "speed");
        assert!(!key.is_required());
        assert_eq!(key.description.as_deref(), Some("Effect speed"));
        assert_eq!(key.default.unwrap().resolve().unwrap(), serde_json::json!(1.5));
    }

    #[test]
    fn test_default_provider_is_invoked() {
        let key = SchemaKey::required("id").with_default_fn(|| Ok(Value::from("generated")));
        let value = key.default.as_ref().unwrap().resolve().unwrap();
        assert_eq!(value, Value::from("generated"));
    }

    #[test]
    fn test_default_provider_equality_is_identity() {
        let provider = DefaultValue::provider(|| Ok(Value::Null));
        let same = provider.clone();
        let other = DefaultValue::provider(|| Ok(Value::Null));

        assert_eq!(provider, same);
        assert_ne!(provider, other);
    }

    #[test]
    fn test_primitive_type_names() {
        let names: Vec<_> = PrimitiveType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["integer", "string", "number", "boolean", "array"]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValidationNode::integer().kind_name(), "type");
        assert_eq!(ValidationNode::one_of([1, 2]).kind_name(), "in");
        assert_eq!(ValidationNode::opaque("Match").kind_name(), "opaque");
    }

    #[test]
    fn test_deserialize_mapping_from_json() {
        let node: ValidationNode = serde_json::from_value(serde_json::json!({
            "kind": "mapping",
            "entries": [
                {
                    "name": "name",
                    "required": true,
                    "description": "Friendly name",
                    "value": { "kind": "type", "name": "string" }
                },
                {
                    "name": "brightness",
                    "default": 1.0,
                    "value": {
                        "kind": "all",
                        "validators": [
                            { "kind": "coerce", "target": { "kind": "type", "name": "number" } },
                            { "kind": "range", "min": 0, "max": 1 }
                        ]
                    }
                }
            ]
        }))
        .unwrap();

        let ValidationNode::Mapping { entries } = node else {
            panic!("expected a mapping node");
        };
        assert_eq!(entries.len(), 2);
        assert!(entries[0].key.is_required());
        assert_eq!(entries[0].value, ValidationNode::string());
        assert!(!entries[1].key.is_required());
        assert_eq!(
            entries[1].key.default,
            Some(DefaultValue::Literal(serde_json::json!(1.0)))
        );
    }

    #[test]
    fn test_deserialize_explicit_null_default() {
        let entry: MappingEntry = serde_json::from_value(serde_json::json!({
            "name": "preset",
            "default": null,
            "value": { "kind": "type", "name": "string" }
        }))
        .unwrap();

        assert_eq!(entry.key.default, Some(DefaultValue::Literal(Value::Null)));
    }

    #[test]
    fn test_deserialize_datetime_default_format() {
        let node: ValidationNode =
            serde_json::from_value(serde_json::json!({ "kind": "datetime" })).unwrap();
        assert_eq!(node, ValidationNode::datetime(DEFAULT_DATETIME_FORMAT));
    }
}
