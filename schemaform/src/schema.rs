//! Form schema output types.
//!
//! [`FormSchema`] is the JSON-Schema-like document consumed by the frontend
//! form renderer. Its vocabulary is closed: `type`, `title`, `description`,
//! `default`, `properties`, `required`, `lengthMin`, `lengthMax`, `valueMin`,
//! `valueMax`, `format`, `options`, `enum` and `dependencies` (whose entries
//! carry `oneOf`). Any addition here has to be mirrored in the renderer.
//!
//! # Example
//!
//! ```rust
//! use schemaform::FormSchema;
//!
//! let schema = FormSchema::of_type("object")
//!     .with_property("name", FormSchema::of_type("string").with_title("Name"))
//!     .with_required("name");
//!
//! assert_eq!(
//!     schema.to_json(),
//!     r#"{"type":"object","properties":{"name":{"type":"string","title":"Name"}},"required":["name"]}"#
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Schema for one form value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Type name (e.g., "string", "object", "select", "datetime")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value; an explicit `null` default is kept
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,

    /// For object types, the properties in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<OrderedMap<FormSchema>>,

    /// Required property names; never emitted empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_min: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_max: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_min: Option<Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<Number>,

    /// Format hint (datetime format string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Allowed values for a select
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,

    /// Literal values the field is restricted to
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Conditional schemas keyed by the property that selects them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<OrderedMap<Dependency>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FormSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema with the given type name.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Add a property, replacing an existing one with the same name in place.
    pub fn with_property(mut self, name: impl Into<String>, schema: FormSchema) -> Self {
        self.properties
            .get_or_insert_with(OrderedMap::new)
            .insert(name, schema);
        self
    }

    /// Mark a property as required.
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.get_or_insert_with(Vec::new).push(name.into());
        self
    }

    /// Restrict the value to the given literals.
    pub fn with_enum(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the allowed select options.
    pub fn with_options(mut self, options: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Set the format hint.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Attach a conditional schema selected by `key`.
    pub fn with_dependency(mut self, key: impl Into<String>, dependency: Dependency) -> Self {
        self.dependencies
            .get_or_insert_with(OrderedMap::new)
            .insert(key, dependency);
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&FormSchema> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Shallow merge: every field set on `other` overwrites the same field
    /// on `self`.
    pub fn merge(&mut self, other: FormSchema) {
        overwrite(&mut self.type_name, other.type_name);
        overwrite(&mut self.title, other.title);
        overwrite(&mut self.description, other.description);
        overwrite(&mut self.default, other.default);
        overwrite(&mut self.properties, other.properties);
        overwrite(&mut self.required, other.required);
        overwrite(&mut self.length_min, other.length_min);
        overwrite(&mut self.length_max, other.length_max);
        overwrite(&mut self.value_min, other.value_min);
        overwrite(&mut self.value_max, other.value_max);
        overwrite(&mut self.format, other.format);
        overwrite(&mut self.options, other.options);
        overwrite(&mut self.enum_values, other.enum_values);
        overwrite(&mut self.dependencies, other.dependencies);
    }

    /// Convert to a JSON value.
    pub fn try_to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Convert to a JSON string.
    pub fn try_to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Convert to a pretty-printed JSON string.
    pub fn try_to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    // The infallible forms below rely on every field serializing without
    // error: strings, `Number`s, `Value`s and string-keyed maps only.

    /// Convert to a JSON value.
    pub fn to_value(&self) -> Value {
        self.try_to_value().unwrap_or_default()
    }

    /// Convert to a JSON string.
    pub fn to_json(&self) -> String {
        self.try_to_json().unwrap_or_default()
    }

    /// Convert to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> String {
        self.try_to_json_pretty().unwrap_or_default()
    }
}

fn overwrite<T>(slot: &mut Option<T>, newer: Option<T>) {
    if newer.is_some() {
        *slot = newer;
    }
}

/// Alternative schemas, exactly one of which must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "oneOf")]
    pub one_of: Vec<FormSchema>,
}

impl Dependency {
    pub fn one_of(schemas: impl IntoIterator<Item = FormSchema>) -> Self {
        Self {
            one_of: schemas.into_iter().collect(),
        }
    }
}

/// String-keyed map that keeps insertion order and serializes as a JSON
/// object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and gets the new
    /// value; the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}
