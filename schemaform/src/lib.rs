//! # schemaform
//!
//! Converts validation-schema trees into the JSON-Schema-style documents a
//! frontend form renderer consumes.
//!
//! ## Overview
//!
//! A [`ValidationNode`] tree describes what valid data looks like: mappings
//! of annotated keys, composite `All` nodes, length and range constraints,
//! datetime formats, enum membership and primitive type tags.
//! [`SchemaConverter`] turns such a tree into a [`FormSchema`], and
//! [`RegistryDescriptor`] builds one discriminated-union schema over every
//! class of a [`ClassRegistry`], selected by a `registry_type` property.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemaform::{convert, Number, SchemaKey, ValidationNode};
//!
//! let node = ValidationNode::mapping([
//!     (
//!         SchemaKey::required("led_count").with_description("Pixels on the strip"),
//!         ValidationNode::all([
//!             ValidationNode::coerce(ValidationNode::integer()),
//!             ValidationNode::range(Some(Number::from(1)), None),
//!         ]),
//!     ),
//!     (
//!         SchemaKey::optional("brightness").with_default(1.0),
//!         ValidationNode::number(),
//!     ),
//! ]);
//!
//! let schema = convert(&node).unwrap();
//! let led_count = schema.property("led_count").unwrap();
//! assert_eq!(led_count.title.as_deref(), Some("Led Count"));
//! assert_eq!(led_count.value_min, Some(Number::from(1)));
//! assert_eq!(schema.required, Some(vec!["led_count".to_string()]));
//! ```
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `derive` | `#[derive(ValidationSchema)]` | ✅ |
//!
//! ## Conversion Rules
//!
//! | Node | Output |
//! |------|--------|
//! | `Mapping` | `properties`, `required` (only when non-empty), per key `title`, `description`, `default` |
//! | `All` | shallow merge of the children, later wins |
//! | `Length` | `lengthMin`, `lengthMax` |
//! | `Range`, `Clamp` | `valueMin`, `valueMax` |
//! | `Datetime` | `type: "datetime"`, `format` |
//! | `In` | `type: "select"`, `options` |
//! | `Coerce` | the target's output |
//! | `Type` | `type` |
//! | `Opaque` | [`ConversionError::UnsupportedNode`] |
//!
//! ## Derive Attributes
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `#[schema(rename_all = "camelCase")]` | Rename all keys (container) |
//! | `#[schema(rename = "name")]` | Rename this key |
//! | `#[schema(skip)]` | Leave the field out |
//! | `#[schema(optional)]` / `#[schema(required)]` | Override key presence |
//! | `#[schema(description = "...")]` | Key description (doc comments otherwise) |
//! | `#[schema(default = 1.0)]` | Literal default |
//! | `#[schema(default_fn = "path")]` | Default provider |
//! | `#[schema(min = N, max = N)]` | `Range` |
//! | `#[schema(clamp)]` | Use `Clamp` instead of `Range` |
//! | `#[schema(min_length = N, max_length = N)]` | `Length` |
//! | `#[schema(one_of("a", "b"))]` | `In` |
//! | `#[schema(datetime = "%H:%M")]` | `Datetime` |
//! | `#[schema(coerce)]` | Wrap the type in `Coerce` |

pub mod convert;
pub mod error;
pub mod node;
pub mod registry;
pub mod schema;
pub mod title;
pub mod traits;

pub use convert::{convert, ConverterConfig, DuplicateKeyPolicy, SchemaConverter};
pub use error::{ConversionError, DefaultError};
pub use node::{
    DefaultProvider, DefaultValue, MappingEntry, Presence, PrimitiveType, SchemaKey,
    ValidationNode, DEFAULT_DATETIME_FORMAT,
};
pub use registry::{
    describe, ClassRegistry, RegistryDescriptor, SchemaClass, TypedClass, REGISTRY_TYPE_KEY,
};
pub use schema::{Dependency, FormSchema, OrderedMap};
pub use title::titleize;
pub use traits::ValidationSchema;

// Re-exported for generated code and callers building defaults
pub use serde_json::{Number, Value};

// Re-export derive macro when available
#[cfg(feature = "derive")]
pub use schemaform_macros::ValidationSchema;
