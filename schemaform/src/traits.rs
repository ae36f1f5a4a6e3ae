//! Core traits for types that describe their own validation schema.
//!
//! [`ValidationSchema`] is implemented for common Rust types and can be
//! derived for structs with `#[derive(ValidationSchema)]`:
//!
//! ```rust,ignore
//! use schemaform::ValidationSchema;
//!
//! #[derive(ValidationSchema)]
//! struct Strip {
//!     #[schema(min = 1, max = 1024)]
//!     led_count: u32,
//!     name: String,
//! }
//! ```
//!
//! Manual implementations build the tree directly:
//!
//! ```rust
//! use schemaform::{SchemaKey, ValidationNode, ValidationSchema};
//!
//! struct Point;
//!
//! impl ValidationSchema for Point {
//!     fn validation_schema() -> ValidationNode {
//!         ValidationNode::mapping([
//!             (SchemaKey::required("x"), ValidationNode::number()),
//!             (SchemaKey::required("y"), ValidationNode::number()),
//!         ])
//!     }
//! }
//!
//! let schema = Point::form_schema().unwrap();
//! assert_eq!(schema.required, Some(vec!["x".to_string(), "y".to_string()]));
//! ```
//!
//! ## Blanket Implementations
//!
//! - **Integers** (`i8`-`i128`, `u8`-`u128`, `isize`, `usize`): `integer`
//! - **Floats** (`f32`, `f64`): `number`
//! - **Text** (`String`, `str`, `&str`, `char`): `string`
//! - **`bool`**: `boolean`
//! - **Sequences** (`Vec<T>`, `[T; N]`, `[T]`, `HashSet<T>`, `BTreeSet<T>`, `VecDeque<T>`): `array`
//! - **`Option<T>`**, **`Box<T>`**: the schema of `T`

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::convert::SchemaConverter;
use crate::error::ConversionError;
use crate::node::ValidationNode;
use crate::schema::FormSchema;

/// Trait for types that can describe themselves as a validation tree.
pub trait ValidationSchema {
    /// Returns the validation tree for this type.
    fn validation_schema() -> ValidationNode;

    /// Converts [`validation_schema`](ValidationSchema::validation_schema)
    /// with the default converter.
    fn form_schema() -> Result<FormSchema, ConversionError> {
        SchemaConverter::new().convert(&Self::validation_schema())
    }
}

// =============================================================================
// Primitive implementations
// =============================================================================

macro_rules! impl_validation_schema {
    ($node:ident => $($ty:ty),* $(,)?) => {
        $(
            impl ValidationSchema for $ty {
                fn validation_schema() -> ValidationNode {
                    ValidationNode::$node()
                }
            }
        )*
    };
}

impl_validation_schema!(integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_validation_schema!(number => f32, f64);
impl_validation_schema!(string => String, str, char);
impl_validation_schema!(boolean => bool);

impl ValidationSchema for &str {
    fn validation_schema() -> ValidationNode {
        ValidationNode::string()
    }
}

// =============================================================================
// Sequence implementations
// =============================================================================

impl<T> ValidationSchema for Vec<T> {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

impl<T> ValidationSchema for VecDeque<T> {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

impl<T> ValidationSchema for [T] {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

impl<T, const N: usize> ValidationSchema for [T; N] {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

impl<T> ValidationSchema for HashSet<T> {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

impl<T> ValidationSchema for BTreeSet<T> {
    fn validation_schema() -> ValidationNode {
        ValidationNode::array()
    }
}

// =============================================================================
// Wrapper implementations
// =============================================================================

/// Optionality is expressed on the mapping key, so `Option<T>` validates
/// like `T`.
impl<T: ValidationSchema> ValidationSchema for Option<T> {
    fn validation_schema() -> ValidationNode {
        T::validation_schema()
    }
}

impl<T: ValidationSchema + ?Sized> ValidationSchema for Box<T> {
    fn validation_schema() -> ValidationNode {
        T::validation_schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_schemas() {
        assert_eq!(u8::validation_schema(), ValidationNode::integer());
        assert_eq!(i128::validation_schema(), ValidationNode::integer());
        assert_eq!(f32::validation_schema(), ValidationNode::number());
        assert_eq!(String::validation_schema(), ValidationNode::string());
        assert_eq!(<&str>::validation_schema(), ValidationNode::string());
        assert_eq!(char::validation_schema(), ValidationNode::string());
        assert_eq!(bool::validation_schema(), ValidationNode::boolean());
    }

    #[test]
    fn test_sequence_schemas() {
        assert_eq!(Vec::<u8>::validation_schema(), ValidationNode::array());
        assert_eq!(<[f64; 3]>::validation_schema(), ValidationNode::array());
        assert_eq!(<[String]>::validation_schema(), ValidationNode::array());
        assert_eq!(HashSet::<String>::validation_schema(), ValidationNode::array());
        assert_eq!(BTreeSet::<i32>::validation_schema(), ValidationNode::array());
    }

    #[test]
    fn test_wrappers_delegate() {
        assert_eq!(Option::<u32>::validation_schema(), ValidationNode::integer());
        assert_eq!(Box::<str>::validation_schema(), ValidationNode::string());
        assert_eq!(
            Option::<Vec<bool>>::validation_schema(),
            ValidationNode::array()
        );
    }

    #[test]
    fn test_form_schema_uses_default_converter() {
        assert_eq!(f64::form_schema().unwrap().to_value(), json!({ "type": "number" }));
    }
}
