//! # schemaform-macros
//!
//! Procedural macros for building schemaform validation trees from Rust
//! structs.
//!
//! This crate provides the `#[derive(ValidationSchema)]` macro, which turns a
//! struct with named fields into a `Mapping` node so that the struct can be
//! converted directly or registered as a registry class.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaform::ValidationSchema;
//!
//! #[derive(ValidationSchema)]
//! #[schema(rename_all = "snake_case")]
//! struct Rainbow {
//!     /// Effect speed
//!     #[schema(min = 0.1, max = 10.0, default = 1.0, coerce)]
//!     speed: f64,
//!
//!     #[schema(one_of("left", "right"))]
//!     direction: String,
//!
//!     label: Option<String>,
//! }
//! ```
//!
//! ## Attributes
//!
//! ### Container Attributes
//!
//! - `#[schema(rename_all = "camelCase")]` - Rename all keys (camelCase, snake_case, PascalCase, SCREAMING_SNAKE_CASE, kebab-case)
//!
//! ### Field Attributes
//!
//! - `#[schema(rename = "name")]` - Rename this key
//! - `#[schema(skip)]` - Leave the field out
//! - `#[schema(optional)]` / `#[schema(required)]` - Override the presence implied by `Option<T>`
//! - `#[schema(description = "...")]` - Key description; doc comments are used otherwise
//! - `#[schema(default = <literal>)]` - Literal default value
//! - `#[schema(default_fn = "path::to::fn")]` - Default produced by calling a function
//!
//! ### Validation Attributes
//!
//! - `#[schema(min = N)]`, `#[schema(max = N)]` - Numeric range
//! - `#[schema(clamp)]` - Describe the bounds as a clamp
//! - `#[schema(min_length = N)]`, `#[schema(max_length = N)]` - Length bounds
//! - `#[schema(one_of(...))]` - Membership in a list of literals
//! - `#[schema(datetime)]`, `#[schema(datetime = "%H:%M")]` - Datetime string
//! - `#[schema(coerce)]` - Coerce the input to the field type before validating

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use syn::DeriveInput;

mod codegen;
mod ir;
mod parser;

use codegen::ImplBlockGenerator;
use parser::attributes::ContainerAttrs;
use parser::struct_parser::StructParser;

/// Derive macro building a `Mapping` validation tree from a struct.
///
/// # Example
///
/// ```rust,ignore
/// use schemaform::ValidationSchema;
///
/// #[derive(ValidationSchema)]
/// struct Strip {
///     #[schema(min = 1)]
///     led_count: u32,
///     name: String,
/// }
/// ```
#[proc_macro_derive(ValidationSchema, attributes(schema))]
pub fn derive_validation_schema(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match derive_validation_schema_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn derive_validation_schema_impl(
    input: &DeriveInput,
) -> Result<proc_macro2::TokenStream, darling::Error> {
    let attrs = ContainerAttrs::from_derive_input(input)?;
    let schema_ir = StructParser::parse(attrs)?;

    Ok(ImplBlockGenerator::new().generate(&schema_ir))
}
