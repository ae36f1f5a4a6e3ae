//! Struct parsing logic.
//!
//! Resolves the darling attributes of a struct into [`SchemaIR`]: key names,
//! presence, descriptions, defaults and the validator list of every field.

use darling::ast::Data;
use darling::util::Override;
use syn::{Attribute, Expr, Lit, Meta};

use crate::ir::{DefaultIR, FieldIR, SchemaIR, ValidatorIR};
use crate::parser::attributes::{ContainerAttrs, FieldAttrs, OneOf, RenameRule};
use crate::parser::type_parser::option_inner;

/// Parses struct definitions into SchemaIR.
pub struct StructParser;

impl StructParser {
    /// Parse container attributes into a SchemaIR.
    pub fn parse(attrs: ContainerAttrs) -> darling::Result<SchemaIR> {
        let ContainerAttrs {
            ident,
            generics,
            data,
            rename_all,
        } = attrs;

        let fields = match data {
            Data::Struct(fields) => fields.fields,
            Data::Enum(_) => {
                return Err(darling::Error::custom(
                    "ValidationSchema can only be derived for structs with named fields",
                )
                .with_span(&ident))
            }
        };

        let mut errors = darling::Error::accumulator();
        let fields = fields
            .iter()
            .filter(|field| !field.skip)
            .filter_map(|field| errors.handle(Self::parse_field(field, rename_all)))
            .collect();
        errors.finish()?;

        Ok(SchemaIR {
            ident,
            generics,
            fields,
        })
    }

    /// Parse one named field into FieldIR.
    fn parse_field(field: &FieldAttrs, rename_all: Option<RenameRule>) -> darling::Result<FieldIR> {
        field.validate()?;

        let inner = option_inner(&field.ty);
        let required = if field.required {
            true
        } else if field.optional {
            false
        } else {
            inner.is_none()
        };

        // Attribute description overrides doc comments
        let description = field
            .description
            .clone()
            .or_else(|| extract_doc_comments(&field.attrs));

        let default = match (&field.default, &field.default_fn) {
            (Some(value), _) => Some(DefaultIR::Literal(value.clone())),
            (None, Some(path)) => Some(DefaultIR::Function(path.clone())),
            (None, None) => None,
        };

        let mut validators = Vec::new();
        validators.push(match (&field.datetime, &field.one_of) {
            (Some(Override::Explicit(format)), _) => ValidatorIR::Datetime(Some(format.clone())),
            (Some(Override::Inherit), _) => ValidatorIR::Datetime(None),
            (None, Some(OneOf(values))) => ValidatorIR::OneOf(values.clone()),
            (None, None) => ValidatorIR::Type {
                ty: inner.unwrap_or(&field.ty).clone(),
                coerce: field.coerce,
            },
        });
        if field.min_length.is_some() || field.max_length.is_some() {
            validators.push(ValidatorIR::Length {
                min: field.min_length,
                max: field.max_length,
            });
        }
        if field.min.is_some() || field.max.is_some() {
            validators.push(ValidatorIR::Bounds {
                min: field.min.clone(),
                max: field.max.clone(),
                clamp: field.clamp,
            });
        }

        Ok(FieldIR {
            key: field.key_name(rename_all),
            required,
            description,
            default,
            validators,
        })
    }
}

/// Extract doc comments from attributes.
///
/// Doc comments are `#[doc = "..."]` attributes; their lines are trimmed and
/// joined with newlines.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let description = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit_str) => Some(lit_str.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    (!description.is_empty()).then_some(description)
}
