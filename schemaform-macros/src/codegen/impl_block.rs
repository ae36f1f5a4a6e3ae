//! Impl block generation for the ValidationSchema trait.
//!
//! Emits `impl ::schemaform::ValidationSchema for Type`, whose body builds
//! the `Mapping` node from the resolved [`SchemaIR`].

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Generics};

use crate::ir::{DefaultIR, FieldIR, SchemaIR, ValidatorIR};
use crate::parser::attributes::LitValue;

/// Generates the impl block for the ValidationSchema trait.
#[derive(Debug, Default)]
pub struct ImplBlockGenerator;

impl ImplBlockGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate the complete impl block for a schema.
    pub fn generate(&self, schema: &SchemaIR) -> TokenStream {
        let name = &schema.ident;
        let generics = self.add_trait_bounds(&schema.generics);
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let entries = schema.fields.iter().map(|field| self.generate_entry(field));

        quote! {
            impl #impl_generics ::schemaform::ValidationSchema for #name #ty_generics #where_clause {
                fn validation_schema() -> ::schemaform::ValidationNode {
                    ::schemaform::ValidationNode::mapping([
                        #(#entries),*
                    ])
                }
            }
        }
    }

    /// Every type parameter must describe itself too.
    fn add_trait_bounds(&self, generics: &Generics) -> Generics {
        let mut generics = generics.clone();
        for param in generics.type_params_mut() {
            param
                .bounds
                .push(parse_quote!(::schemaform::ValidationSchema));
        }
        generics
    }

    /// Generate one `(SchemaKey, ValidationNode)` pair.
    fn generate_entry(&self, field: &FieldIR) -> TokenStream {
        let key_name = &field.key;
        let constructor = if field.required {
            quote! { required }
        } else {
            quote! { optional }
        };

        let description = field
            .description
            .as_ref()
            .map(|d| quote! { .with_description(#d) })
            .unwrap_or_default();

        let default = match &field.default {
            Some(DefaultIR::Literal(value)) => {
                let value = self.generate_value(value);
                quote! { .with_default(#value) }
            }
            Some(DefaultIR::Function(path)) => quote! {
                .with_default_fn(|| ::std::result::Result::Ok(::schemaform::Value::from(#path())))
            },
            None => quote! {},
        };

        let node = self.generate_node(&field.validators);

        quote! {
            (
                ::schemaform::SchemaKey::#constructor(#key_name) #description #default,
                #node,
            )
        }
    }

    /// A single validator stays as is; several are combined into `All`.
    fn generate_node(&self, validators: &[ValidatorIR]) -> TokenStream {
        let nodes: Vec<_> = validators
            .iter()
            .map(|validator| self.generate_validator(validator))
            .collect();

        match nodes.as_slice() {
            [node] => node.clone(),
            _ => quote! { ::schemaform::ValidationNode::all([#(#nodes),*]) },
        }
    }

    fn generate_validator(&self, validator: &ValidatorIR) -> TokenStream {
        match validator {
            ValidatorIR::Type { ty, coerce } => {
                let node = quote! {
                    <#ty as ::schemaform::ValidationSchema>::validation_schema()
                };
                if *coerce {
                    quote! { ::schemaform::ValidationNode::coerce(#node) }
                } else {
                    node
                }
            }
            ValidatorIR::OneOf(values) => {
                let values = values.iter().map(|value| self.generate_value(value));
                quote! {
                    ::schemaform::ValidationNode::one_of(
                        ::std::vec::Vec::<::schemaform::Value>::from([#(#values),*])
                    )
                }
            }
            ValidatorIR::Datetime(format) => {
                let format = match format {
                    Some(format) => quote! { #format },
                    None => quote! { ::schemaform::DEFAULT_DATETIME_FORMAT },
                };
                quote! { ::schemaform::ValidationNode::datetime(#format) }
            }
            ValidatorIR::Length { min, max } => {
                let min = self.generate_option(min.map(|n| quote! { #n }));
                let max = self.generate_option(max.map(|n| quote! { #n }));
                quote! { ::schemaform::ValidationNode::length(#min, #max) }
            }
            ValidatorIR::Bounds { min, max, clamp } => {
                let min = self.generate_number(min.as_ref());
                let max = self.generate_number(max.as_ref());
                if *clamp {
                    quote! { ::schemaform::ValidationNode::clamp(#min, #max) }
                } else {
                    quote! { ::schemaform::ValidationNode::range(#min, #max) }
                }
            }
        }
    }

    /// A literal as a `Value` expression.
    fn generate_value(&self, value: &LitValue) -> TokenStream {
        let inner = match value {
            LitValue::Str(s) => quote! { #s },
            LitValue::Int(i) => quote! { #i },
            LitValue::Float(f) => quote! { #f },
            LitValue::Bool(b) => quote! { #b },
        };
        quote! { ::schemaform::Value::from(#inner) }
    }

    /// A bound as an `Option<Number>` expression.
    fn generate_number(&self, value: Option<&LitValue>) -> TokenStream {
        match value {
            Some(LitValue::Int(i)) => quote! {
                ::std::option::Option::Some(::schemaform::Number::from(#i))
            },
            Some(LitValue::Float(f)) => quote! { ::schemaform::Number::from_f64(#f) },
            // Non-numeric bounds are rejected while parsing
            _ => quote! { ::std::option::Option::None },
        }
    }

    fn generate_option(&self, value: Option<TokenStream>) -> TokenStream {
        match value {
            Some(value) => quote! { ::std::option::Option::Some(#value) },
            None => quote! { ::std::option::Option::None },
        }
    }
}
