//! Intermediate representation between attribute parsing and codegen.
//!
//! The parser resolves every attribute decision (key name, presence,
//! validators) into these types, so the generator only has to emit tokens.

use syn::{Generics, Ident, Path, Type};

use crate::parser::attributes::LitValue;

/// A struct deriving `ValidationSchema`.
#[derive(Debug, Clone)]
pub struct SchemaIR {
    pub ident: Ident,
    pub generics: Generics,
    /// Keys in declaration order, skipped fields removed
    pub fields: Vec<FieldIR>,
}

/// One key of the generated mapping.
#[derive(Debug, Clone)]
pub struct FieldIR {
    /// Key name after renaming
    pub key: String,
    pub required: bool,
    pub description: Option<String>,
    pub default: Option<DefaultIR>,
    /// Validators, combined into an `All` node when more than one
    pub validators: Vec<ValidatorIR>,
}

#[derive(Debug, Clone)]
pub enum DefaultIR {
    Literal(LitValue),
    Function(Path),
}

/// A single validator node.
#[derive(Debug, Clone)]
pub enum ValidatorIR {
    /// Delegate to the type's own `ValidationSchema` impl
    Type { ty: Type, coerce: bool },
    OneOf(Vec<LitValue>),
    Datetime(Option<String>),
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Bounds {
        min: Option<LitValue>,
        max: Option<LitValue>,
        clamp: bool,
    },
}
