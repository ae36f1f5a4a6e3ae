//! Attribute parsing using darling.
//!
//! This module defines the structures for `#[schema(...)]` attributes on the
//! struct and on its fields.

use darling::ast::{Data, NestedMeta};
use darling::util::{Ignored, Override};
use darling::{FromDeriveInput, FromField, FromMeta};
use syn::{Attribute, Expr, ExprUnary, Generics, Ident, Lit, Path, Type, UnOp};

/// Container-level attributes, parsed from `#[schema(...)]` on the struct.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(schema), supports(struct_named))]
pub struct ContainerAttrs {
    pub ident: Ident,

    pub generics: Generics,

    pub data: Data<Ignored, FieldAttrs>,

    /// Rename all keys using a case convention
    #[darling(default)]
    pub rename_all: Option<RenameRule>,
}

/// Field-level attributes, parsed from `#[schema(...)]` on named fields.
#[derive(Debug, Clone, FromField)]
#[darling(attributes(schema), forward_attrs(doc))]
pub struct FieldAttrs {
    pub ident: Option<Ident>,

    pub ty: Type,

    /// Forwarded doc comments
    pub attrs: Vec<Attribute>,

    #[darling(default)]
    pub rename: Option<String>,

    #[darling(default)]
    pub skip: bool,

    /// Force the key to be optional
    #[darling(default)]
    pub optional: bool,

    /// Force the key to be required, even for `Option<T>`
    #[darling(default)]
    pub required: bool,

    #[darling(default)]
    pub description: Option<String>,

    /// Literal default value
    #[darling(default)]
    pub default: Option<LitValue>,

    /// Function producing the default value
    #[darling(default)]
    pub default_fn: Option<Path>,

    /// Validation: minimum value
    #[darling(default)]
    pub min: Option<LitValue>,

    /// Validation: maximum value
    #[darling(default)]
    pub max: Option<LitValue>,

    /// Describe `min`/`max` as a clamp instead of a range
    #[darling(default)]
    pub clamp: bool,

    /// Validation: minimum length
    #[darling(default)]
    pub min_length: Option<usize>,

    /// Validation: maximum length
    #[darling(default)]
    pub max_length: Option<usize>,

    /// Validation: membership in a list of literals
    #[darling(default)]
    pub one_of: Option<OneOf>,

    /// Validation: datetime string, with an optional format
    #[darling(default)]
    pub datetime: Option<Override<String>>,

    /// Coerce the input to the field type
    #[darling(default)]
    pub coerce: bool,
}

impl FieldAttrs {
    /// Get the key name for this field (renamed or original).
    pub fn key_name(&self, rename_rule: Option<RenameRule>) -> String {
        if let Some(ref name) = self.rename {
            return name.clone();
        }

        let Some(ident) = &self.ident else {
            return String::new();
        };
        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name);
        match rename_rule {
            Some(rule) => rule.apply(name),
            None => name.to_string(),
        }
    }

    /// Check attribute combinations that cannot be expressed together.
    pub fn validate(&self) -> darling::Result<()> {
        let mut errors = darling::Error::accumulator();

        if self.optional && self.required {
            errors.push(darling::Error::custom(
                "`optional` and `required` cannot both be set",
            ));
        }
        if self.default.is_some() && self.default_fn.is_some() {
            errors.push(darling::Error::custom(
                "`default` and `default_fn` cannot both be set",
            ));
        }
        if self.datetime.is_some() && self.one_of.is_some() {
            errors.push(darling::Error::custom(
                "`datetime` and `one_of` cannot both be set",
            ));
        }
        if self.coerce {
            for (name, set) in [("one_of", self.one_of.is_some()), ("datetime", self.datetime.is_some())] {
                if set {
                    errors.push(darling::Error::custom(format!(
                        "`coerce` and `{}` cannot both be set",
                        name
                    )));
                }
            }
        }
        for (name, bound) in [("min", &self.min), ("max", &self.max)] {
            if let Some(value) = bound {
                if !value.is_number() {
                    errors.push(darling::Error::custom(format!("`{}` must be a number", name)));
                } else if !value.is_finite() {
                    errors.push(darling::Error::custom(format!("`{}` must be finite", name)));
                }
            }
        }
        if self.default.as_ref().is_some_and(|value| !value.is_finite()) {
            errors.push(darling::Error::custom("`default` must be finite"));
        }

        errors.finish().map_err(|err| match &self.ident {
            Some(ident) => err.with_span(ident),
            None => err,
        })
    }
}

/// A literal value written in an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl LitValue {
    pub fn is_number(&self) -> bool {
        matches!(self, LitValue::Int(_) | LitValue::Float(_))
    }

    /// False only for floats that overflowed to infinity (or NaN); JSON has
    /// no such numbers.
    pub fn is_finite(&self) -> bool {
        match self {
            LitValue::Float(value) => value.is_finite(),
            _ => true,
        }
    }

    fn negate(self) -> Option<Self> {
        match self {
            LitValue::Int(value) => Some(LitValue::Int(-value)),
            LitValue::Float(value) => Some(LitValue::Float(-value)),
            _ => None,
        }
    }
}

impl FromMeta for LitValue {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Lit(lit) => Self::from_value(&lit.lit),
            Expr::Group(group) => Self::from_expr(&group.expr),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr: inner,
                ..
            }) => Self::from_expr(inner)?
                .negate()
                .ok_or_else(|| darling::Error::custom("only numbers can be negated").with_span(expr)),
            _ => Err(darling::Error::custom("expected a literal").with_span(expr)),
        }
    }

    fn from_value(lit: &Lit) -> darling::Result<Self> {
        match lit {
            Lit::Str(s) => Ok(LitValue::Str(s.value())),
            Lit::Int(i) => i
                .base10_parse()
                .map(LitValue::Int)
                .map_err(|err| darling::Error::custom(err).with_span(i)),
            Lit::Float(f) => f
                .base10_parse()
                .map(LitValue::Float)
                .map_err(|err| darling::Error::custom(err).with_span(f)),
            Lit::Bool(b) => Ok(LitValue::Bool(b.value)),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        }
    }
}

/// The literal list of `one_of(...)`.
#[derive(Debug, Clone)]
pub struct OneOf(pub Vec<LitValue>);

impl FromMeta for OneOf {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let values = items
            .iter()
            .filter_map(|item| match item {
                NestedMeta::Lit(lit) => errors.handle(LitValue::from_value(lit)),
                NestedMeta::Meta(meta) => {
                    errors.push(darling::Error::custom("expected a literal").with_span(meta));
                    None
                }
            })
            .collect();
        errors.finish_with(OneOf(values))
    }
}

/// Rename rule for key name transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromMeta)]
pub enum RenameRule {
    #[darling(rename = "camelCase")]
    CamelCase,

    #[darling(rename = "snake_case")]
    SnakeCase,

    #[darling(rename = "PascalCase")]
    PascalCase,

    #[darling(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,

    #[darling(rename = "kebab-case")]
    KebabCase,
}

impl RenameRule {
    /// Apply the rename rule to a string.
    pub fn apply(&self, name: &str) -> String {
        use convert_case::{Case, Casing};

        match self {
            RenameRule::CamelCase => name.to_case(Case::Camel),
            RenameRule::SnakeCase => name.to_case(Case::Snake),
            RenameRule::PascalCase => name.to_case(Case::Pascal),
            RenameRule::ScreamingSnakeCase => name.to_case(Case::UpperSnake),
            RenameRule::KebabCase => name.to_case(Case::Kebab),
        }
    }
}
