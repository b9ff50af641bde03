//! Attribute parsing for the Representable derive macro.
//!
//! Field attributes: `#[represent(skip)]`, `#[represent(rename = "...")]`.
//! Container attribute: `#[represent(rename_all = "...")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, LitStr, Meta, Result, Token,
};

/// Case conversion applied to every field name of a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// `firstName`
    CamelCase,
    /// `FirstName`
    PascalCase,
    /// `first-name`
    KebabCase,
    /// `FIRST_NAME`
    ScreamingSnakeCase,
}

impl RenameRule {
    pub fn from_str(s: &str, span: Span) -> Result<Self> {
        match s {
            "camelCase" => Ok(RenameRule::CamelCase),
            "PascalCase" => Ok(RenameRule::PascalCase),
            "kebab-case" => Ok(RenameRule::KebabCase),
            "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnakeCase),
            other => Err(Error::new(
                span,
                format!(
                    "unknown rename rule: '{}'. Expected one of: camelCase, PascalCase, kebab-case, SCREAMING_SNAKE_CASE",
                    other
                ),
            )),
        }
    }

    /// Applies the rule to a snake_case Rust field name.
    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::CamelCase | RenameRule::PascalCase => {
                let mut out = String::with_capacity(field.len());
                let mut upper_next = self == RenameRule::PascalCase;
                for c in field.chars() {
                    if c == '_' {
                        upper_next = !out.is_empty();
                    } else if upper_next {
                        out.extend(c.to_uppercase());
                        upper_next = false;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
            RenameRule::KebabCase => field.replace('_', "-"),
            RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
        }
    }
}

/// Field-level attributes from `#[represent(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// Hide this field from templates.
    pub skip: bool,
    /// Custom field name (default: the Rust field name, after `rename_all`).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => {
                    attr.skip = true;
                    attr.span = p.span();
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_value(&nv.value, "rename")?.value());
                    attr.span = nv.span();
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown represent attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Container-level attributes from `#[represent(...)]` on the struct.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    pub rename_all: Option<RenameRule>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                    let rule = string_value(&nv.value, "rename_all")?;
                    attr.rename_all = Some(RenameRule::from_str(&rule.value(), rule.span())?);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown represent attribute. Expected: rename_all = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_value<'a>(expr: &'a syn::Expr, name: &str) -> Result<&'a LitStr> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", name),
        )),
    }
}

/// Extract `#[represent(...)]` from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("represent") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Extract `#[represent(...)]` from the struct's attributes.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("represent") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
