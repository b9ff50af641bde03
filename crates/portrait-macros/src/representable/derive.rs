//! Implementation of the `#[derive(Representable)]` macro.
//!
//! This macro generates an implementation of the `Representable` trait and
//! field name constants for building templates without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_field_attrs, RenameRule};

/// Main implementation of the Representable derive macro.
pub fn representable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let container = parse_container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Ok(expand(&input, Vec::new(), Vec::new(), Vec::new()));
            }
            Fields::Unnamed(_) => {
                return Err(Error::new(
                    input.span(),
                    "Representable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Representable can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut field_names: Vec<String> = Vec::new();

    for field in fields.iter() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip {
            if attrs.rename.is_some() {
                return Err(Error::new(
                    attrs.span,
                    "skip and rename cannot be combined on one field",
                ));
            }
            continue;
        }

        let rust_name = ident.to_string();
        let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        let exposed = match (&attrs.rename, container.rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => rule.apply(rust_name),
            (None, None) => rust_name.to_string(),
        };

        if field_names.contains(&exposed) {
            return Err(Error::new(
                field.span(),
                format!("duplicate field name '{}'", exposed),
            ));
        }

        let const_name = format_ident!("{}", RenameRule::ScreamingSnakeCase.apply(rust_name));
        field_constants.push(quote! {
            /// Field name constant for template definitions.
            pub const #const_name: &'static str = #exposed;
        });

        field_matches.push(quote! {
            #exposed => ::portrait::ToValue::to_value(&self.#ident),
        });

        field_names.push(exposed);
    }

    Ok(expand(&input, field_constants, field_matches, field_names))
}

fn expand(
    input: &DeriveInput,
    field_constants: Vec<TokenStream>,
    field_matches: Vec<TokenStream>,
    field_names: Vec<String>,
) -> TokenStream {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::portrait::Representable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, name: &str) -> ::portrait::Value {
                match name {
                    #(#field_matches)*
                    _ => ::portrait::Value::Absent,
                }
            }

            fn field_names(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::String::from(#field_names)),*]
            }
        }
    }
}
