//! Bind derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Fields, Type, parse2};

use crate::attrs::{TagLocation, parse_field_attrs, parse_struct_options};

/// One tagged field, ready for code generation.
struct TaggedField<'a> {
    ident: &'a syn::Ident,
    ty: &'a Type,
    location: TagLocation,
    key: String,
}

/// Expand the `#[derive(Bind)]` macro.
pub fn expand_bind_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let struct_options = parse_struct_options(&input.attrs)?;

    // Only support structs with named fields
    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Bind derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Bind derive only supports structs",
            ));
        }
    };

    let mut tagged = Vec::new();
    let mut body_field: Option<(&syn::Ident, &Type)> = None;
    // Fields a whole-struct body does not own
    let mut kept = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_attrs(&field.attrs)?;

        if options.body {
            if struct_options.body {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "`#[body]` cannot be combined with `#[bind(body)]`",
                ));
            }
            if body_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field_name,
                    "only one field can be marked `#[body]`",
                ));
            }
            body_field = Some((field_name, &field.ty));
        }

        if !options.tags.is_empty() || options.serde_skipped {
            kept.push(field_name);
        }

        for tag in options.tags {
            // Explicit key > rename_all > field name
            let key = match (tag.key, struct_options.rename_all) {
                (Some(key), _) => key,
                (None, Some(rule)) => rule.apply(&field_name.to_string()),
                (None, None) => field_name.to_string(),
            };
            tagged.push(TaggedField {
                ident: field_name,
                ty: &field.ty,
                location: tag.location,
                key,
            });
        }
    }

    let field_metas = tagged.iter().map(generate_field_meta);
    let location_arms = TagLocation::ALL.into_iter().map(|location| {
        let path = location.to_tokens();
        let statements = tagged
            .iter()
            .filter(|field| field.location == location)
            .map(generate_bind_statement);
        quote! {
            #path => {
                #(#statements)*
            }
        }
    });

    let (body_ty, set_body) = match body_field {
        Some((field_name, field_ty)) => (
            quote! { #field_ty },
            quote! {
                fn set_body(&mut self, body: Self::Body) {
                    self.#field_name = body;
                }
            },
        ),
        None if struct_options.body => (
            quote! { Self },
            generate_whole_body_setter(&kept),
        ),
        None => (
            quote! { ::httpbind::serde::de::IgnoredAny },
            quote! {
                fn set_body(&mut self, _body: Self::Body) {}
            },
        ),
    };

    Ok(quote! {
        impl #impl_generics ::httpbind::Bind for #name #ty_generics #where_clause {
            type Body = #body_ty;

            fn fields() -> &'static [::httpbind::FieldMeta] {
                const FIELDS: &[::httpbind::FieldMeta] = &[
                    #(#field_metas),*
                ];
                FIELDS
            }

            #[allow(unused_variables)]
            fn bind_location(
                &mut self,
                location: ::httpbind::Location,
                lookup: &mut dyn ::std::ops::FnMut(&str) -> ::std::vec::Vec<::std::string::String>,
            ) -> ::httpbind::Result<()> {
                match location {
                    #(#location_arms)*
                }
                ::std::result::Result::Ok(())
            }

            #set_body
        }
    })
}

/// Generate `set_body` for `#[bind(body)]`.
///
/// Tagged and `#[serde(skip)]` fields keep their current value.
fn generate_whole_body_setter(kept: &[&syn::Ident]) -> TokenStream {
    if kept.is_empty() {
        return quote! {
            fn set_body(&mut self, body: Self::Body) {
                *self = body;
            }
        };
    }
    quote! {
        fn set_body(&mut self, body: Self::Body) {
            let previous = ::std::mem::replace(self, body);
            #(self.#kept = previous.#kept;)*
        }
    }
}

/// Generate the `FieldMeta` entry of a tagged field.
fn generate_field_meta(field: &TaggedField<'_>) -> TokenStream {
    let name = field.ident.to_string();
    let location = field.location.to_tokens();
    let key = &field.key;
    let type_name = type_to_string(field.ty);
    quote! {
        ::httpbind::FieldMeta {
            name: #name,
            location: #location,
            key: #key,
            type_name: #type_name,
        }
    }
}

/// Generate the coercion call of a tagged field.
fn generate_bind_statement(field: &TaggedField<'_>) -> TokenStream {
    let ident = field.ident;
    let key = &field.key;
    quote! {
        ::httpbind::bind_field(&mut self.#ident, location, #key, &lookup(#key))?;
    }
}

/// Convert a `syn::Type` to a string representation.
fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string().replace(' ', "")
}
