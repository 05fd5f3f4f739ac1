//! Coerce derive macro implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse2};

use crate::attrs::parse_coerce_options;

/// Expand the `#[derive(Coerce)]` macro.
pub fn expand_coerce_derive(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let options = parse_coerce_options(&input.attrs)?;

    let decode = if options.from_str {
        quote! { ::httpbind::from_str(values) }
    } else {
        quote! { ::httpbind::from_text(values) }
    };

    Ok(quote! {
        impl #impl_generics ::httpbind::Coerce for #name #ty_generics #where_clause {
            fn shape() -> ::httpbind::Shape {
                ::httpbind::Shape::Text
            }

            fn coerce<S: ::std::convert::AsRef<str>>(
                values: &[S],
            ) -> ::httpbind::Result<::std::option::Option<Self>> {
                #decode
            }
        }

        impl #impl_generics ::httpbind::Element for #name #ty_generics #where_clause {}
    })
}
