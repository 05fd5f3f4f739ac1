//! Derive macros for httpbind declarative request binding.
//!
//! This crate provides:
//! - `#[derive(Bind)]` - Describe how a struct is populated from a request
//! - `#[derive(Coerce)]` - Make a text-decodable type usable as a bound field
//!
//! # Example
//!
//! ```ignore
//! use httpbind::prelude::*;
//!
//! #[derive(Bind, Default)]
//! struct GetPerson {
//!     #[param]
//!     person_id: i64,
//!     #[query("fields")]
//!     fields: Vec<String>,
//! }
//! ```

mod attrs;
mod bind_derive;
mod coerce_derive;

use proc_macro::TokenStream;

/// Derive the `Bind` trait for a struct.
///
/// # Struct Attributes
///
/// - `#[bind(rename_all = "camelCase")]` - Rename the keys of bare tags using a case convention
/// - `#[bind(body)]` - Replace the struct with the decoded body, keeping tagged and `#[serde(skip)]` fields
///
/// Supported case conventions:
/// - `lowercase`, `UPPERCASE`
/// - `camelCase`, `PascalCase`
/// - `snake_case`, `SCREAMING_SNAKE_CASE`
/// - `kebab-case`, `SCREAMING-KEBAB-CASE`
///
/// # Field Attributes
///
/// - `#[header("name")]` - Header value (case-insensitive)
/// - `#[query]` / `#[query("key")]` - Query parameter
/// - `#[param]` / `#[param("name")]` - Route parameter
/// - `#[form]` / `#[form("key")]` - URL-encoded form body field
/// - `#[body]` - Receives the decoded body (at most one field)
///
/// Without a key, a tag uses the field name after `rename_all`. Untagged fields
/// are never touched by field extractors.
///
/// # Example
///
/// ```ignore
/// use httpbind::Bind;
///
/// #[derive(Bind, Default)]
/// #[bind(rename_all = "camelCase")]
/// struct UpdatePerson {
///     #[param]
///     person_id: i64,         // route parameter "personId"
///     #[header("if-match")]
///     etag: Option<String>,
///     #[body]
///     person: Person,         // decoded from the JSON body
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind, header, query, param, form, body))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    bind_derive::expand_bind_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive the `Coerce` and `Element` traits for a text-decodable type.
///
/// Decodes through the type's `FromText` implementation, or through `FromStr`
/// with `#[coerce(from_str)]`.
///
/// # Example
///
/// ```ignore
/// use httpbind::{Coerce, FromText};
///
/// #[derive(Coerce)]
/// struct HexInt64(i64);
///
/// impl FromText for HexInt64 {
///     type Error = std::num::ParseIntError;
///
///     fn from_text(text: &str) -> Result<Self, Self::Error> {
///         i64::from_str_radix(text, 16).map(HexInt64)
///     }
/// }
/// ```
#[proc_macro_derive(Coerce, attributes(coerce))]
pub fn derive_coerce(input: TokenStream) -> TokenStream {
    coerce_derive::expand_coerce_derive(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
