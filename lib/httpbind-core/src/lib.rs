//! Core types and traits for httpbind declarative request binding.
//!
//! This crate provides the foundational types used by httpbind:
//! - [`Request`] and [`RequestBuilder`] - incoming request view
//! - [`Coerce`], [`Element`] and [`FromText`] - raw value coercion
//! - [`Bind`] - destination trait, implemented by `#[derive(Bind)]`
//! - [`FieldMeta`] and [`Location`] - per-field binding metadata
//! - [`bind_header`], [`bind_query`], [`bind_param`], [`bind_form`] - field extractors
//! - [`BodyDecoder`], [`JsonBodyDecoder`], [`FormBodyDecoder`] - body decoders
//! - [`Error`] and [`Result`] - Error handling

mod body;
mod coerce;
mod error;
mod extract;
mod field_meta;
pub mod prelude;
mod request;

pub use body::{BodyDecoder, FormBodyDecoder, JsonBodyDecoder, decode_body};
pub use coerce::{
    Coerce, Element, FromText, ScalarKind, Shape, bind_field, coerce_into, first_value, from_str,
    from_text,
};
pub use error::{BoxError, Error, Result};
pub use extract::{ParamSource, bind_form, bind_header, bind_param, bind_query};
pub use field_meta::{FieldMeta, Location};
pub use request::{Request, RequestBuilder};

// Re-export http crate types used in public signatures
pub use http::{HeaderName, Method, header};
pub use mime::{self, Mime};

/// A destination struct populated from request data.
///
/// This is automatically implemented by the `#[derive(Bind)]` macro.
///
/// # Example
///
/// ```ignore
/// use httpbind::Bind;
///
/// #[derive(Bind, Default)]
/// #[bind(rename_all = "camelCase")]
/// struct SearchRequest {
///     #[query]
///     page_size: Option<u32>,
///     #[query("q")]
///     terms: Vec<String>,
///     #[header("x-request-id")]
///     request_id: String,
///     #[param]
///     person_id: i64,
/// }
/// ```
pub trait Bind {
    /// Value the body decoders produce.
    ///
    /// `serde::de::IgnoredAny` when the destination declares no body target.
    type Body: serde::de::DeserializeOwned;

    /// Tagged fields, in declaration order.
    fn fields() -> &'static [FieldMeta];

    /// Coerce every field tagged for `location`, in declaration order.
    ///
    /// `lookup` returns the raw values for a tag key. Stops at the first error,
    /// leaving fields already written in place.
    ///
    /// # Errors
    ///
    /// Returns the first coercion error.
    fn bind_location(
        &mut self,
        location: Location,
        lookup: &mut dyn FnMut(&str) -> Vec<String>,
    ) -> Result<()>;

    /// Store a decoded body.
    fn set_body(&mut self, body: Self::Body);
}
