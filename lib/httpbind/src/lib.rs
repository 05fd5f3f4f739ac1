//! Declarative HTTP request binding for Rust.
//!
//! Describe a destination struct once with field tags, then populate it from
//! headers, query parameters, route parameters and the request body. Raw
//! values are coerced into each field's type; bodies go through pluggable
//! decoders.
//!
//! # Example
//!
//! ```ignore
//! use httpbind::prelude::*;
//!
//! #[derive(Debug, Deserialize, Default)]
//! pub struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! #[derive(Debug, Default, Bind)]
//! pub struct UpdatePerson {
//!     #[param]
//!     person_id: i64,
//!     #[query("dry_run")]
//!     dry_run: bool,
//!     #[header("if-match")]
//!     etag: Option<String>,
//!     #[body]
//!     person: Person,
//! }
//!
//! let binder = Binder::<UpdatePerson>::builder()
//!     .param_source(|request: &Request, name: &str| router_param(request, name))
//!     .build();
//!
//! let mut dest = UpdatePerson::default();
//! binder.bind(&mut request, &mut dest)?;
//! ```

extern crate self as httpbind;

mod binder;
pub mod pipeline;
pub mod prelude;

pub use binder::{Binder, BinderBuilder};
pub use pipeline::{Pipeline, Stage, default_binding};

// Re-export core types
pub use httpbind_core::{
    Bind, BodyDecoder, BoxError, Coerce, Element, Error, FieldMeta, FormBodyDecoder, FromText,
    HeaderName, JsonBodyDecoder, Location, Method, Mime, ParamSource, Request, RequestBuilder,
    Result, ScalarKind, Shape, bind_field, bind_form, bind_header, bind_param, bind_query,
    coerce_into, decode_body, first_value, from_str, from_text, header, mime,
};

// Re-export crates for macro-generated code
pub use serde;

// Re-export macros
pub use httpbind_macro::{Bind, Coerce};
