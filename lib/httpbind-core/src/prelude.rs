//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use httpbind_core::prelude::*;
//! ```

pub use crate::{
    Bind, BodyDecoder, Coerce, Error, FromText, JsonBodyDecoder, Method, Request, RequestBuilder,
    Result, coerce_into,
};
