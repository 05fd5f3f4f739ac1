//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types, traits, and macros
//! for easy glob importing:
//!
//! ```ignore
//! use httpbind::prelude::*;
//! ```

pub use crate::{
    Bind, Binder, BinderBuilder, Coerce, Error, FromText, Method, Pipeline, Request,
    RequestBuilder, Result, Stage, default_binding,
};
pub use serde::Deserialize;
