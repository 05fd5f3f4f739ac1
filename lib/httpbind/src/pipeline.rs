//! Binding pipelines.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s run against one request
//! and one destination. Stages run in order and the first error stops the
//! pipeline; fields written by earlier stages stay written.
//!
//! # Example
//!
//! ```ignore
//! use httpbind::prelude::*;
//! use httpbind::pipeline;
//!
//! let binding = Pipeline::new()
//!     .stage(pipeline::query())
//!     .stage(pipeline::param(|request: &Request, name: &str| router_param(request, name)))
//!     .stage(pipeline::validate(|dest: &GetPerson| {
//!         if dest.person_id > 0 { Ok(()) } else { Err("person_id must be positive") }
//!     }));
//!
//! let mut dest = GetPerson::default();
//! binding.run(&mut request, &mut dest)?;
//! ```

use std::fmt;
use std::sync::Arc;

use httpbind_core::{
    Bind, BodyDecoder, BoxError, Error, FormBodyDecoder, JsonBodyDecoder, ParamSource, Request,
    Result, bind_header, bind_param, bind_query, decode_body,
};

/// One step of a binding pipeline.
///
/// Implemented for any `Fn(&mut Request, &mut T) -> Result<()>` and for
/// [`Pipeline`] itself, so pipelines nest.
pub trait Stage<T>: Send + Sync {
    /// Run this stage.
    ///
    /// # Errors
    ///
    /// Returns the first error met; the destination keeps what was written.
    fn run(&self, request: &mut Request, destination: &mut T) -> Result<()>;
}

impl<T, F> Stage<T> for F
where
    F: Fn(&mut Request, &mut T) -> Result<()> + Send + Sync,
{
    fn run(&self, request: &mut Request, destination: &mut T) -> Result<()> {
        self(request, destination)
    }
}

/// An ordered list of stages.
pub struct Pipeline<T> {
    stages: Vec<Arc<dyn Stage<T>>>,
}

impl<T> Pipeline<T> {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage.
    #[must_use]
    pub fn stage(mut self, stage: impl Stage<T> + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append every stage of another pipeline.
    #[must_use]
    pub fn then(mut self, other: Self) -> Self {
        self.stages.extend(other.stages);
        self
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first stage error unchanged.
    pub fn run(&self, request: &mut Request, destination: &mut T) -> Result<()> {
        for (index, stage) in self.stages.iter().enumerate() {
            if let Err(err) = stage.run(request, destination) {
                tracing::debug!(stage = index, error = %err, "binding stage failed");
                return Err(err);
            }
        }
        Ok(())
    }
}

impl<T> Stage<T> for Pipeline<T> {
    fn run(&self, request: &mut Request, destination: &mut T) -> Result<()> {
        Pipeline::run(self, request, destination)
    }
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Header → query → JSON body.
#[must_use]
pub fn default_binding<T: Bind + 'static>() -> Pipeline<T> {
    Pipeline::new()
        .stage(header())
        .stage(query())
        .stage(json_body())
}

/// Stage binding `#[header(...)]` fields.
pub fn header<T: Bind>() -> impl Stage<T> {
    |request: &mut Request, destination: &mut T| bind_header(request, destination)
}

/// Stage binding `#[query(...)]` fields.
pub fn query<T: Bind>() -> impl Stage<T> {
    |request: &mut Request, destination: &mut T| bind_query(request, destination)
}

/// Stage binding `#[param(...)]` fields from a route-parameter source.
pub fn param<T: Bind>(source: impl ParamSource + 'static) -> impl Stage<T> {
    move |request: &mut Request, destination: &mut T| bind_param(request, destination, &source)
}

/// Stage decoding `application/json` bodies.
pub fn json_body<T: Bind + 'static>() -> impl Stage<T> {
    body(vec![Arc::new(JsonBodyDecoder)])
}

/// Stage decoding `application/x-www-form-urlencoded` bodies into `#[form(...)]` fields.
pub fn form_body<T: Bind + 'static>() -> impl Stage<T> {
    body(vec![Arc::new(FormBodyDecoder)])
}

/// Stage decoding the body with the first matching decoder.
pub fn body<T>(decoders: Vec<Arc<dyn BodyDecoder<T>>>) -> impl Stage<T> {
    move |request: &mut Request, destination: &mut T| {
        decode_body(request, destination, &decoders)
    }
}

/// Stage running a validator over the destination.
///
/// The validator's error is returned as [`Error::Validation`], unmodified.
pub fn validate<T, F, E>(validator: F) -> impl Stage<T>
where
    F: Fn(&T) -> std::result::Result<(), E> + Send + Sync,
    E: Into<BoxError>,
{
    move |_request: &mut Request, destination: &mut T| {
        validator(destination).map_err(Error::validation)
    }
}
