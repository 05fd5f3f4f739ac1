//! Configured binder.

use std::fmt;
use std::sync::Arc;

use httpbind_core::{
    Bind, BodyDecoder, BoxError, Error, JsonBodyDecoder, ParamSource, Request, Result, bind_param,
};

use crate::pipeline::{self, Pipeline, Stage};

type Validator<T> = dyn Fn(&T) -> std::result::Result<(), BoxError> + Send + Sync;

/// Binds requests into destinations of type `T` with a fixed set of options.
///
/// Stages run in this order: body decoders, headers, query, route parameters
/// (when a source is configured), then validation (when a validator is
/// configured). Build it once and share it; it is immutable.
///
/// # Example
///
/// ```ignore
/// use httpbind::prelude::*;
///
/// let binder = Binder::<CreatePerson>::builder()
///     .param_source(|request: &Request, name: &str| router_param(request, name))
///     .validator(|dest: &CreatePerson| {
///         if dest.person.age < 150 { Ok(()) } else { Err("age out of range") }
///     })
///     .build();
///
/// let mut dest = CreatePerson::default();
/// binder.bind(&mut request, &mut dest)?;
/// ```
pub struct Binder<T> {
    pipeline: Pipeline<T>,
}

impl<T: Bind + 'static> Binder<T> {
    /// Create a new binder builder.
    #[must_use]
    pub fn builder() -> BinderBuilder<T> {
        BinderBuilder::default()
    }
}

impl<T> Binder<T> {
    /// Bind `request` into `destination`.
    ///
    /// On error, fields written by earlier stages keep their new values.
    ///
    /// # Errors
    ///
    /// Returns the first stage error, or [`Error::Validation`] if the
    /// validator rejects the destination.
    pub fn bind(&self, request: &mut Request, destination: &mut T) -> Result<()> {
        self.pipeline.run(request, destination)
    }

    /// The stages this binder runs.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline<T> {
        &self.pipeline
    }
}

impl<T: Bind + 'static> Default for Binder<T> {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<T> Clone for Binder<T> {
    fn clone(&self) -> Self {
        Self {
            pipeline: self.pipeline.clone(),
        }
    }
}

impl<T> fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

impl<T> Stage<T> for Binder<T> {
    fn run(&self, request: &mut Request, destination: &mut T) -> Result<()> {
        self.bind(request, destination)
    }
}

/// Builder for [`Binder`].
pub struct BinderBuilder<T> {
    param_source: Option<Arc<dyn ParamSource>>,
    validator: Option<Arc<Validator<T>>>,
    decoders: Option<Vec<Arc<dyn BodyDecoder<T>>>>,
}

impl<T> Default for BinderBuilder<T> {
    fn default() -> Self {
        Self {
            param_source: None,
            validator: None,
            decoders: None,
        }
    }
}

impl<T> fmt::Debug for BinderBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderBuilder")
            .field("param_source", &self.param_source.is_some())
            .field("validator", &self.validator.is_some())
            .field("decoders", &self.decoders.as_ref().map(Vec::len))
            .finish()
    }
}

impl<T: Bind + 'static> BinderBuilder<T> {
    /// Set the route-parameter source used for `#[param(...)]` fields.
    ///
    /// Without it, route parameters are not bound.
    #[must_use]
    pub fn param_source(mut self, source: impl ParamSource + 'static) -> Self {
        self.param_source = Some(Arc::new(source));
        self
    }

    /// Set the validator run after every other stage succeeded.
    #[must_use]
    pub fn validator<F, E>(mut self, validator: F) -> Self
    where
        F: Fn(&T) -> std::result::Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.validator = Some(Arc::new(
            move |destination: &T| -> std::result::Result<(), BoxError> {
                validator(destination).map_err(Into::into)
            },
        ));
        self
    }

    /// Append a body decoder.
    ///
    /// The first call replaces the default JSON decoder; decoders are tried
    /// in the order they were added.
    #[must_use]
    pub fn decoder(mut self, decoder: impl BodyDecoder<T> + 'static) -> Self {
        self.decoders
            .get_or_insert_with(Vec::new)
            .push(Arc::new(decoder));
        self
    }

    /// Build the binder.
    #[must_use]
    pub fn build(self) -> Binder<T> {
        let decoders = self
            .decoders
            .unwrap_or_else(|| vec![Arc::new(JsonBodyDecoder)]);

        let mut pipeline = Pipeline::new()
            .stage(pipeline::body(decoders))
            .stage(pipeline::header())
            .stage(pipeline::query());

        if let Some(source) = self.param_source {
            pipeline = pipeline.stage(move |request: &mut Request, destination: &mut T| {
                bind_param(request, destination, &*source)
            });
        }

        if let Some(validator) = self.validator {
            pipeline = pipeline.stage(move |_request: &mut Request, destination: &mut T| {
                validator(destination).map_err(Error::validation)
            });
        }

        Binder { pipeline }
    }
}
