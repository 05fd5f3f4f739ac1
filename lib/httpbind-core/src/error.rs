//! Error types for httpbind.

use derive_more::{Display, Error, From};

/// Boxed error returned by validators and custom text decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Type
// ============================================================================

/// Main error type for binding operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// The destination (or one of its fields) has a shape the coercer cannot fill.
    #[display("invalid destination shape: {_0}")]
    #[from(skip)]
    InvalidShape(#[error(not(source))] String),

    /// A raw value could not be parsed as the target scalar.
    #[display("invalid value {value:?}: {message}")]
    #[from(skip)]
    Parse {
        /// The offending raw value.
        value: String,
        /// Parser message.
        message: String,
    },

    /// A custom text decoder rejected the raw value.
    #[display("cannot decode {value:?}: {source}")]
    #[from(skip)]
    Text {
        /// The offending raw value.
        value: String,
        /// Error returned by the decoder, untouched.
        #[error(not(source))]
        source: BoxError,
    },

    /// A byte-blob field received invalid base64.
    #[display("invalid base64 value: {_0}")]
    #[from]
    Base64(base64::DecodeError),

    /// JSON body deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// The request could not be built.
    #[display("invalid request: {_0}")]
    #[from]
    InvalidRequest(http::Error),

    /// The request body could not be read.
    #[display("body read error: {_0}")]
    #[from]
    Io(std::io::Error),

    /// The post-bind validator rejected the destination.
    #[display("validation failed: {_0}")]
    #[from(skip)]
    Validation(#[error(not(source))] BoxError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid shape error.
    #[must_use]
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidShape(message.into())
    }

    /// Create a parse error for a raw value.
    #[must_use]
    pub fn parse(value: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            value: value.into(),
            message: message.to_string(),
        }
    }

    /// Create a custom text decoding error.
    #[must_use]
    pub fn text(value: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Text {
            value: value.into(),
            source: source.into(),
        }
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(source: impl Into<BoxError>) -> Self {
        Self::Validation(source.into())
    }

    /// Returns `true` if the destination shape is unsupported.
    #[must_use]
    pub const fn is_invalid_shape(&self) -> bool {
        matches!(self, Self::InvalidShape(_))
    }

    /// Returns `true` if a raw value or the body failed to decode.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Text { .. } | Self::Base64(_) | Self::JsonDeserialization { .. }
        )
    }

    /// Returns `true` if the validator rejected the destination.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The raw value that failed to parse, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Parse { value, .. } | Self::Text { value, .. } => Some(value),
            _ => None,
        }
    }
}
