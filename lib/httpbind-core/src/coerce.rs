//! Type-directed coercion of raw string values.
//!
//! Every bindable field type implements [`Coerce`], which turns the raw value
//! set of one key (all query values of a repeated key, a single header value,
//! a route parameter) into a value of that type. Each type reports a static
//! [`Shape`] and has exactly one coercion rule:
//!
//! | shape | types | empty / absent input |
//! |-------|-------|----------------------|
//! | text | `#[derive(Coerce)]` types backed by [`FromText`] | untouched |
//! | bytes | `Vec<u8>`, [`Bytes`] (standard base64) | untouched when absent |
//! | scalar | `String`, integers, `bool`, floats, `char` | untouched |
//! | optional | `Option<T>` | untouched (stays `None`) |
//! | sequence | `Vec<T>` of [`Element`]s | `vec![]` |
//! | unsupported | `()`, maps | always an error |
//!
//! `u8` is a scalar but not an [`Element`], so `Vec<u8>` always takes the
//! byte-blob rule instead of the one-element-per-value sequence rule.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::error::BoxError;
use crate::{Error, Location, Result};

/// Scalar kinds accepted by the coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Assigned verbatim.
    String,
    /// Base-10 signed integer.
    Signed,
    /// Base-10 unsigned integer.
    Unsigned,
    /// `1 t T TRUE true True` / `0 f F FALSE false False`.
    Bool,
    /// Decimal floating point.
    Float,
    /// Exactly one character.
    Char,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Signed => "signed integer",
            Self::Unsigned => "unsigned integer",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::Char => "char",
        })
    }
}

/// Static description of what a field type accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Custom text-decodable type.
    Text,
    /// Raw bytes, base64 encoded on the wire.
    Bytes,
    /// Scalar value.
    Scalar(ScalarKind),
    /// `Option<T>`.
    Optional(Box<Shape>),
    /// `Vec<T>`, one element per raw value.
    Sequence(Box<Shape>),
    /// A type the coercer refuses, with its kind name.
    Unsupported(&'static str),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Bytes => f.write_str("bytes"),
            Self::Scalar(kind) => kind.fmt(f),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Sequence(inner) => write!(f, "sequence of {inner}"),
            Self::Unsupported(kind) => write!(f, "`{kind}`"),
        }
    }
}

/// Conversion from a raw value set into a field type.
pub trait Coerce: Sized {
    /// The shape of this type.
    fn shape() -> Shape;

    /// Build a value from the raw values of one key.
    ///
    /// Returns `Ok(None)` when the values carry nothing to bind, in which case
    /// the destination must be left untouched.
    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>>;
}

/// Marker for types that may appear as `Vec<T>` elements.
///
/// Every [`Coerce`] type except `u8` is an element; `#[derive(Coerce)]`
/// implements it too.
pub trait Element: Coerce {}

/// Custom decoding from text, the counterpart of [`std::fmt::Display`].
///
/// # Example
///
/// ```
/// use httpbind_core::FromText;
///
/// struct HexInt(i64);
///
/// impl FromText for HexInt {
///     type Error = std::num::ParseIntError;
///
///     fn from_text(text: &str) -> Result<Self, Self::Error> {
///         i64::from_str_radix(text, 16).map(HexInt)
///     }
/// }
///
/// assert_eq!(HexInt::from_text("ff").map(|h| h.0), Ok(255));
/// ```
pub trait FromText: Sized {
    /// Error returned when the text is rejected.
    type Error: Into<BoxError>;

    /// Decode a value from its text form.
    fn from_text(text: &str) -> std::result::Result<Self, Self::Error>;
}

/// Coerce `values` into `slot`, leaving it untouched when there is nothing to bind.
///
/// On error the slot is left untouched as well.
///
/// # Example
///
/// ```
/// use httpbind_core::coerce_into;
///
/// let mut page: Option<u32> = None;
/// coerce_into(&mut page, &["3"]).expect("valid number");
/// assert_eq!(page, Some(3));
///
/// let mut tags: Vec<String> = vec!["old".to_string()];
/// coerce_into(&mut tags, &[] as &[&str]).expect("no values");
/// assert!(tags.is_empty());
/// ```
pub fn coerce_into<T: Coerce, S: AsRef<str>>(slot: &mut T, values: &[S]) -> Result<()> {
    if let Some(value) = T::coerce(values)? {
        *slot = value;
    }
    Ok(())
}

/// Coerce one tagged field, as generated by `#[derive(Bind)]`.
pub fn bind_field<T: Coerce>(
    slot: &mut T,
    location: Location,
    key: &str,
    values: &[String],
) -> Result<()> {
    tracing::trace!(%location, key, count = values.len(), "binding field");
    coerce_into(slot, values)
}

/// The first raw value, unless it is absent or empty.
#[must_use]
pub fn first_value<S: AsRef<str>>(values: &[S]) -> Option<&str> {
    values
        .first()
        .map(<S as AsRef<str>>::as_ref)
        .filter(|value| !value.is_empty())
}

/// Coercion rule for [`FromText`] types, used by `#[derive(Coerce)]`.
pub fn from_text<T: FromText, S: AsRef<str>>(values: &[S]) -> Result<Option<T>> {
    let Some(text) = first_value(values) else {
        return Ok(None);
    };
    T::from_text(text)
        .map(Some)
        .map_err(|err| Error::text(text, err))
}

/// Coercion rule for [`FromStr`] types, used by `#[derive(Coerce)]` with `#[coerce(from_str)]`.
pub fn from_str<T, S>(values: &[S]) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Into<BoxError>,
    S: AsRef<str>,
{
    let Some(text) = first_value(values) else {
        return Ok(None);
    };
    text.parse().map(Some).map_err(|err| Error::text(text, err))
}

/// Error for a shape the coercer refuses.
fn unsupported<T: Coerce>() -> Error {
    Error::invalid_shape(format!("cannot bind raw values into {}", T::shape()))
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! impl_parsed_scalar {
    ($kind:ident => $($ty:ty),+ $(,)?) => {$(
        impl Coerce for $ty {
            fn shape() -> Shape {
                Shape::Scalar(ScalarKind::$kind)
            }

            fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
                first_value(values)
                    .map(|raw| raw.parse::<$ty>().map_err(|err| Error::parse(raw, err)))
                    .transpose()
            }
        }
    )+};
}

impl_parsed_scalar!(Signed => i8, i16, i32, i64, isize);
impl_parsed_scalar!(Unsigned => u8, u16, u32, u64, usize);
impl_parsed_scalar!(Float => f32, f64);
impl_parsed_scalar!(Char => char);

impl Coerce for String {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::String)
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        Ok(first_value(values).map(str::to_owned))
    }
}

impl Coerce for bool {
    fn shape() -> Shape {
        Shape::Scalar(ScalarKind::Bool)
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        first_value(values).map(parse_bool).transpose()
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(Error::parse(raw, "expected a boolean")),
    }
}

macro_rules! impl_element {
    ($($ty:ty),+ $(,)?) => {$(
        impl Element for $ty {}
    )+};
}

// `u8` is deliberately missing: `Vec<u8>` is a byte blob.
impl_element!(i8, i16, i32, i64, isize, u16, u32, u64, usize, f32, f64, char, bool, String);

// ============================================================================
// Bytes
// ============================================================================

impl Coerce for Vec<u8> {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        let Some(raw) = values.first() else {
            return Ok(None);
        };
        let raw: &str = raw.as_ref();
        Ok(Some(STANDARD.decode(raw)?))
    }
}

impl Element for Vec<u8> {}

impl Coerce for Bytes {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        Ok(<Vec<u8>>::coerce(values)?.map(Self::from))
    }
}

impl Element for Bytes {}

// ============================================================================
// Optional and sequence
// ============================================================================

impl<T: Coerce> Coerce for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        if first_value(values).is_none() {
            return Ok(None);
        }
        Ok(T::coerce(values)?.map(Some))
    }
}

impl<T: Coerce> Element for Option<T> {}

impl<T: Element + Default> Coerce for Vec<T> {
    fn shape() -> Shape {
        Shape::Sequence(Box::new(T::shape()))
    }

    fn coerce<S: AsRef<str>>(values: &[S]) -> Result<Option<Self>> {
        values
            .iter()
            .map(|raw| T::coerce(std::slice::from_ref(raw)).map(Option::unwrap_or_default))
            .collect::<Result<Self>>()
            .map(Some)
    }
}

impl<T: Element + Default> Element for Vec<T> {}

// ============================================================================
// Unsupported
// ============================================================================

impl Coerce for () {
    fn shape() -> Shape {
        Shape::Unsupported("struct")
    }

    fn coerce<S: AsRef<str>>(_values: &[S]) -> Result<Option<Self>> {
        Err(unsupported::<Self>())
    }
}

impl<K, V, H> Coerce for HashMap<K, V, H> {
    fn shape() -> Shape {
        Shape::Unsupported("map")
    }

    fn coerce<S: AsRef<str>>(_values: &[S]) -> Result<Option<Self>> {
        Err(unsupported::<Self>())
    }
}

impl<K, V> Coerce for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Unsupported("map")
    }

    fn coerce<S: AsRef<str>>(_values: &[S]) -> Result<Option<Self>> {
        Err(unsupported::<Self>())
    }
}
