//! Field extractors.
//!
//! Each extractor reads one request location and coerces every field of the
//! destination tagged for it.

use http::HeaderName;

use crate::{Bind, Location, Request, Result};

/// Route-parameter lookup supplied by the host router.
///
/// Returns `""` when the parameter is absent. Implemented for any
/// `Fn(&Request, &str) -> String`.
pub trait ParamSource: Send + Sync {
    /// Value of the route parameter `name`.
    fn param(&self, request: &Request, name: &str) -> String;
}

impl<F> ParamSource for F
where
    F: Fn(&Request, &str) -> String + Send + Sync,
{
    fn param(&self, request: &Request, name: &str) -> String {
        self(request, name)
    }
}

/// Bind fields tagged `#[header(...)]`.
///
/// Keys are matched case-insensitively and repeated headers yield every value.
/// A key that is not a valid header name is treated as absent.
///
/// # Errors
///
/// Returns the first coercion error.
pub fn bind_header<T: Bind>(request: &Request, destination: &mut T) -> Result<()> {
    destination.bind_location(Location::Header, &mut |key| {
        HeaderName::from_bytes(key.as_bytes())
            .map(|name| request.header_values(&name))
            .unwrap_or_default()
    })
}

/// Bind fields tagged `#[query(...)]`.
///
/// # Errors
///
/// Returns the first coercion error.
pub fn bind_query<T: Bind>(request: &Request, destination: &mut T) -> Result<()> {
    let pairs = request.query_pairs();
    bind_pairs(Location::Query, &pairs, destination)
}

/// Bind fields tagged `#[param(...)]` from a route-parameter source.
///
/// The source is called once per tagged field.
///
/// # Errors
///
/// Returns the first coercion error.
pub fn bind_param<T, P>(request: &Request, destination: &mut T, source: &P) -> Result<()>
where
    T: Bind,
    P: ParamSource + ?Sized,
{
    destination.bind_location(Location::Param, &mut |key| {
        vec![source.param(request, key)]
    })
}

/// Bind fields tagged `#[form(...)]` from a URL-encoded body still held by the request.
///
/// Does nothing once the body has been taken. Query string values are not merged in.
///
/// # Errors
///
/// Returns the first coercion error.
pub fn bind_form<T: Bind>(request: &Request, destination: &mut T) -> Result<()> {
    let Some(body) = request.body() else {
        return Ok(());
    };
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body).into_owned().collect();
    bind_pairs(Location::Form, &pairs, destination)
}

pub(crate) fn bind_pairs<T: Bind>(
    location: Location,
    pairs: &[(String, String)],
    destination: &mut T,
) -> Result<()> {
    destination.bind_location(location, &mut |key| {
        pairs
            .iter()
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .collect()
    })
}
