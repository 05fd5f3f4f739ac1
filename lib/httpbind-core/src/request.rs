//! Incoming request view.
//!
//! [`Request`] is the boundary with the transport layer: binding stages only
//! read its method, headers, query string and, once, its body. Build it from
//! an [`http::Request`] or with [`Request::builder`].
//!
//! # Example
//!
//! ```
//! use httpbind_core::Request;
//! use http::Method;
//!
//! let request = Request::builder(Method::GET, "https://api.example.com/people?q=a&q=b")
//!     .header("Accept", "application/json")
//!     .build()
//!     .expect("valid request");
//!
//! assert_eq!(request.query_values("q"), ["a", "b"]);
//! ```

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use http::{HeaderMap, HeaderName, Method, Uri};
use mime::Mime;

/// An incoming HTTP request whose body can be taken once.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    body: Option<Bytes>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, uri: &str) -> RequestBuilder {
        RequestBuilder::new(method, uri)
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Request extensions, where routers usually store matched parameters.
    #[must_use]
    pub fn extensions(&self) -> &http::Extensions {
        &self.parts.extensions
    }

    /// Mutable access to extensions.
    #[must_use]
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.parts.extensions
    }

    /// Single header value by name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// All values of a header, in arrival order.
    #[must_use]
    pub fn header_values(&self, name: &HeaderName) -> Vec<String> {
        self.parts
            .headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect()
    }

    /// Raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Decoded query pairs, in order, repeated keys included.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// All values of a query key.
    #[must_use]
    pub fn query_values(&self, key: &str) -> Vec<String> {
        let query = self.query().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
            .collect()
    }

    /// Media type of the `Content-Type` header, parameters stripped.
    ///
    /// Returns `None` when the header is absent or cannot be parsed.
    #[must_use]
    pub fn media_type(&self) -> Option<Mime> {
        let content_type = self.parts.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let mime = content_type.parse::<Mime>().ok()?;
        mime.essence_str().parse().ok()
    }

    /// Returns `true` for retrieval-style methods, whose body is never decoded.
    #[must_use]
    pub fn is_retrieval(&self) -> bool {
        matches!(self.parts.method, Method::GET | Method::HEAD)
    }

    /// Request body, unless already taken.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Takes the body out of the request.
    ///
    /// Later calls return `None`; dropping the returned value releases it.
    pub fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }
}

impl<B: Into<Bytes>> From<http::Request<B>> for Request {
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: Some(body.into()),
        }
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug)]
pub struct RequestBuilder {
    inner: http::request::Builder,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        Self {
            inner: http::Request::builder().method(method).uri(uri),
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.inner = self.inner.header(name, value);
        self
    }

    /// Builds the [`Request`] with a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the method, URI or a header is invalid.
    pub fn body(self, body: impl Into<Bytes>) -> crate::Result<Request> {
        let request = self.inner.body(body.into())?;
        Ok(request.into())
    }

    /// Builds the [`Request`] without a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the method, URI or a header is invalid.
    pub fn build(self) -> crate::Result<Request> {
        let (parts, ()) = self.inner.body(())?.into_parts();
        Ok(Request { parts, body: None })
    }
}
