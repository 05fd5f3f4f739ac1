//! Body decoding.
//!
//! A body stage holds an ordered list of [`BodyDecoder`]s. The first decoder
//! whose media-type predicate accepts the request's `Content-Type` decodes
//! the body; its result is final.

use std::io::Read;
use std::sync::Arc;

use bytes::Buf;
use mime::Mime;

use crate::extract::bind_pairs;
use crate::{Bind, Error, Location, Request, Result};

/// A body decoder for destinations of type `T`.
pub trait BodyDecoder<T>: Send + Sync {
    /// Returns `true` if this decoder handles `media_type` (parameters already stripped).
    fn matches(&self, media_type: &Mime) -> bool;

    /// Decode the body into the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be read or decoded.
    fn decode(&self, body: &mut dyn Read, destination: &mut T) -> Result<()>;
}

/// Decodes `application/json` bodies into [`Bind::Body`].
///
/// Errors carry the JSON path of the offending value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBodyDecoder;

impl<T: Bind> BodyDecoder<T> for JsonBodyDecoder {
    fn matches(&self, media_type: &Mime) -> bool {
        media_type
            .essence_str()
            .eq_ignore_ascii_case(mime::APPLICATION_JSON.essence_str())
    }

    fn decode(&self, body: &mut dyn Read, destination: &mut T) -> Result<()> {
        let value = from_json_reader::<T::Body>(body)?;
        destination.set_body(value);
        Ok(())
    }
}

/// Decodes `application/x-www-form-urlencoded` bodies into `#[form(...)]` fields.
///
/// Only the body pairs are bound. Query string values reach a field through
/// a `#[query(...)]` tag, never through `#[form(...)]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBodyDecoder;

impl<T: Bind> BodyDecoder<T> for FormBodyDecoder {
    fn matches(&self, media_type: &Mime) -> bool {
        media_type
            .essence_str()
            .eq_ignore_ascii_case(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
    }

    fn decode(&self, body: &mut dyn Read, destination: &mut T) -> Result<()> {
        let mut raw = Vec::new();
        body.read_to_end(&mut raw)?;
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&raw).into_owned().collect();
        bind_pairs(Location::Form, &pairs, destination)
    }
}

/// Decode the request body with the first matching decoder.
///
/// `GET` and `HEAD` requests are skipped without touching the body. Otherwise
/// the body is taken from the request and released once the attempt is over,
/// whether a decoder matched or not. A missing or unparseable `Content-Type`
/// matches no decoder.
///
/// # Errors
///
/// Returns the selected decoder's error.
pub fn decode_body<T>(
    request: &mut Request,
    destination: &mut T,
    decoders: &[Arc<dyn BodyDecoder<T>>],
) -> Result<()> {
    if request.is_retrieval() {
        tracing::debug!(method = %request.method(), "skipping body for retrieval request");
        return Ok(());
    }

    let body = request.take_body().unwrap_or_default();
    let Some(media_type) = request.media_type() else {
        tracing::debug!(len = body.len(), "no usable content type, body released");
        return Ok(());
    };
    let Some(decoder) = decoders.iter().find(|decoder| decoder.matches(&media_type)) else {
        tracing::debug!(%media_type, len = body.len(), "no body decoder matched");
        return Ok(());
    };

    tracing::debug!(%media_type, len = body.len(), "decoding body");
    decoder.decode(&mut body.reader(), destination)
}

/// Deserialize JSON from a reader with path-aware error messages.
///
/// Trailing data after the first value is not inspected.
fn from_json_reader<T: serde::de::DeserializeOwned>(reader: &mut dyn Read) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        Error::json_deserialization(err.path().to_string(), err.inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;
    use crate::FieldMeta;
    use crate::extract::tests::Lookup;

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Person {
        name: String,
        age: u32,
    }

    #[derive(Debug, Default, PartialEq)]
    struct WithBody {
        person: Person,
    }

    impl Bind for WithBody {
        type Body = Person;

        fn fields() -> &'static [FieldMeta] {
            &[]
        }

        fn bind_location(
            &mut self,
            _location: Location,
            _lookup: &mut dyn FnMut(&str) -> Vec<String>,
        ) -> Result<()> {
            Ok(())
        }

        fn set_body(&mut self, body: Self::Body) {
            self.person = body;
        }
    }

    /// Claims XML bodies and fails if ever asked to decode.
    struct XmlDecoder;

    impl<T> BodyDecoder<T> for XmlDecoder {
        fn matches(&self, media_type: &Mime) -> bool {
            media_type.essence_str() == "application/xml"
        }

        fn decode(&self, _body: &mut dyn Read, _destination: &mut T) -> Result<()> {
            Err(Error::invalid_shape("xml is not supported"))
        }
    }

    fn json_only<T: Bind>() -> Vec<Arc<dyn BodyDecoder<T>>> {
        vec![Arc::new(JsonBodyDecoder)]
    }

    fn post(content_type: &str, body: &str) -> Request {
        Request::builder(Method::POST, "/")
            .header("Content-Type", content_type)
            .body(body.to_string())
            .expect("request")
    }

    #[test]
    fn json_body_with_charset_is_decoded() {
        let mut request = post(
            "application/json; charset=utf-8",
            r#"{"name":"Jane","age":42}"#,
        );

        let mut dest = WithBody::default();
        decode_body(&mut request, &mut dest, &json_only()).expect("decode");
        assert_eq!(
            dest.person,
            Person {
                name: "Jane".to_string(),
                age: 42
            }
        );
        assert!(request.body().is_none());
    }

    #[test]
    fn malformed_json_fails_with_path() {
        let mut request = post("application/json", r#"{"name":"Jane","age":"old"}"#);

        let mut dest = WithBody::default();
        let err = decode_body(&mut request, &mut dest, &json_only()).expect_err("bad age");
        let Error::JsonDeserialization { path, .. } = &err else {
            panic!("expected a JSON error, got {err:?}");
        };
        assert_eq!(path, "age");
        assert!(err.is_parse());
        assert_eq!(dest, WithBody::default());
    }

    #[test]
    fn json_without_body_target_is_still_checked() {
        let mut dest = Lookup::default();

        let mut request = post("application/json", r#"{"anything": [1, 2]}"#);
        decode_body(&mut request, &mut dest, &json_only()).expect("valid json");

        let mut request = post("application/json", "{not json");
        let err = decode_body(&mut request, &mut dest, &json_only()).expect_err("invalid json");
        assert!(err.to_string().contains("JSON deserialization error"));
    }

    #[test]
    fn retrieval_requests_keep_their_body() {
        let mut request = Request::builder(Method::GET, "/")
            .header("Content-Type", "application/json")
            .body("{not json")
            .expect("request");

        let mut dest = WithBody::default();
        decode_body(&mut request, &mut dest, &json_only()).expect("skipped");
        assert!(request.body().is_some());

        let mut request = Request::builder(Method::HEAD, "/")
            .header("Content-Type", "application/json")
            .body("{not json")
            .expect("request");
        decode_body(&mut request, &mut dest, &json_only()).expect("skipped");
    }

    #[test]
    fn unmatched_content_type_releases_body() {
        let mut request = post("text/plain", "hello");

        let mut dest = WithBody::default();
        decode_body(&mut request, &mut dest, &json_only()).expect("no match");
        assert!(request.body().is_none());
        assert_eq!(dest, WithBody::default());
    }

    #[test]
    fn missing_content_type_matches_nothing() {
        let mut request = Request::builder(Method::POST, "/")
            .body("{not json")
            .expect("request");

        let mut dest = WithBody::default();
        decode_body(&mut request, &mut dest, &json_only()).expect("no match");
        assert!(request.body().is_none());
    }

    #[test]
    fn first_matching_decoder_wins() {
        let decoders: Vec<Arc<dyn BodyDecoder<WithBody>>> =
            vec![Arc::new(XmlDecoder), Arc::new(JsonBodyDecoder)];

        let mut request = post("application/json", r#"{"name":"Jane","age":42}"#);
        let mut dest = WithBody::default();
        decode_body(&mut request, &mut dest, &decoders).expect("json decoder");
        assert_eq!(dest.person.age, 42);

        let mut request = post("application/xml", "<person/>");
        let err = decode_body(&mut request, &mut dest, &decoders).expect_err("xml decoder");
        assert!(err.is_invalid_shape());
    }

    #[test]
    fn json_match_is_exact() {
        let decoder = JsonBodyDecoder;
        let matches = |raw: &str| {
            let media_type: Mime = raw.parse().expect("mime");
            BodyDecoder::<Lookup>::matches(&decoder, &media_type)
        };

        assert!(matches("application/json"));
        assert!(!matches("application/problem+json"));
        assert!(!matches("text/json"));
    }

    #[test]
    fn form_body_binds_form_fields() {
        let decoders: Vec<Arc<dyn BodyDecoder<Lookup>>> = vec![Arc::new(FormBodyDecoder)];
        let mut request = post("application/x-www-form-urlencoded", "name=Jane%20Doe");

        let mut dest = Lookup::default();
        decode_body(&mut request, &mut dest, &decoders).expect("decode");
        assert_eq!(dest.name, "Jane Doe");
    }

    #[test]
    fn form_body_ignores_query_pairs() {
        let decoders: Vec<Arc<dyn BodyDecoder<Lookup>>> = vec![Arc::new(FormBodyDecoder)];
        let mut request = Request::builder(Method::POST, "/?name=FromQuery")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("other=1")
            .expect("request");

        let mut dest = Lookup::default();
        decode_body(&mut request, &mut dest, &decoders).expect("decode");
        assert_eq!(dest.name, "");
    }
}
