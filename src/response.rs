//! Raw successful responses.
//!
//! The [`RawResponse`] type carries the unmodified body of a 200 response together with
//! its status, headers and latency. Endpoint callers decode it into their own types.

use crate::{sniff, Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;

/// The body of a successful response, plus transaction metadata.
///
/// # Examples
///
/// ```
/// # use kakao_api::RawResponse;
/// # use http::{HeaderMap, StatusCode};
/// # use std::time::Duration;
/// let response = RawResponse::new(
///     br#"{"ok":true}"#.to_vec(),
///     StatusCode::OK,
///     HeaderMap::new(),
///     Duration::from_millis(100),
/// );
///
/// let value: serde_json::Value = response.json().unwrap();
/// assert_eq!(value["ok"], true);
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The raw response body, unchanged.
    pub body: Vec<u8>,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from dispatch until the body was fully read.
    pub latency: Duration,
}

impl RawResponse {
    pub fn new(body: Vec<u8>, status: StatusCode, headers: HeaderMap, latency: Duration) -> Self {
        Self {
            body,
            status,
            headers,
            latency,
        }
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decoding`] carrying the raw body if it does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decoding {
            status: self.status,
            message: e.to_string(),
            raw_body: self.body.clone(),
        })
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns a header value by name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kakao_api::RawResponse;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = RawResponse::new(Vec::new(), StatusCode::OK, headers, Duration::ZERO);
    /// assert_eq!(response.header("content-type"), Some("application/json"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The content type sniffed from the body bytes.
    pub fn sniffed_mime_type(&self) -> &'static str {
        sniff::mime_type_of(&self.body)
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl AsRef<[u8]> for RawResponse {
    fn as_ref(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn response(body: &[u8]) -> RawResponse {
        RawResponse::new(body.to_vec(), StatusCode::OK, HeaderMap::new(), Duration::ZERO)
    }

    #[test]
    fn decoding_failure_keeps_raw_body() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Shape {
            id: String,
        }

        let err = response(b"invalid json").json::<Shape>().unwrap_err();
        match err {
            Error::Decoding {
                status, raw_body, ..
            } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(raw_body, b"invalid json");
            }
            other => panic!("expected Decoding, got {other:?}"),
        }
    }

    #[test]
    fn text_is_lossy() {
        assert_eq!(response(&[b'o', b'k', 0xFF]).text(), "ok\u{FFFD}");
    }
}
