//! Request descriptions and the authenticated request builder.
//!
//! Endpoint callers describe a call with a [`RequestSpec`]. [`build_request`] turns it
//! into an [`HttpRequest`]: plain data that any [`Transport`](crate::transport::Transport)
//! can execute.

use crate::params::{BodyEncoding, Params};
use crate::{Error, Result};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::time::Duration;
use url::Url;

/// Selects the prefix placed before the API key in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `Authorization: KakaoAK <key>`
    KakaoAk,
}

impl AuthScheme {
    /// The literal header prefix.
    pub fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "Bearer",
            AuthScheme::KakaoAk => "KakaoAK",
        }
    }

    /// The full header value for `api_key`.
    pub fn header_value(&self, api_key: &str) -> String {
        format!("{} {}", self.prefix(), api_key)
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// A plain form field.
    Text { name: String, value: String },
    /// A file upload.
    File {
        name: String,
        filename: String,
        mime_type: &'static str,
        bytes: Vec<u8>,
    },
}

/// An HTTP request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// A fixed-length body with its content type.
    Bytes {
        content_type: String,
        data: Vec<u8>,
    },
    /// A body sent without a declared length (`Transfer-Encoding: chunked`).
    Chunked {
        content_type: String,
        data: Vec<u8>,
    },
    /// A `multipart/form-data` body. The boundary and content type are assigned by the
    /// transport.
    Multipart(Vec<FormPart>),
}

impl Body {
    /// The content type to declare, if known before sending.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            Body::Bytes { content_type, .. } | Body::Chunked { content_type, .. } => {
                Some(content_type)
            }
            Body::Empty | Body::Multipart(_) => None,
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Body::Multipart(_))
    }

    /// Returns the payload bytes of non-multipart bodies.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Body::Bytes { data, .. } | Body::Chunked { data, .. } => Some(data.as_slice()),
            Body::Empty | Body::Multipart(_) => None,
        }
    }
}

/// What a request carries: parameters to encode, or a prepared body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Encoded as a query string for GET, and as JSON / form / multipart otherwise.
    Params(Params),
    /// Sent as-is.
    Body(Body),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Params(Params::new())
    }
}

/// Describes a single API call before it is encoded and authenticated.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// The HTTP method.
    pub method: Method,

    /// The absolute endpoint URL.
    pub url: String,

    /// The authentication scheme for this endpoint family.
    pub auth: AuthScheme,

    /// Extra headers. Authorization and content-type headers override these.
    pub headers: HeaderMap,

    /// Parameters or a prepared body.
    pub payload: Payload,

    /// Overrides the client's default body encoding for parameter payloads.
    pub encoding: Option<BodyEncoding>,

    /// Deadline for this call, overriding the client-wide request timeout.
    pub timeout: Option<Duration>,
}

impl RequestSpec {
    pub fn new(method: Method, url: impl Into<String>, auth: AuthScheme) -> Self {
        Self {
            method,
            url: url.into(),
            auth,
            headers: HeaderMap::new(),
            payload: Payload::default(),
            encoding: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>, auth: AuthScheme) -> Self {
        Self::new(Method::GET, url, auth)
    }

    pub fn post(url: impl Into<String>, auth: AuthScheme) -> Self {
        Self::new(Method::POST, url, auth)
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::RequestConstruction(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::RequestConstruction(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.payload = Payload::Params(params);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.payload = Payload::Body(body);
        self
    }

    pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully formed, authenticated HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Body,
    pub timeout: Option<Duration>,
}

/// Encodes, authenticates and assembles a request.
///
/// Header precedence, lowest to highest: `default_headers`, the request's own headers,
/// `Content-Type`, `Authorization`.
///
/// # Errors
///
/// - [`Error::RequestConstruction`] for a malformed URL or an API key that is not a
///   valid header value.
/// - [`Error::Encoding`] if a parameter cannot be encoded.
pub fn build_request(
    spec: RequestSpec,
    api_key: &str,
    default_encoding: BodyEncoding,
    default_headers: &HeaderMap,
) -> Result<HttpRequest> {
    let mut url = Url::parse(&spec.url)?;

    let body = match spec.payload {
        Payload::Params(params) if spec.method == Method::GET => {
            if !params.is_empty() {
                let mut query = url.query_pairs_mut();
                for (key, value) in params.iter() {
                    query.append_pair(key, &value.to_plain_string()?);
                }
            }
            Body::Empty
        }
        Payload::Params(params) => params.encode(spec.encoding.unwrap_or(default_encoding))?,
        Payload::Body(body) => body,
    };

    let mut headers = default_headers.clone();
    for (name, value) in &spec.headers {
        headers.insert(name, value.clone());
    }
    if let Some(content_type) = body.content_type() {
        let value = HeaderValue::try_from(content_type)
            .map_err(|e| Error::RequestConstruction(format!("Invalid content type: {}", e)))?;
        headers.insert(CONTENT_TYPE, value);
    } else if body.is_multipart() {
        headers.remove(CONTENT_TYPE);
    }

    let mut auth = HeaderValue::try_from(spec.auth.header_value(api_key))
        .map_err(|_| Error::RequestConstruction("API key is not a valid header value".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    Ok(HttpRequest {
        method: spec.method,
        url,
        headers,
        body,
        timeout: spec.timeout,
    })
}
