//! The API client: request dispatch and response handling.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to configure it.
//! Endpoint methods (`generate_texts`, `detect_face`, ...) live in the [`api`](crate::api)
//! modules; they all funnel through [`Client::call`].

use crate::classify::{classify, ErrorFieldPolicy};
use crate::endpoints::Endpoints;
use crate::params::BodyEncoding;
use crate::request::{build_request, Body, FormPart, HttpRequest, RequestSpec};
use crate::transport::{ReqwestTransport, Transport, TransportConfig, TransportResponse};
use crate::{Error, RawResponse, Result};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::{self, Write as _};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A client for the Kakao AI APIs.
///
/// The client is cheap to clone and safe to share between threads. Every call is a
/// single blocking request/response round trip with no retries.
///
/// # Examples
///
/// ```no_run
/// use kakao_api::Client;
/// use kakao_api::api::inference::TextGenerationParams;
///
/// # fn example() -> Result<(), kakao_api::Error> {
/// let client = Client::new("your-rest-api-key")?;
/// client.set_verbose(true);
///
/// let generated = client.generate_texts(TextGenerationParams::new("오늘 아침 하늘은", 32).with_n(2))?;
/// for generation in &generated.generations {
///     println!("{}", generation.text);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    api_key: String,
    verbose: AtomicBool,
    transport: Box<dyn Transport>,
    endpoints: Endpoints,
    body_encoding: BodyEncoding,
    default_headers: HeaderMap,
    error_policy: ErrorFieldPolicy,
}

impl Client {
    /// Creates a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Whether request/response dumps are logged.
    pub fn is_verbose(&self) -> bool {
        self.inner.verbose.load(Ordering::Relaxed)
    }

    /// Toggles request/response dumps. Takes effect for calls started afterwards.
    pub fn set_verbose(&self, verbose: bool) {
        self.inner.verbose.store(verbose, Ordering::Relaxed);
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    /// Encodes, authenticates and sends a request, then classifies the response.
    ///
    /// Returns the raw body of a 200 response; decoding it is up to the caller.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kakao_api::{Client, params::Params, request::{AuthScheme, RequestSpec}};
    ///
    /// # fn example() -> Result<(), kakao_api::Error> {
    /// let client = Client::new("your-rest-api-key")?;
    /// let spec = RequestSpec::post("https://dapi.kakao.com/v3/translation/language/detect", AuthScheme::KakaoAk)
    ///     .with_params(Params::new().with("query", "こんにちは"));
    ///
    /// let response = client.call(spec)?;
    /// println!("{}", response.text());
    /// # Ok(())
    /// # }
    /// ```
    pub fn call(&self, spec: RequestSpec) -> Result<RawResponse> {
        let request = build_request(
            spec,
            &self.inner.api_key,
            self.inner.body_encoding,
            &self.inner.default_headers,
        )?;

        let method = request.method.clone();
        let url = request.url.clone();

        self.dispatch(request).map_err(|e| {
            tracing::warn!(
                error = %e,
                method = %method,
                path = %url.path(),
                "Request failed"
            );
            e
        })
    }

    /// Like [`call`](Self::call), then decodes the body as JSON.
    pub fn call_json<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        let response = self.call(spec)?;
        self.decode(&response)
    }

    pub(crate) fn decode<T: DeserializeOwned>(&self, response: &RawResponse) -> Result<T> {
        response.json().map_err(|e| {
            if self.is_verbose() {
                tracing::warn!(
                    error = %e,
                    raw_response = %response.text(),
                    "Failed to decode response"
                );
            }
            e
        })
    }

    fn dispatch(&self, request: HttpRequest) -> Result<RawResponse> {
        let verbose = self.is_verbose();
        let method = request.method.clone();
        let url = request.url.clone();

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");
        if verbose {
            tracing::info!(
                ">>>>>> Request dump of {} {}:\n{}\n----------------",
                method,
                url.path(),
                dump_request(&request)
            );
        }

        let start_time = Instant::now();
        let TransportResponse {
            status,
            headers,
            mut body,
        } = self.inner.transport.send(request)?;

        let mut bytes = Vec::new();
        let read = body.read_to_end(&mut bytes);
        drop(body);
        if let Err(e) = read {
            return Err(body_read_error(e));
        }

        let latency = start_time.elapsed();
        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Received HTTP response"
        );
        if verbose {
            tracing::info!(
                ">>>>>> Response dump of {} {}:\n{}\n----------------",
                method,
                url.path(),
                dump_response(status, &headers, &bytes)
            );
        }

        classify(status, headers, bytes, latency, &self.inner.error_policy)
    }
}

/// Maps a failed body read. `reqwest` reports its timeouts as `Other` I/O errors that
/// wrap a `reqwest::Error`.
fn body_read_error(e: std::io::Error) -> Error {
    let timed_out = e.kind() == ErrorKind::TimedOut
        || e.get_ref()
            .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
            .is_some_and(reqwest::Error::is_timeout);
    if timed_out {
        Error::Timeout
    } else {
        Error::Transport(Box::new(e))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("verbose", &self.is_verbose())
            .field("endpoints", &self.inner.endpoints)
            .field("body_encoding", &self.inner.body_encoding)
            .finish_non_exhaustive()
    }
}

fn dump_headers(dump: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        let value = if value.is_sensitive() {
            "[sensitive]"
        } else {
            value.to_str().unwrap_or("[non-ascii]")
        };
        let _ = writeln!(dump, "{}: {}", name, value);
    }
}

fn dump_bytes(dump: &mut String, bytes: &[u8]) {
    match std::str::from_utf8(bytes) {
        Ok(text) => dump.push_str(text),
        Err(_) => {
            let _ = write!(dump, "[{} bytes of binary data]", bytes.len());
        }
    }
}

fn dump_request(request: &HttpRequest) -> String {
    let mut dump = format!("{} {}\n", request.method, request.url);
    dump_headers(&mut dump, &request.headers);
    dump.push('\n');

    match &request.body {
        Body::Empty => {}
        Body::Bytes { data, .. } | Body::Chunked { data, .. } => dump_bytes(&mut dump, data),
        Body::Multipart(parts) => {
            for part in parts {
                let _ = match part {
                    FormPart::Text { name, value } => writeln!(dump, "[{}] {}", name, value),
                    FormPart::File {
                        name,
                        filename,
                        mime_type,
                        bytes,
                    } => writeln!(
                        dump,
                        "[{}] {} ({}, {} bytes)",
                        name,
                        filename,
                        mime_type,
                        bytes.len()
                    ),
                };
            }
        }
    }
    dump
}

fn dump_response(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> String {
    let mut dump = format!("{}\n", status);
    dump_headers(&mut dump, headers);
    dump.push('\n');
    dump_bytes(&mut dump, body);
    dump
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use kakao_api::{ClientBuilder, Endpoints};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), kakao_api::Error> {
/// let client = ClientBuilder::new()
///     .api_key("your-rest-api-key")
///     .endpoints(Endpoints::rooted_at("http://localhost:8080"))
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    verbose: bool,
    endpoints: Endpoints,
    body_encoding: BodyEncoding,
    default_headers: HeaderMap,
    transport_config: TransportConfig,
    transport: Option<Box<dyn Transport>>,
    error_policy: ErrorFieldPolicy,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            verbose: false,
            endpoints: Endpoints::default(),
            body_encoding: BodyEncoding::default(),
            default_headers: HeaderMap::new(),
            transport_config: TransportConfig::default(),
            transport: None,
            error_policy: ErrorFieldPolicy::default(),
        }
    }

    /// Sets the REST API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Logs full request/response dumps when `true`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Overrides the base URLs of the service families.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the encoding of parameter bodies that contain no files.
    pub fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = encoding;
        self
    }

    /// Adds a header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Replaces all connection-level settings.
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = config;
        self
    }

    /// Sets the connect timeout (TCP and TLS handshake).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.connect_timeout = timeout;
        self
    }

    /// Sets the overall per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = Some(timeout);
        self
    }

    /// Uses a custom [`Transport`] instead of the built-in `reqwest` one.
    ///
    /// Connection settings from [`transport_config`](Self::transport_config) are ignored.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Sets which error envelope fields are probed on failed responses.
    pub fn error_field_policy(mut self, policy: ErrorFieldPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key was provided or the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Configuration("API key is required".to_string()))?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Box::new(ReqwestTransport::new(&self.transport_config)?),
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                api_key,
                verbose: AtomicBool::new(self.verbose),
                transport,
                endpoints: self.endpoints,
                body_encoding: self.body_encoding,
                default_headers: self.default_headers,
                error_policy: self.error_policy,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
