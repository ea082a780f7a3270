//! The network seam.
//!
//! [`Transport`] executes an [`HttpRequest`] and hands back the status, headers and an
//! unread body. [`ReqwestTransport`] is the production implementation; tests can plug
//! in their own through [`ClientBuilder::transport`](crate::ClientBuilder::transport).

use crate::request::{Body, FormPart, HttpRequest};
use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use reqwest::blocking::multipart::{Form, Part};
use std::io::{Cursor, Read};
use std::time::Duration;

/// A response whose body has not been read yet.
///
/// Dropping `body` releases the underlying connection.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Box<dyn Read + Send>,
}

/// Executes requests. Implementations must be safe to share across threads.
pub trait Transport: Send + Sync {
    /// Sends `request` and returns once the response headers have arrived.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Timeout`] when no response was received.
    fn send(&self, request: HttpRequest) -> Result<TransportResponse>;
}

/// Connection-level protections applied to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Bound on establishing a connection, TCP and TLS handshake included.
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout: Duration,
    /// TCP keep-alive interval.
    pub tcp_keepalive: Duration,
    /// Bound on a whole call. A request's own timeout takes precedence.
    ///
    /// The blocking client has no separate bound on waiting for response headers, so
    /// this timeout also covers that phase.
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            tcp_keepalive: Duration::from_secs(300),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

/// [`Transport`] over `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &TransportConfig) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .tcp_keepalive(config.tcp_keepalive)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    pub fn from_client(http_client: reqwest::blocking::Client) -> Self {
        Self { http_client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<TransportResponse> {
        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            Body::Empty => builder,
            Body::Bytes { data, .. } => builder.body(data),
            // No declared length, so the body goes out with chunked transfer encoding.
            Body::Chunked { data, .. } => builder.body(reqwest::blocking::Body::new(Cursor::new(data))),
            Body::Multipart(parts) => builder.multipart(into_form(parts)?),
        };

        let response = builder.send()?;

        Ok(TransportResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Box::new(response),
        })
    }
}

fn into_form(parts: Vec<FormPart>) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                filename,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(filename)
                    .mime_str(mime_type)
                    .map_err(|e| Error::RequestConstruction(format!("Invalid mime type: {}", e)))?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}
