//! Response classification.
//!
//! A 200 response passes through untouched. Anything else is probed for the service's
//! error envelope; field names differ between service families, so the probe order is
//! configuration ([`ErrorFieldPolicy`]) rather than per-call-site logic.

use crate::error::ApiErrorKind;
use crate::{Error, RawResponse, Result};
use http::{HeaderMap, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

/// Which envelope fields to probe, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorFieldPolicy {
    /// Field holding the numeric error code.
    pub code_field: &'static str,
    /// Field holding the error type string.
    pub error_type_field: &'static str,
    /// Message fields, primary first. The first non-empty one wins.
    pub message_fields: &'static [&'static str],
}

impl ErrorFieldPolicy {
    /// `{"code": .., "message" | "msg": ..}` and `{"errorType": .., "message": ..}`, as
    /// returned by the vision, translation, inference, pose and speech families.
    pub const KAKAO: Self = Self {
        code_field: "code",
        error_type_field: "errorType",
        message_fields: &["message", "msg"],
    };
}

impl Default for ErrorFieldPolicy {
    fn default() -> Self {
        Self::KAKAO
    }
}

/// A decoded error envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub code: Option<i64>,
    pub error_type: Option<String>,
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Decodes `body` as an envelope. Returns `None` unless the body is a JSON object.
    pub fn parse(body: &[u8], policy: &ErrorFieldPolicy) -> Option<Self> {
        let object: Map<String, Value> = serde_json::from_slice(body).ok()?;

        let non_empty_str = |field: &str| {
            object
                .get(field)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            code: object.get(policy.code_field).and_then(Value::as_i64),
            error_type: non_empty_str(policy.error_type_field),
            message: policy
                .message_fields
                .iter()
                .find_map(|field| non_empty_str(*field)),
        })
    }

    /// A non-zero code takes precedence over an error type.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match (self.code, &self.error_type) {
            (Some(code), _) if code != 0 => Some(ApiErrorKind::Code(code)),
            (_, Some(error_type)) => Some(ApiErrorKind::Type(error_type.clone())),
            _ => None,
        }
    }
}

/// Turns a status code and a fully read body into a [`RawResponse`] or an error.
///
/// # Errors
///
/// - [`Error::Api`] when a non-200 body is an envelope with a non-zero code or an
///   error type.
/// - [`Error::HttpStatus`] for every other non-200 response.
pub fn classify(
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    latency: Duration,
    policy: &ErrorFieldPolicy,
) -> Result<RawResponse> {
    if status == StatusCode::OK {
        return Ok(RawResponse::new(body, status, headers, latency));
    }

    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            response = %String::from_utf8_lossy(&body),
            "Client error (4xx)"
        );
    } else if status.is_server_error() {
        tracing::warn!(
            status = status.as_u16(),
            response = %String::from_utf8_lossy(&body),
            "Server error (5xx)"
        );
    }

    let envelope = ErrorEnvelope::parse(&body, policy);
    match envelope.as_ref().and_then(ErrorEnvelope::kind) {
        Some(kind) => Err(Error::Api {
            status,
            kind,
            message: envelope.and_then(|e| e.message).unwrap_or_default(),
            raw_body: body,
        }),
        None => Err(Error::HttpStatus {
            status,
            raw_body: body,
        }),
    }
}
