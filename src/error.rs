//! Error types for API calls.
//!
//! Every failure is returned to the caller; nothing in this crate retries. Errors that
//! happen after a response arrived keep the raw body bytes so callers can log them or
//! re-parse service-specific error shapes.

use http::StatusCode;
use std::fmt;

/// Boxed error used for transport failures coming from arbitrary [`Transport`](crate::transport::Transport)
/// implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for API calls.
///
/// # Examples
///
/// ```no_run
/// use kakao_api::{Client, Error};
/// use kakao_api::api::translation::Language;
///
/// # fn example() -> Result<(), Error> {
/// let client = Client::new("your-rest-api-key")?;
///
/// match client.translate_text("안녕하세요", Language::Korean, Language::English) {
///     Ok(translated) => println!("{:?}", translated.translated_text),
///     Err(Error::Api { kind, message, .. }) => eprintln!("rejected ({kind}): {message}"),
///     Err(Error::HttpStatus { status, raw_body }) => {
///         eprintln!("HTTP {status}: {}", String::from_utf8_lossy(&raw_body));
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A parameter value could not be serialized for the wire.
    #[error("Failed to encode parameters: {0}")]
    Encoding(String),

    /// The request could not be built (malformed URL, invalid header name or value).
    #[error("Failed to construct request: {0}")]
    RequestConstruction(String),

    /// A network-level failure happened before any response was received
    /// (DNS lookup, refused connection, TLS failure, broken body stream).
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// The service rejected the request at the application layer.
    ///
    /// Produced when a non-200 response carried a recognizable error envelope.
    #[error("API error with {kind} (status {status}): {message}")]
    Api {
        /// The HTTP status code
        status: StatusCode,
        /// Whether the envelope carried a numeric code or an error type string
        kind: ApiErrorKind,
        /// The message taken from the envelope, empty when none was present
        message: String,
        /// The raw response body
        raw_body: Vec<u8>,
    },

    /// A non-200 response whose body did not match any known error envelope.
    #[error("HTTP status {status}: {}", String::from_utf8_lossy(.raw_body))]
    HttpStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body, verbatim
        raw_body: Vec<u8>,
    },

    /// The response body was not valid JSON/XML for the expected shape.
    #[error("Failed to decode response (status {status}): {message}")]
    Decoding {
        /// The HTTP status code
        status: StatusCode,
        /// The decoder's error message
        message: String,
        /// The body that failed to decode
        raw_body: Vec<u8>,
    },

    /// The speech recognizer reported an `errorCalled` chunk.
    #[error("Speech recognition failed: {message}")]
    Recognition {
        /// The value of the `errorCalled` chunk
        message: String,
        /// The raw response body
        raw_body: Vec<u8>,
    },

    /// The speech recognition stream ended without a `finalResult` or `errorCalled` chunk.
    #[error("Speech recognition did not receive a final result")]
    IncompleteRecognition {
        /// The raw response body
        raw_body: Vec<u8>,
    },

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A base64 string could not be decoded.
    #[error("Invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// How the service identified an application-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// A non-zero numeric error code (e.g. `-401`).
    Code(i64),
    /// An error type string (e.g. `"RequestTimeout"`).
    Type(String),
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Code(code) => write!(f, "response code: {code}"),
            ApiErrorKind::Type(error_type) => write!(f, "error type: {error_type}"),
        }
    }
}

impl Error {
    /// Returns `true` if retrying the same call might succeed.
    ///
    /// Transport failures, timeouts, 5xx and 429 responses are considered retryable.
    /// The crate never acts on this itself; it is a hint for callers that implement
    /// their own retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout => true,
            Error::Api { status, .. } | Error::HttpStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::Encoding(_)
            | Error::RequestConstruction(_)
            | Error::Decoding { .. }
            | Error::Recognition { .. }
            | Error::IncompleteRecognition { .. }
            | Error::Io(_)
            | Error::Base64(_)
            | Error::Configuration(_) => false,
        }
    }

    /// Returns the HTTP status code if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. }
            | Error::HttpStatus { status, .. }
            | Error::Decoding { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_body(&self) -> Option<&[u8]> {
        match self {
            Error::Api { raw_body, .. }
            | Error::HttpStatus { raw_body, .. }
            | Error::Decoding { raw_body, .. }
            | Error::Recognition { raw_body, .. }
            | Error::IncompleteRecognition { raw_body } => Some(raw_body),
            _ => None,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::RequestConstruction(format!("Invalid URL: {e}"))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_builder() {
            Error::RequestConstruction(e.to_string())
        } else {
            Error::Transport(Box::new(e))
        }
    }
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_transport_failures_are_retryable() {
        let err = Error::HttpStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            raw_body: b"internal error".to_vec(),
        };
        assert!(err.is_retryable());

        let err = Error::Api {
            status: StatusCode::BAD_REQUEST,
            kind: ApiErrorKind::Code(-401),
            message: "invalid key".to_string(),
            raw_body: Vec::new(),
        };
        assert!(!err.is_retryable());

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(Error::Transport(Box::new(io)).is_retryable());
        assert!(Error::Timeout.is_retryable());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::Api {
            status: StatusCode::BAD_REQUEST,
            kind: ApiErrorKind::Code(-401),
            message: "invalid key".to_string(),
            raw_body: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "API error with response code: -401 (status 400 Bad Request): invalid key"
        );

        let err = Error::HttpStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            raw_body: b"internal error".to_vec(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP status 500 Internal Server Error: internal error"
        );
    }

    #[test]
    fn raw_body_is_exposed_for_response_errors() {
        let err = Error::Decoding {
            status: StatusCode::OK,
            message: "expected value".to_string(),
            raw_body: b"not json".to_vec(),
        };
        assert_eq!(err.raw_body(), Some(&b"not json"[..]));
        assert_eq!(err.status(), Some(StatusCode::OK));
        assert!(Error::Timeout.raw_body().is_none());
    }

    #[test]
    fn url_parse_errors_become_request_construction_errors() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::RequestConstruction(_)));
    }
}
