//! Parsing of speech recognition event streams.
//!
//! The recognizer answers with a sequence of JSON events framed as multipart parts.
//! Sometimes the framing is declared properly (`multipart/form-data; boundary=...`),
//! sometimes the body is multipart-shaped text under an unrelated content type. Both
//! go through [`parse_recognition_stream`], which takes the boundary from the header
//! when there is one and from the first body line otherwise.

use crate::{Error, Result};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Kind of a recognition event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecognitionEvent {
    BeginPointDetection,
    PartialResult,
    EndPointDetection,
    FinalResult,
    ErrorCalled,
    #[serde(other)]
    Other,
}

/// One event of the stream.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecognitionChunk {
    #[serde(rename = "type")]
    pub kind: RecognitionEvent,
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "nBest")]
    pub n_best: Vec<Candidate>,
}

/// An alternative transcription.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Candidate {
    pub value: String,
    #[serde(default)]
    pub score: f64,
}

/// The final transcription of an utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRecognition {
    /// The best transcription.
    pub text: String,
    /// Alternatives, best first.
    pub n_best: Vec<Candidate>,
}

/// Splits a recognition response body into its events, in order.
///
/// `content_type` is the response's `Content-Type` header, if any.
///
/// # Errors
///
/// Returns [`Error::Decoding`] if a part does not hold a valid event.
///
/// # Examples
///
/// ```
/// use kakao_api::api::recognition::{parse_recognition_stream, RecognitionEvent};
///
/// let body = "--b\r\nContent-Type: application/json\r\n\r\n{\"type\":\"partialResult\",\"value\":\"hi\"}\r\n--b--\r\n";
/// let chunks = parse_recognition_stream(Some("multipart/form-data; boundary=b"), body.as_bytes()).unwrap();
/// assert_eq!(chunks[0].kind, RecognitionEvent::PartialResult);
/// ```
pub fn parse_recognition_stream(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<Vec<RecognitionChunk>> {
    let text = String::from_utf8_lossy(body).replace("\r\n", "\n");

    let delimiter = match content_type.and_then(declared_boundary) {
        Some(boundary) => format!("--{}", boundary),
        None => {
            tracing::debug!("Recognition response has no declared boundary, using its first line");
            match text.lines().map(str::trim).find(|line| !line.is_empty()) {
                Some(first_line) => first_line.to_string(),
                None => return Ok(Vec::new()),
            }
        }
    };

    let mut chunks = Vec::new();
    for part in text.split(delimiter.as_str()) {
        let content = part_content(part);
        for event in serde_json::Deserializer::from_str(content).into_iter::<RecognitionChunk>() {
            let chunk = event.map_err(|e| Error::Decoding {
                status: StatusCode::OK,
                message: format!("invalid recognition event {:?}: {}", content, e),
                raw_body: body.to_vec(),
            })?;
            chunks.push(chunk);
        }
    }
    Ok(chunks)
}

/// Returns the first terminal event's outcome.
///
/// # Errors
///
/// - [`Error::Recognition`] if an `errorCalled` event comes before any `finalResult`.
/// - [`Error::IncompleteRecognition`] if there is no terminal event.
pub fn final_result(chunks: Vec<RecognitionChunk>, raw_body: &[u8]) -> Result<SpeechRecognition> {
    for chunk in chunks {
        match chunk.kind {
            RecognitionEvent::FinalResult => {
                return Ok(SpeechRecognition {
                    text: chunk.value,
                    n_best: chunk.n_best,
                })
            }
            RecognitionEvent::ErrorCalled => {
                return Err(Error::Recognition {
                    message: chunk.value,
                    raw_body: raw_body.to_vec(),
                })
            }
            _ => {}
        }
    }
    Err(Error::IncompleteRecognition {
        raw_body: raw_body.to_vec(),
    })
}

/// The `boundary` parameter of a `multipart/*` content type.
fn declared_boundary(content_type: &str) -> Option<&str> {
    let mut params = content_type.split(';');
    let mime = params.next()?.trim();
    if !mime.to_ascii_lowercase().starts_with("multipart/") {
        return None;
    }
    params
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

/// The content of one part: everything after its header lines.
///
/// The header block ends at the first blank line or at the first line that is not a
/// `Name: value` header, whichever comes first.
fn part_content(part: &str) -> &str {
    let mut rest = part.trim();
    // "--" is what is left of the closing delimiter.
    if rest == "--" {
        return "";
    }
    while let Some(line) = rest.lines().next() {
        if !is_header_line(line.trim()) {
            break;
        }
        rest = rest.split_once('\n').map_or("", |(_, tail)| tail);
    }
    rest.trim()
}

fn is_header_line(line: &str) -> bool {
    line.split_once(':').is_some_and(|(name, _)| {
        !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
