//! Base64 helpers for the image generation endpoints.

use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encodes bytes with the standard alphabet and padding.
///
/// # Examples
///
/// ```
/// assert_eq!(kakao_api::util::encode_base64(b"img"), "aW1n");
/// ```
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a standard-alphabet base64 string.
///
/// # Errors
///
/// Returns [`Error::Base64`](crate::Error::Base64) if `encoded` is not valid base64.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(encoded.trim())?)
}
