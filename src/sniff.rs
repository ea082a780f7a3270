//! Content type detection from magic numbers.
//!
//! File parameters never declare their own type; multipart filenames and synthesized
//! audio content types are derived from the bytes themselves.

/// MIME type reported when the content is not recognized.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Guesses the MIME type of `bytes` by inspecting its leading magic number.
///
/// # Examples
///
/// ```
/// use kakao_api::sniff::mime_type_of;
///
/// assert_eq!(mime_type_of(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
/// assert_eq!(mime_type_of(b"???"), "application/octet-stream");
/// ```
pub fn mime_type_of(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// Returns the subtype of the sniffed MIME type, used as a file extension.
///
/// `image/jpeg` yields `"jpeg"`, `image/png` yields `"png"`, unknown content yields
/// `"octet-stream"`.
pub fn extension_of(bytes: &[u8]) -> &'static str {
    subtype(mime_type_of(bytes))
}

fn subtype(mime: &'static str) -> &'static str {
    let sub = mime.split_once('/').map_or(mime, |(_, sub)| sub);
    sub.split(';').next().unwrap_or(sub).trim()
}
