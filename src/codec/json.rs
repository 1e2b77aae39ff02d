//! JSON payload re-decoding, gated on the `:content-type` header.
//!
//! The gate is a case-sensitive match: the value must start with the literal
//! `application/` and contain `json` anywhere after that prefix. This covers
//! `application/json`, `application/x-amz-json-1.1`,
//! `application/vnd.api+json` and similar media types without attempting
//! full media-type parsing.

use crate::error::Result;
use crate::protocol::{HeaderValue, Headers};

use super::Payload;

/// Header key that selects the payload interpretation.
pub const CONTENT_TYPE_HEADER: &str = ":content-type";

/// Check whether a `:content-type` value requests JSON re-decoding.
///
/// # Example
///
/// ```
/// use eventstream_decoder::codec::is_json_content_type;
///
/// assert!(is_json_content_type("application/json"));
/// assert!(is_json_content_type("application/x-amz-json-1.1"));
/// assert!(!is_json_content_type("text/json"));
/// assert!(!is_json_content_type("application/xml"));
/// ```
#[inline]
pub fn is_json_content_type(value: &str) -> bool {
    value
        .strip_prefix("application/")
        .is_some_and(|rest| rest.contains("json"))
}

/// Decode payload bytes, applying the optional JSON stage.
///
/// The bytes are first UTF-8-decoded lossily (invalid sequences become
/// U+FFFD). If `headers` carries a string `:content-type` matching the JSON
/// gate, the text is then parsed as JSON.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedPayload`](crate::DecodeError::MalformedPayload)
/// when the JSON stage was requested but the text does not parse.
pub fn decode_payload(headers: &Headers, bytes: &[u8]) -> Result<Payload> {
    let text = String::from_utf8_lossy(bytes).into_owned();

    let json_requested = matches!(
        headers.get(CONTENT_TYPE_HEADER),
        Some(HeaderValue::String(ct)) if is_json_content_type(ct)
    );

    if json_requested {
        let value = serde_json::from_str(&text)?;
        return Ok(Payload::Json(value));
    }

    Ok(Payload::Text(text))
}
