//! Codec module - payload interpretation for decoded frames.
//!
//! A frame's payload always starts life as text; a `:content-type` header
//! declaring a JSON media type upgrades it to a structured value. The two
//! stages are explicit at the type level:
//!
//! - [`Payload::Text`] - the raw UTF-8 decode of the payload bytes
//! - [`Payload::Json`] - the same bytes re-parsed as JSON when requested
//!
//! # Example
//!
//! ```
//! use eventstream_decoder::codec::{decode_payload, Payload};
//! use eventstream_decoder::protocol::Headers;
//!
//! let payload = decode_payload(&Headers::new(), b"plain text").unwrap();
//! assert_eq!(payload, Payload::Text("plain text".to_string()));
//! ```

mod json;

pub use json::{decode_payload, is_json_content_type, CONTENT_TYPE_HEADER};

use serde::Serialize;

/// Decoded frame payload.
///
/// `Text` is the default shape. `Json` appears only when the frame carried a
/// `:content-type` header matching `application/*json*`; in that case a parse
/// failure is a hard decode error, never a silent fallback to `Text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Raw UTF-8 decode of the payload bytes.
    Text(String),
    /// Structured value parsed from the payload bytes.
    Json(serde_json::Value),
}

impl Payload {
    /// Get the text content, if the payload was not JSON-decoded.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    /// Get the structured value, if the payload was JSON-decoded.
    #[inline]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Text(_) => None,
            Payload::Json(v) => Some(v),
        }
    }
}
