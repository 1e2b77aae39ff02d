//! Typed header parsing.
//!
//! The headers section is a run of self-describing entries:
//! ```text
//! ┌─────────┬───────────┬──────┬─────────────┐
//! │ Key Len │ Key       │ Tag  │ Value       │
//! │ 1 byte  │ 0-255 B   │ 1 B  │ tag-defined │
//! └─────────┴───────────┴──────┴─────────────┘
//! ```
//!
//! Ten type tags are defined (see [`tag`]); anything else is rejected.
//! Duplicate keys are legal on the wire and resolve last-wins in the decoded
//! mapping.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{DecodeError, Result};

/// Type tag constants as they appear on the wire.
pub mod tag {
    /// Boolean true, no value bytes.
    pub const BOOL_TRUE: u8 = 0;
    /// Boolean false, no value bytes.
    pub const BOOL_FALSE: u8 = 1;
    /// Unsigned 8-bit integer.
    pub const BYTE: u8 = 2;
    /// Unsigned 16-bit integer, Big Endian.
    pub const SHORT: u8 = 3;
    /// Unsigned 32-bit integer, Big Endian.
    pub const INTEGER: u8 = 4;
    /// Unsigned 64-bit integer, Big Endian.
    pub const LONG: u8 = 5;
    /// Raw bytes with a u16 BE length prefix.
    pub const BYTE_ARRAY: u8 = 6;
    /// UTF-8 string with a u16 BE length prefix.
    pub const STRING: u8 = 7;
    /// Unsigned 64-bit milliseconds since epoch, Big Endian.
    pub const TIMESTAMP: u8 = 8;
    /// 16 raw bytes rendered as a canonical hyphenated UUID.
    pub const UUID: u8 = 9;
}

/// Decoded header mapping. Later occurrences of a key overwrite earlier ones.
pub type Headers = HashMap<String, HeaderValue>;

/// One decoded header value.
///
/// Each wire type tag maps to exactly one variant; the decode rule for each
/// arm is fixed-width or length-prefixed as documented in [`tag`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    /// Tags 0 and 1.
    Bool(bool),
    /// Tag 2.
    Byte(u8),
    /// Tag 3.
    Short(u16),
    /// Tag 4.
    Integer(u32),
    /// Tag 5. Full 64-bit range, no narrowing.
    Long(u64),
    /// Tag 6.
    ByteArray(Vec<u8>),
    /// Tag 7.
    String(String),
    /// Tag 8. Unsigned milliseconds since epoch.
    Timestamp(u64),
    /// Tag 9. Displays as `8-4-4-4-12` hyphenated hex.
    Uuid(Uuid),
}

impl HeaderValue {
    /// Get the string content, if this is a string header.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean content, if this is a bool header.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Widen any of the integer variants (byte, short, integer, long,
    /// timestamp) to u64.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            HeaderValue::Byte(v) => Some(u64::from(*v)),
            HeaderValue::Short(v) => Some(u64::from(*v)),
            HeaderValue::Integer(v) => Some(u64::from(*v)),
            HeaderValue::Long(v) => Some(*v),
            HeaderValue::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the raw bytes, if this is a byte-array header.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HeaderValue::ByteArray(b) => Some(b),
            _ => None,
        }
    }
}

// Cursor helpers. Every read is bounds-checked against the headers section;
// running off the end means a malformed length field upstream.

#[inline]
fn read_u8(buf: &[u8], cursor: &mut usize) -> Result<u8> {
    let v = *buf.get(*cursor).ok_or(DecodeError::TruncatedHeaders)?;
    *cursor += 1;
    Ok(v)
}

#[inline]
fn read_u16(buf: &[u8], cursor: &mut usize) -> Result<u16> {
    let bytes = read_bytes(buf, cursor, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

#[inline]
fn read_u32(buf: &[u8], cursor: &mut usize) -> Result<u32> {
    let bytes = read_bytes(buf, cursor, 4)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[inline]
fn read_u64(buf: &[u8], cursor: &mut usize) -> Result<u64> {
    let bytes = read_bytes(buf, cursor, 8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Ok(u64::from_be_bytes(raw))
}

#[inline]
fn read_bytes<'b>(buf: &'b [u8], cursor: &mut usize, len: usize) -> Result<&'b [u8]> {
    let end = cursor
        .checked_add(len)
        .ok_or(DecodeError::TruncatedHeaders)?;
    let bytes = buf.get(*cursor..end).ok_or(DecodeError::TruncatedHeaders)?;
    *cursor = end;
    Ok(bytes)
}

/// Parse a complete headers section into a mapping.
///
/// `buf` must be exactly the headers section: the loop runs until the cursor
/// reaches its end, and any read that would cross it fails with
/// [`DecodeError::TruncatedHeaders`]. An unrecognized type tag fails with
/// [`DecodeError::UnknownHeaderType`] naming the tag.
pub fn parse_headers(buf: &[u8]) -> Result<Headers> {
    let mut headers = Headers::new();
    let mut cursor = 0usize;

    while cursor < buf.len() {
        let key_len = read_u8(buf, &mut cursor)? as usize;
        let key_bytes = read_bytes(buf, &mut cursor, key_len)?;
        let key = String::from_utf8_lossy(key_bytes).into_owned();

        let tag_byte = read_u8(buf, &mut cursor)?;
        let value = match tag_byte {
            tag::BOOL_TRUE => HeaderValue::Bool(true),
            tag::BOOL_FALSE => HeaderValue::Bool(false),
            tag::BYTE => HeaderValue::Byte(read_u8(buf, &mut cursor)?),
            tag::SHORT => HeaderValue::Short(read_u16(buf, &mut cursor)?),
            tag::INTEGER => HeaderValue::Integer(read_u32(buf, &mut cursor)?),
            tag::LONG => HeaderValue::Long(read_u64(buf, &mut cursor)?),
            tag::BYTE_ARRAY => {
                let len = read_u16(buf, &mut cursor)? as usize;
                HeaderValue::ByteArray(read_bytes(buf, &mut cursor, len)?.to_vec())
            }
            tag::STRING => {
                let len = read_u16(buf, &mut cursor)? as usize;
                let bytes = read_bytes(buf, &mut cursor, len)?;
                HeaderValue::String(String::from_utf8_lossy(bytes).into_owned())
            }
            tag::TIMESTAMP => HeaderValue::Timestamp(read_u64(buf, &mut cursor)?),
            tag::UUID => {
                let bytes = read_bytes(buf, &mut cursor, 16)?;
                let mut raw = [0u8; 16];
                raw.copy_from_slice(bytes);
                HeaderValue::Uuid(Uuid::from_bytes(raw))
            }
            other => return Err(DecodeError::UnknownHeaderType { tag: other }),
        };

        // Last-wins on duplicate keys.
        headers.insert(key, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: one wire-format header entry.
    fn entry(key: &str, tag_byte: u8, value: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(key.len() as u8);
        buf.extend_from_slice(key.as_bytes());
        buf.push(tag_byte);
        buf.extend_from_slice(value);
        buf
    }

    #[test]
    fn test_parse_empty_section() {
        let headers = parse_headers(&[]).unwrap();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_parse_bool_true_and_false() {
        let mut buf = entry("yes", tag::BOOL_TRUE, &[]);
        buf.extend(entry("no", tag::BOOL_FALSE, &[]));

        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["yes"], HeaderValue::Bool(true));
        assert_eq!(headers["no"], HeaderValue::Bool(false));
    }

    #[test]
    fn test_parse_byte() {
        let buf = entry("b", tag::BYTE, &[0xFE]);
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["b"], HeaderValue::Byte(0xFE));
    }

    #[test]
    fn test_parse_short_big_endian() {
        let buf = entry("s", tag::SHORT, &[0x01, 0x02]);
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["s"], HeaderValue::Short(0x0102));
    }

    #[test]
    fn test_parse_integer_big_endian() {
        let buf = entry("i", tag::INTEGER, &[0x01, 0x02, 0x03, 0x04]);
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["i"], HeaderValue::Integer(0x01020304));
    }

    #[test]
    fn test_parse_long_exceeds_32_bit_range() {
        // 2^53 + 1: representable in u64, not in an f64 or u32.
        let value = (1u64 << 53) + 1;
        let buf = entry("l", tag::LONG, &value.to_be_bytes());
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["l"], HeaderValue::Long(value));
    }

    #[test]
    fn test_parse_byte_array_length_prefixed() {
        let mut value = vec![0x00, 0x03]; // u16 BE length
        value.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        let buf = entry("data", tag::BYTE_ARRAY, &value);

        let headers = parse_headers(&buf).unwrap();
        assert_eq!(
            headers["data"],
            HeaderValue::ByteArray(vec![0xAA, 0xBB, 0xCC])
        );
    }

    #[test]
    fn test_parse_string_length_prefixed() {
        let mut value = vec![0x00, 0x05];
        value.extend_from_slice(b"hello");
        let buf = entry("greeting", tag::STRING, &value);

        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["greeting"].as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_timestamp() {
        let millis: u64 = 1_700_000_000_123;
        let buf = entry("at", tag::TIMESTAMP, &millis.to_be_bytes());
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers["at"], HeaderValue::Timestamp(millis));
    }

    #[test]
    fn test_parse_uuid_renders_hyphenated() {
        let raw = [
            0x3b, 0xfd, 0xac, 0x5c, 0xfe, 0x6c, 0x40, 0x29, //
            0x83, 0xbf, 0xc1, 0xde, 0x78, 0x19, 0xf5, 0x31,
        ];
        let buf = entry("id", tag::UUID, &raw);

        let headers = parse_headers(&buf).unwrap();
        match &headers["id"] {
            HeaderValue::Uuid(uuid) => {
                assert_eq!(uuid.to_string(), "3bfdac5c-fe6c-4029-83bf-c1de7819f531");
            }
            other => panic!("expected Uuid, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_reports_value() {
        let buf = entry("k", 255, &[]);
        match parse_headers(&buf) {
            Err(DecodeError::UnknownHeaderType { tag }) => assert_eq!(tag, 255),
            other => panic!("expected UnknownHeaderType, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_ten_is_rejected() {
        // Tag 9 is the last defined type; 10 is already out of range.
        let buf = entry("k", 10, &[]);
        assert!(matches!(
            parse_headers(&buf),
            Err(DecodeError::UnknownHeaderType { tag: 10 })
        ));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let mut buf = entry("k", tag::BYTE, &[1]);
        buf.extend(entry("k", tag::BYTE, &[2]));

        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers["k"], HeaderValue::Byte(2));
    }

    #[test]
    fn test_truncated_key_bytes() {
        // Key length 5, only 2 key bytes present.
        let buf = [5u8, b'a', b'b'];
        assert!(matches!(
            parse_headers(&buf),
            Err(DecodeError::TruncatedHeaders)
        ));
    }

    #[test]
    fn test_truncated_fixed_width_value() {
        // Integer tag with only 2 of 4 value bytes.
        let mut buf = entry("i", tag::INTEGER, &[]);
        buf.extend_from_slice(&[0x01, 0x02]);
        assert!(matches!(
            parse_headers(&buf),
            Err(DecodeError::TruncatedHeaders)
        ));
    }

    #[test]
    fn test_truncated_length_prefixed_value() {
        // String claims 100 bytes, only 3 present.
        let mut value = vec![0x00, 0x64];
        value.extend_from_slice(b"abc");
        let buf = entry("s", tag::STRING, &value);
        assert!(matches!(
            parse_headers(&buf),
            Err(DecodeError::TruncatedHeaders)
        ));
    }

    #[test]
    fn test_missing_tag_byte() {
        // Key parses, then the section ends before the tag byte.
        let buf = [1u8, b'k'];
        assert!(matches!(
            parse_headers(&buf),
            Err(DecodeError::TruncatedHeaders)
        ));
    }

    #[test]
    fn test_non_utf8_key_is_lossy() {
        let buf = [2u8, 0xFF, 0xFE, tag::BOOL_TRUE];
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers.len(), 1);
        let key = headers.keys().next().unwrap();
        assert_eq!(key, "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_empty_key_is_allowed() {
        let buf = entry("", tag::BOOL_TRUE, &[]);
        let headers = parse_headers(&buf).unwrap();
        assert_eq!(headers[""], HeaderValue::Bool(true));
    }

    #[test]
    fn test_as_u64_widens_integer_variants() {
        assert_eq!(HeaderValue::Byte(7).as_u64(), Some(7));
        assert_eq!(HeaderValue::Short(300).as_u64(), Some(300));
        assert_eq!(HeaderValue::Integer(70_000).as_u64(), Some(70_000));
        assert_eq!(HeaderValue::Long(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(HeaderValue::Timestamp(123).as_u64(), Some(123));
        assert_eq!(HeaderValue::Bool(true).as_u64(), None);
    }

    #[test]
    fn test_accessors_on_wrong_variant() {
        assert_eq!(HeaderValue::Bool(true).as_str(), None);
        assert_eq!(HeaderValue::String("x".into()).as_bool(), None);
        assert_eq!(HeaderValue::String("x".into()).as_bytes(), None);
        assert_eq!(
            HeaderValue::ByteArray(vec![1]).as_bytes(),
            Some(&[1u8][..])
        );
    }
}
