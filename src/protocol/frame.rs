//! Frame container and the single-message decode path.
//!
//! A [`Frame`] is one complete, self-delimited unit of the wire format, from
//! its 4-byte length prefix to its trailing checksum. It owns its bytes
//! (`bytes::Bytes`, so slicing one out of an accumulation buffer is
//! zero-copy) and is consumed entirely by [`Frame::decode`].
//!
//! Decoding is strict and ordered: size check, declared-length check,
//! prelude CRC, message CRC, header parse, payload extraction. Each step's
//! failure is fatal to the whole call; there is no partial result.

use bytes::Bytes;
use serde::Serialize;

use crate::codec::{decode_payload, Payload};
use crate::error::{DecodeError, Result};

use super::header::{parse_headers, Headers};
use super::wire_format::{
    verify_message_checksum, Prelude, CHECKSUM_SIZE, MIN_FRAME_SIZE, PRELUDE_SIZE,
};

/// A complete, undecoded protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    bytes: Bytes,
}

impl Frame {
    /// Wrap an owned byte sequence as a frame (zero-copy).
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Wrap a byte slice as a frame (copies data).
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    /// Get the raw frame bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the frame length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether the frame is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Validate and decode this frame. See [`decode_message`].
    pub fn decode(&self) -> Result<ParsedMessage> {
        decode_message(&self.bytes)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A fully-validated, decoded message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedMessage {
    /// Decoded header mapping (duplicate wire keys resolved last-wins).
    pub headers: Headers,
    /// Payload, either raw text or a JSON value (see [`Payload`]).
    pub payload: Payload,
}

/// Validate and decode one complete frame.
///
/// This is a pure function: no I/O, no mutation of the input, and the same
/// bytes always produce the same result.
///
/// # Errors
///
/// In check order: [`DecodeError::TooShort`], [`DecodeError::LengthMismatch`],
/// [`DecodeError::PreludeChecksum`], [`DecodeError::MessageChecksum`], then
/// any header-parse failure ([`DecodeError::UnknownHeaderType`],
/// [`DecodeError::TruncatedHeaders`]) and finally
/// [`DecodeError::MalformedPayload`] if a requested JSON re-decode fails.
/// Both checksums are verified, in this order, before any header byte is
/// touched.
pub fn decode_message(frame: &[u8]) -> Result<ParsedMessage> {
    if frame.len() < MIN_FRAME_SIZE {
        return Err(DecodeError::TooShort { len: frame.len() });
    }

    let prelude = Prelude::decode(frame).expect("length checked above");

    if prelude.total_length as usize != frame.len() {
        return Err(DecodeError::LengthMismatch {
            declared: prelude.total_length,
            actual: frame.len(),
        });
    }

    prelude.verify(frame)?;
    verify_message_checksum(frame)?;

    let headers_end = prelude.headers_end();
    let payload_end = frame.len() - CHECKSUM_SIZE;
    if headers_end > payload_end {
        return Err(DecodeError::TruncatedHeaders);
    }

    let headers = parse_headers(&frame[PRELUDE_SIZE..headers_end])?;
    let payload = decode_payload(&headers, &frame[headers_end..payload_end])?;

    Ok(ParsedMessage { headers, payload })
}
