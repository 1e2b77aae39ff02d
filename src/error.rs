//! Error types for eventstream-decoder.

use thiserror::Error;

/// Main error type for all decode operations.
///
/// Every variant is fatal to the call that produced it: the decoder never
/// recovers internally, and a [`MessageStream`](crate::MessageStream) that
/// surfaces one of these refuses all further input.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input below the 16-byte minimum frame size.
    #[error("frame too short: {len} bytes, need at least 16")]
    TooShort { len: usize },

    /// Declared total length does not match the supplied byte count.
    #[error("declared frame length {declared} does not match actual length {actual}")]
    LengthMismatch { declared: u32, actual: usize },

    /// CRC-32 over the 8-byte prelude does not match the declared value.
    #[error("prelude checksum mismatch: declared {expected:#010x}, computed {actual:#010x}")]
    PreludeChecksum { expected: u32, actual: u32 },

    /// CRC-32 over the whole frame (minus the trailing word) does not match.
    #[error("message checksum mismatch: declared {expected:#010x}, computed {actual:#010x}")]
    MessageChecksum { expected: u32, actual: u32 },

    /// Unrecognized type tag while parsing the headers section.
    #[error("unknown header type tag: {tag}")]
    UnknownHeaderType { tag: u8 },

    /// A header entry ran past the end of the headers section or the frame.
    #[error("header section exceeds frame bounds")]
    TruncatedHeaders,

    /// `:content-type` requested a JSON payload but the bytes do not parse.
    #[error("malformed JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Declared frame length exceeds the reassembler's configured maximum.
    #[error("declared frame length {len} exceeds maximum {max}")]
    FrameTooLarge { len: u32, max: u32 },

    /// Push on a stream already terminated by an earlier failure.
    #[error("stream terminated by an earlier decode failure")]
    Terminated,
}

/// Result type alias using DecodeError.
pub type Result<T> = std::result::Result<T, DecodeError>;
