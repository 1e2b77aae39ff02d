//! Protocol module - wire format, framing, and typed headers.
//!
//! This module implements the binary event-stream format:
//! - 12-byte prelude decoding and CRC-32 verification
//! - typed header parsing over the ten wire type tags
//! - frame container and the single-message decode path
//! - frame buffer for accumulating partial reads

mod frame;
mod frame_buffer;
mod header;
mod wire_format;

pub use frame::{decode_message, Frame, ParsedMessage};
pub use frame_buffer::FrameBuffer;
pub use header::{parse_headers, tag, HeaderValue, Headers};
pub use wire_format::{
    read_total_length, verify_message_checksum, Prelude, CHECKSUM_SIZE, DEFAULT_MAX_FRAME_SIZE,
    MIN_FRAME_SIZE, PRELUDE_SIZE,
};
