//! # eventstream-decoder
//!
//! Decoder for a self-describing, length-prefixed binary message format
//! ("event-stream" framing) carrying typed key/value headers plus an opaque
//! payload over a byte-oriented transport.
//!
//! ## Architecture
//!
//! - **Frame Decoder** ([`decode_message`], [`Frame`]): validates one
//!   complete frame - size, declared length, both CRC-32 checksums - then
//!   parses typed headers and extracts the payload.
//! - **Reassembler** ([`MessageStream`], [`protocol::FrameBuffer`]): turns
//!   arbitrarily chunked bytes (e.g. an HTTP response body) into complete
//!   frames and decodes them in arrival order.
//!
//! Payloads are text by default; a `:content-type` header naming a JSON
//! media type upgrades them to a structured [`Payload::Json`] value.
//!
//! ## Example
//!
//! ```
//! use eventstream_decoder::{decode_message, Payload};
//!
//! // Build the minimum valid frame: empty headers, empty payload.
//! let mut frame = vec![0, 0, 0, 16, 0, 0, 0, 0];
//! let prelude_crc = crc32fast::hash(&frame);
//! frame.extend_from_slice(&prelude_crc.to_be_bytes());
//! let message_crc = crc32fast::hash(&frame);
//! frame.extend_from_slice(&message_crc.to_be_bytes());
//!
//! let message = decode_message(&frame).unwrap();
//! assert!(message.headers.is_empty());
//! assert_eq!(message.payload, Payload::Text(String::new()));
//! ```

pub mod codec;
pub mod error;
pub mod protocol;

mod stream;

pub use codec::Payload;
pub use error::DecodeError;
pub use protocol::{decode_message, Frame, HeaderValue, ParsedMessage};
pub use stream::MessageStream;
