//! Push-driven message stream: chunks in, decoded messages out.
//!
//! [`MessageStream`] composes a [`FrameBuffer`] with the frame decoder. The
//! caller pushes byte chunks as they arrive from the transport; each push
//! returns the messages completed by that chunk, in arrival order.
//!
//! Any failure - framing or decode - terminates the stream: the byte offset
//! of the next valid frame cannot be determined past a corrupt one, so no
//! resynchronization is attempted and every subsequent push fails with
//! [`DecodeError::Terminated`].

use crate::error::{DecodeError, Result};
use crate::protocol::{FrameBuffer, ParsedMessage};

/// Reassembles an arbitrarily chunked byte stream into decoded messages.
///
/// One instance serves one logical stream; it owns its accumulation buffer
/// exclusively, so independent streams never interfere. Decoding is
/// synchronous and bounded: a push does no I/O and never blocks.
///
/// # Example
///
/// ```
/// use eventstream_decoder::MessageStream;
///
/// // A 16-byte empty frame: zero-length headers, zero-length payload.
/// let mut frame = vec![0, 0, 0, 16, 0, 0, 0, 0];
/// let prelude_crc = crc32fast::hash(&frame);
/// frame.extend_from_slice(&prelude_crc.to_be_bytes());
/// let message_crc = crc32fast::hash(&frame);
/// frame.extend_from_slice(&message_crc.to_be_bytes());
///
/// let mut stream = MessageStream::new();
/// assert!(stream.push(&frame[..10]).unwrap().is_empty());
/// let messages = stream.push(&frame[10..]).unwrap();
/// assert_eq!(messages.len(), 1);
/// assert!(messages[0].headers.is_empty());
/// ```
pub struct MessageStream {
    buffer: FrameBuffer,
    terminated: bool,
}

impl MessageStream {
    /// Create a new message stream with the default frame size cap.
    pub fn new() -> Self {
        Self {
            buffer: FrameBuffer::new(),
            terminated: false,
        }
    }

    /// Create a new message stream with a custom frame size cap.
    pub fn with_max_frame_size(max_frame_size: u32) -> Self {
        Self {
            buffer: FrameBuffer::with_max_frame_size(max_frame_size),
            terminated: false,
        }
    }

    /// Push a chunk and decode every frame it completes, in order.
    ///
    /// # Errors
    ///
    /// Any framing or decode error from this chunk, or
    /// [`DecodeError::Terminated`] if an earlier push already failed. An
    /// error is terminal: the stream accepts no further input.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<ParsedMessage>> {
        if self.terminated {
            return Err(DecodeError::Terminated);
        }

        match self.push_inner(chunk) {
            Ok(messages) => Ok(messages),
            Err(e) => {
                self.terminated = true;
                tracing::debug!("terminating event stream: {}", e);
                Err(e)
            }
        }
    }

    fn push_inner(&mut self, chunk: &[u8]) -> Result<Vec<ParsedMessage>> {
        let frames = self.buffer.push(chunk)?;
        let mut messages = Vec::with_capacity(frames.len());
        for frame in frames {
            messages.push(frame.decode()?);
        }
        Ok(messages)
    }

    /// Check whether an earlier failure has terminated this stream.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Get the number of buffered bytes awaiting a complete frame.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for MessageStream {
    fn default() -> Self {
        Self::new()
    }
}
