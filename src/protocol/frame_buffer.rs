//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management. Because every
//! frame declares its own total length in its first 4 bytes, the buffer
//! needs no external delimiter: once 4 bytes are available it knows exactly
//! how many more to wait for, making this a plain length-prefixed-record
//! demultiplexer.
//!
//! The expected length is always derived from the front of the accumulated
//! buffer, never from an individual chunk, so chunk boundaries may fall
//! anywhere - inside the length prefix included.
//!
//! # Example
//!
//! ```
//! use eventstream_decoder::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! // A 16-byte empty frame, delivered in two arbitrary chunks.
//! let mut frame = vec![0, 0, 0, 16, 0, 0, 0, 0];
//! let prelude_crc = crc32fast::hash(&frame);
//! frame.extend_from_slice(&prelude_crc.to_be_bytes());
//! let message_crc = crc32fast::hash(&frame);
//! frame.extend_from_slice(&message_crc.to_be_bytes());
//!
//! assert!(buffer.push(&frame[..7]).unwrap().is_empty());
//! let frames = buffer.push(&frame[7..]).unwrap();
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].as_bytes(), &frame[..]);
//! ```

use bytes::BytesMut;

use super::wire_format::{read_total_length, DEFAULT_MAX_FRAME_SIZE, MIN_FRAME_SIZE};
use super::Frame;
use crate::error::{DecodeError, Result};

/// Buffer for accumulating incoming bytes and extracting complete frames.
///
/// All pending data lives in a single `BytesMut`; complete frames are split
/// off its front without copying. One instance serves one logical stream and
/// must not be driven concurrently.
pub struct FrameBuffer {
    /// Accumulated bytes not yet assembled into a frame.
    buffer: BytesMut,
    /// Declared length of the frame currently being collected, if known.
    expected: Option<usize>,
    /// Upper bound on a declared frame length.
    max_frame_size: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer with the default 16 MB frame size cap.
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a new frame buffer with a custom frame size cap.
    ///
    /// A frame declaring a length above the cap fails fast with
    /// [`DecodeError::FrameTooLarge`] instead of buffering unboundedly.
    pub fn with_max_frame_size(max_frame_size: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            expected: None,
            max_frame_size,
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// Chunks may split a frame at any byte offset, contain multiple whole
    /// frames, or straddle frame boundaries in both directions. Returns the
    /// frames completed by this chunk, in arrival order (possibly none).
    ///
    /// # Errors
    ///
    /// [`DecodeError::FrameTooLarge`] if a declared length exceeds the cap,
    /// [`DecodeError::TooShort`] if one is below the 16-byte minimum. After
    /// an error the buffer contents are no longer trustworthy; callers
    /// should stop feeding this instance.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }

        Ok(frames)
    }

    /// Try to extract a single frame from the front of the buffer.
    ///
    /// Returns:
    /// - `Ok(Some(frame))` if a complete frame was extracted
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the declared length is out of range
    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        let expected = match self.expected {
            Some(n) => n,
            None => {
                let Some(declared) = read_total_length(&self.buffer) else {
                    // Fewer than 4 buffered bytes: wait for more data.
                    return Ok(None);
                };
                if declared < MIN_FRAME_SIZE as u32 {
                    return Err(DecodeError::TooShort {
                        len: declared as usize,
                    });
                }
                if declared > self.max_frame_size {
                    return Err(DecodeError::FrameTooLarge {
                        len: declared,
                        max: self.max_frame_size,
                    });
                }
                let declared = declared as usize;
                self.expected = Some(declared);
                declared
            }
        };

        if self.buffer.len() < expected {
            return Ok(None);
        }

        let frame = Frame::new(self.buffer.split_to(expected).freeze());
        self.expected = None;
        Ok(Some(frame))
    }

    /// Get the number of buffered bytes not yet assembled into a frame.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and forget any tracked frame length.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.expected = None;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
