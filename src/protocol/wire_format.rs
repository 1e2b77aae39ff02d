//! Wire format decoding for the event-stream frame layout.
//!
//! Implements the 12-byte prelude plus trailing checksum:
//! ```text
//! ┌──────────────┬───────────────┬──────────────┬──────────┬──────────┬───────────┐
//! │ Total Length │ Headers Length│ Prelude CRC  │ Headers  │ Payload  │ Msg CRC   │
//! │ 4 bytes      │ 4 bytes       │ 4 bytes      │ variable │ variable │ 4 bytes   │
//! │ uint32 BE    │ uint32 BE     │ uint32 BE    │          │          │ uint32 BE │
//! └──────────────┴───────────────┴──────────────┴──────────┴──────────┴───────────┘
//! ```
//!
//! All multi-byte integers are Big Endian. The prelude CRC covers bytes 0-7;
//! the message CRC covers everything before itself. CRC-32 is the standard
//! ISO-HDLC polynomial (`crc32fast`).

use crate::error::{DecodeError, Result};

/// Prelude size in bytes (total length + headers length + prelude CRC).
pub const PRELUDE_SIZE: usize = 12;

/// Trailing checksum size in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Minimum frame size: a prelude plus the trailing checksum, nothing else.
pub const MIN_FRAME_SIZE: usize = PRELUDE_SIZE + CHECKSUM_SIZE;

/// Default maximum frame size accepted during reassembly (16 MB).
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16 * 1024 * 1024;

/// Decoded frame prelude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prelude {
    /// Length of the entire frame, including these 4 bytes.
    pub total_length: u32,
    /// Length in bytes of the headers section.
    pub headers_length: u32,
    /// Declared CRC-32 over bytes 0-7.
    pub checksum: u32,
}

impl Prelude {
    /// Decode a prelude from the front of a buffer (Big Endian).
    ///
    /// Returns `None` if the buffer is shorter than [`PRELUDE_SIZE`].
    ///
    /// # Example
    ///
    /// ```
    /// use eventstream_decoder::protocol::Prelude;
    ///
    /// let mut bytes = vec![0, 0, 0, 16, 0, 0, 0, 0];
    /// let crc = crc32fast::hash(&bytes);
    /// bytes.extend_from_slice(&crc.to_be_bytes());
    ///
    /// let prelude = Prelude::decode(&bytes).unwrap();
    /// assert_eq!(prelude.total_length, 16);
    /// assert_eq!(prelude.headers_length, 0);
    /// assert_eq!(prelude.checksum, crc);
    /// ```
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < PRELUDE_SIZE {
            return None;
        }
        Some(Self {
            total_length: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            headers_length: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            checksum: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }

    /// Verify the declared prelude CRC against the first 8 bytes of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::PreludeChecksum`] with both values on mismatch.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is shorter than [`PRELUDE_SIZE`].
    pub fn verify(&self, frame: &[u8]) -> Result<()> {
        let actual = crc32fast::hash(&frame[..PRELUDE_SIZE - CHECKSUM_SIZE]);
        if actual != self.checksum {
            return Err(DecodeError::PreludeChecksum {
                expected: self.checksum,
                actual,
            });
        }
        Ok(())
    }

    /// Offset of the first byte past the headers section.
    #[inline]
    pub fn headers_end(&self) -> usize {
        PRELUDE_SIZE + self.headers_length as usize
    }
}

/// Read the declared total length from the first 4 bytes of a buffer.
///
/// Returns `None` if fewer than 4 bytes are available. This is all a reader
/// needs to know how many more bytes to wait for: the length is
/// self-declared and includes the prelude and trailing checksum.
#[inline]
pub fn read_total_length(buf: &[u8]) -> Option<u32> {
    if buf.len() < 4 {
        return None;
    }
    Some(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

/// Verify the trailing message CRC of a complete frame.
///
/// The declared value occupies the last 4 bytes; the computed value covers
/// every byte before them.
///
/// # Errors
///
/// Returns [`DecodeError::MessageChecksum`] with both values on mismatch.
///
/// # Panics
///
/// Panics if `frame` is shorter than [`CHECKSUM_SIZE`].
pub fn verify_message_checksum(frame: &[u8]) -> Result<()> {
    let body_end = frame.len() - CHECKSUM_SIZE;
    let declared = u32::from_be_bytes([
        frame[body_end],
        frame[body_end + 1],
        frame[body_end + 2],
        frame[body_end + 3],
    ]);
    let actual = crc32fast::hash(&frame[..body_end]);
    if actual != declared {
        return Err(DecodeError::MessageChecksum {
            expected: declared,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: prelude bytes with a valid CRC for the given lengths.
    fn make_prelude(total_length: u32, headers_length: u32) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PRELUDE_SIZE);
        buf.extend_from_slice(&total_length.to_be_bytes());
        buf.extend_from_slice(&headers_length.to_be_bytes());
        let crc = crc32fast::hash(&buf);
        buf.extend_from_slice(&crc.to_be_bytes());
        buf
    }

    #[test]
    fn test_prelude_decode_big_endian() {
        let buf = [
            0x00, 0x00, 0x01, 0x02, // total_length = 258
            0x00, 0x00, 0x00, 0x0A, // headers_length = 10
            0xDE, 0xAD, 0xBE, 0xEF, // checksum
        ];
        let prelude = Prelude::decode(&buf).unwrap();
        assert_eq!(prelude.total_length, 258);
        assert_eq!(prelude.headers_length, 10);
        assert_eq!(prelude.checksum, 0xDEADBEEF);
    }

    #[test]
    fn test_prelude_decode_too_short() {
        let buf = [0u8; PRELUDE_SIZE - 1];
        assert!(Prelude::decode(&buf).is_none());
    }

    #[test]
    fn test_prelude_verify_ok() {
        let buf = make_prelude(16, 0);
        let prelude = Prelude::decode(&buf).unwrap();
        assert!(prelude.verify(&buf).is_ok());
    }

    #[test]
    fn test_prelude_verify_mismatch_reports_both_values() {
        let mut buf = make_prelude(16, 0);
        buf[4] ^= 0x01; // corrupt headers_length after the CRC was computed
        let prelude = Prelude::decode(&buf).unwrap();

        match prelude.verify(&buf) {
            Err(DecodeError::PreludeChecksum { expected, actual }) => {
                assert_eq!(expected, prelude.checksum);
                assert_ne!(expected, actual);
            }
            other => panic!("expected PreludeChecksum, got {:?}", other),
        }
    }

    #[test]
    fn test_prelude_headers_end() {
        let prelude = Prelude {
            total_length: 100,
            headers_length: 20,
            checksum: 0,
        };
        assert_eq!(prelude.headers_end(), PRELUDE_SIZE + 20);
    }

    #[test]
    fn test_read_total_length() {
        assert_eq!(read_total_length(&[0, 0, 0, 16]), Some(16));
        assert_eq!(read_total_length(&[0, 0, 0, 16, 99]), Some(16));
        assert_eq!(read_total_length(&[0, 0, 0]), None);
        assert_eq!(read_total_length(&[]), None);
    }

    #[test]
    fn test_message_checksum_ok() {
        let mut frame = make_prelude(16, 0);
        let crc = crc32fast::hash(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());
        assert!(verify_message_checksum(&frame).is_ok());
    }

    #[test]
    fn test_message_checksum_mismatch() {
        let mut frame = make_prelude(16, 0);
        let crc = crc32fast::hash(&frame);
        frame.extend_from_slice(&(crc ^ 0x1).to_be_bytes());

        match verify_message_checksum(&frame) {
            Err(DecodeError::MessageChecksum { expected, actual }) => {
                assert_eq!(expected, crc ^ 0x1);
                assert_eq!(actual, crc);
            }
            other => panic!("expected MessageChecksum, got {:?}", other),
        }
    }

    #[test]
    fn test_min_frame_size_is_sixteen() {
        assert_eq!(MIN_FRAME_SIZE, 16);
    }
}
