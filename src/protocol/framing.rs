//! Wire codec for the interpreter connection.
//!
//! Every payload, handshake text and JSON command alike, travels in one
//! frame shape:
//!
//! ```text
//! [u32 BE length] [b"RIDE"] [payload: length-8 bytes]
//! ```
//!
//! The length counts itself and the magic, so the smallest legal value is 8
//! (an empty payload). A bad magic or an out-of-range length means the byte
//! stream can no longer be trusted; those are connection errors, not decode
//! errors.

// Rust guideline compliant 2026-01

use std::collections::VecDeque;
use std::io::Read;

use crate::error::ClientError;

/// Frame magic following the length prefix.
pub const MAGIC: &[u8; 4] = b"RIDE";

/// Length prefix plus magic.
pub const HEADER_LEN: usize = 8;

/// Maximum frame payload size (16 MB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Encode a payload into a complete frame.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + HEADER_LEN) as u32;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&length.to_be_bytes());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(payload);
    buf
}

/// Incremental frame decoder that handles partial reads.
///
/// Feed bytes via [`FrameDecoder::feed`] and extract complete payloads.
/// Handles TCP-style byte stream reassembly.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Create a new decoder with empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the decoder and extract all complete payloads.
    ///
    /// Incomplete data is buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Vec<u8>>, ClientError> {
        self.buf.extend_from_slice(bytes);
        let mut payloads = Vec::new();

        while self.buf.len() >= HEADER_LEN {
            let length =
                u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]) as usize;

            if length < HEADER_LEN {
                return Err(ClientError::Connection(format!(
                    "invalid frame length {length}"
                )));
            }
            if length - HEADER_LEN > MAX_FRAME_SIZE {
                return Err(ClientError::Connection(format!(
                    "frame too large: {length} bytes (max {MAX_FRAME_SIZE})"
                )));
            }
            if &self.buf[4..8] != MAGIC {
                return Err(ClientError::Connection(format!(
                    "bad frame magic {:02x?}",
                    &self.buf[4..8]
                )));
            }

            if self.buf.len() < length {
                break;
            }

            payloads.push(self.buf[HEADER_LEN..length].to_vec());
            self.buf.drain(..length);
        }

        Ok(payloads)
    }

    /// Returns true if the decoder has buffered partial data.
    pub fn has_partial(&self) -> bool {
        !self.buf.is_empty()
    }
}

/// Blocking frame source over any byte stream.
///
/// Wraps a [`FrameDecoder`] and pulls from the reader until one payload is
/// complete. End-of-stream is reported as a connection error.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    decoder: FrameDecoder,
    ready: VecDeque<Vec<u8>>,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
        }
    }

    /// Block until the next complete payload arrives.
    pub fn next_payload(&mut self) -> Result<Vec<u8>, ClientError> {
        let mut chunk = [0u8; 4096];
        loop {
            if let Some(payload) = self.ready.pop_front() {
                return Ok(payload);
            }
            let n = self
                .inner
                .read(&mut chunk)
                .map_err(|e| ClientError::connection("read", &e))?;
            if n == 0 {
                return Err(ClientError::Connection("connection closed by peer".into()));
            }
            self.ready.extend(self.decoder.feed(&chunk[..n])?);
        }
    }
}
