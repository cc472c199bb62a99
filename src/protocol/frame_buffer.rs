//! Frame buffer for accumulating partial reads.
//!
//! Uses `bytes::BytesMut` for zero-copy buffer management.
//! Implements a state machine for handling fragmented frames:
//! - `WaitingForLength`: Need the 3-byte length prefix
//! - `WaitingForFrame`: Length parsed, need N more bytes
//!
//! # Example
//!
//! ```ignore
//! use elarian::protocol::FrameBuffer;
//!
//! let mut buffer = FrameBuffer::new();
//!
//! // Data arrives in chunks from socket
//! let frames = buffer.push(&chunk)?;
//!
//! for frame in frames {
//!     println!("Got frame on stream {}", frame.stream_id());
//! }
//! ```

use bytes::BytesMut;

use super::wire_format::{decode_length, HEADER_SIZE, LENGTH_PREFIX_SIZE, MAX_FRAME_LENGTH};
use super::Frame;
use crate::error::{ElarianError, Result};

/// State machine for frame parsing.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting for the length prefix.
    WaitingForLength,
    /// Length parsed, waiting for the frame body.
    WaitingForFrame { remaining: u32 },
}

/// Buffer for accumulating incoming bytes and extracting complete frames.
pub struct FrameBuffer {
    /// Accumulated bytes from socket reads.
    buffer: BytesMut,
    /// Current parsing state.
    state: State,
    /// Maximum allowed frame length.
    max_frame_length: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer with default settings.
    ///
    /// Default capacity: 64KB, max frame: 16MB (the limit of the length prefix).
    pub fn new() -> Self {
        Self::with_max_frame_length(MAX_FRAME_LENGTH)
    }

    /// Create a new frame buffer with a smaller frame limit.
    pub fn with_max_frame_length(max_frame_length: u32) -> Self {
        Self {
            buffer: BytesMut::with_capacity(64 * 1024),
            state: State::WaitingForLength,
            max_frame_length: max_frame_length.min(MAX_FRAME_LENGTH),
        }
    }

    /// Push data into the buffer and extract all complete frames.
    ///
    /// If data is fragmented, partial data is buffered internally for the
    /// next push.
    ///
    /// # Errors
    ///
    /// Returns error if a frame exceeds the maximum length or cannot be decoded.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Frame>> {
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        while let Some(frame) = self.try_extract_one()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    fn try_extract_one(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.state {
                State::WaitingForLength => {
                    let Some(length) = decode_length(&self.buffer) else {
                        return Ok(None);
                    };

                    if length > self.max_frame_length {
                        return Err(ElarianError::Protocol(format!(
                            "Frame size {} exceeds maximum {}",
                            length, self.max_frame_length
                        )));
                    }
                    if (length as usize) < HEADER_SIZE {
                        return Err(ElarianError::Protocol(format!(
                            "Frame size {} is smaller than the header",
                            length
                        )));
                    }

                    let _ = self.buffer.split_to(LENGTH_PREFIX_SIZE);
                    self.state = State::WaitingForFrame { remaining: length };
                }

                State::WaitingForFrame { remaining } => {
                    let remaining = remaining as usize;
                    if self.buffer.len() < remaining {
                        return Ok(None);
                    }

                    let body = self.buffer.split_to(remaining).freeze();
                    self.state = State::WaitingForLength;
                    return Frame::decode(body).map(Some);
                }
            }
        }
    }

    /// Get the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer and reset state.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForLength;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::WaitingForLength => "WaitingForLength",
            State::WaitingForFrame { .. } => "WaitingForFrame",
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Frame, Payload};
    use bytes::Bytes;

    fn request(stream_id: u32, data: &'static [u8]) -> Frame {
        Frame::RequestResponse {
            stream_id,
            payload: Payload::data(Bytes::from_static(data)),
        }
    }

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = FrameBuffer::new();
        let frames = buffer.push(&request(1, b"hello").to_bytes().unwrap()).unwrap();

        assert_eq!(frames, vec![request(1, b"hello")]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_one_push() {
        let mut buffer = FrameBuffer::new();
        let mut combined = Vec::new();
        combined.extend(request(1, b"first").to_bytes().unwrap());
        combined.extend(Frame::response(2, Bytes::from_static(b"second")).to_bytes().unwrap());
        combined.extend(Frame::Cancel { stream_id: 3 }.to_bytes().unwrap());

        let frames = buffer.push(&combined).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].stream_id(), 1);
        assert_eq!(frames[1].stream_id(), 2);
        assert_eq!(frames[2], Frame::Cancel { stream_id: 3 });
    }

    #[test]
    fn test_fragmented_length_prefix() {
        let mut buffer = FrameBuffer::new();
        let bytes = request(5, b"test").to_bytes().unwrap();

        assert!(buffer.push(&bytes[..2]).unwrap().is_empty());
        assert_eq!(buffer.state_name(), "WaitingForLength");

        let frames = buffer.push(&bytes[2..]).unwrap();
        assert_eq!(frames, vec![request(5, b"test")]);
    }

    #[test]
    fn test_fragmented_body() {
        let mut buffer = FrameBuffer::new();
        let bytes = request(9, b"a longer payload that arrives in two reads")
            .to_bytes()
            .unwrap();

        let split = LENGTH_PREFIX_SIZE + HEADER_SIZE + 4;
        assert!(buffer.push(&bytes[..split]).unwrap().is_empty());
        assert_eq!(buffer.state_name(), "WaitingForFrame");

        let frames = buffer.push(&bytes[split..]).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut buffer = FrameBuffer::new();
        let bytes = request(1, b"hi").to_bytes().unwrap();

        let mut all_frames = Vec::new();
        for byte in &bytes {
            all_frames.extend(buffer.push(&[*byte]).unwrap());
        }

        assert_eq!(all_frames, vec![request(1, b"hi")]);
    }

    #[test]
    fn test_max_frame_validation() {
        let mut buffer = FrameBuffer::with_max_frame_length(100);
        let result = buffer.push(&[0x00, 0x03, 0xE8]);

        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_frame_smaller_than_header() {
        let mut buffer = FrameBuffer::new();
        let result = buffer.push(&[0x00, 0x00, 0x02, 0x00, 0x00]);
        assert!(result.is_err());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = FrameBuffer::new();
        let bytes = request(1, b"test").to_bytes().unwrap();
        buffer.push(&bytes[..5]).unwrap();
        assert_eq!(buffer.state_name(), "WaitingForFrame");

        buffer.clear();

        assert_eq!(buffer.state_name(), "WaitingForLength");
        assert!(buffer.is_empty());
    }
}
