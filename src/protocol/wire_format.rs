//! Wire format encoding and decoding.
//!
//! Every frame on the TCP stream is prefixed by a 24-bit length and starts
//! with a 6-byte header:
//! ```text
//! ┌────────────┬────────────┬────────┬──────────┐
//! │ Length     │ Stream ID  │ Type   │ Flags    │
//! │ 3 bytes    │ 4 bytes    │ 6 bits │ 10 bits  │
//! │ uint24 BE  │ uint31 BE  │        │          │
//! └────────────┴────────────┴────────┴──────────┘
//! ```
//!
//! The length covers the header and everything after it, not itself.
//! All multi-byte integers are Big Endian.

use crate::error::{ElarianError, Result};

/// Size of the frame length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 3;

/// Header size in bytes (stream id + type/flags).
pub const HEADER_SIZE: usize = 6;

/// Largest frame the 24-bit length prefix can describe.
pub const MAX_FRAME_LENGTH: u32 = 0x00FF_FFFF;

/// Protocol version sent in SETUP.
pub const MAJOR_VERSION: u16 = 1;
pub const MINOR_VERSION: u16 = 0;

/// Mime type used for both metadata and data.
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Frame type identifiers.
pub mod frame_type {
    pub const SETUP: u8 = 0x01;
    pub const LEASE: u8 = 0x02;
    pub const KEEPALIVE: u8 = 0x03;
    pub const REQUEST_RESPONSE: u8 = 0x04;
    pub const REQUEST_FNF: u8 = 0x05;
    pub const REQUEST_STREAM: u8 = 0x06;
    pub const REQUEST_CHANNEL: u8 = 0x07;
    pub const REQUEST_N: u8 = 0x08;
    pub const CANCEL: u8 = 0x09;
    pub const PAYLOAD: u8 = 0x0A;
    pub const ERROR: u8 = 0x0B;
    pub const METADATA_PUSH: u8 = 0x0C;
}

/// Flag constants (lower 10 bits of the type/flags field).
pub mod flags {
    /// Frame may be ignored if not understood.
    pub const IGNORE: u16 = 0x200;
    /// Metadata present.
    pub const METADATA: u16 = 0x100;
    /// More fragments follow (request and payload frames).
    pub const FOLLOWS: u16 = 0x080;
    /// KEEPALIVE: peer must answer.
    pub const RESPOND: u16 = 0x080;
    /// SETUP: client wants resumption.
    pub const RESUME_ENABLE: u16 = 0x080;
    /// SETUP: client honours leases.
    pub const LEASE: u16 = 0x040;
    /// PAYLOAD: stream completed.
    pub const COMPLETE: u16 = 0x040;
    /// PAYLOAD: carries data.
    pub const NEXT: u16 = 0x020;

    /// Mask of the flag bits.
    pub const MASK: u16 = 0x3FF;

    /// Check if a specific flag is set.
    #[inline]
    pub fn has_flag(flags: u16, flag: u16) -> bool {
        flags & flag != 0
    }
}

/// ERROR frame codes.
pub mod error_code {
    pub const INVALID_SETUP: u32 = 0x0000_0001;
    pub const UNSUPPORTED_SETUP: u32 = 0x0000_0002;
    pub const REJECTED_SETUP: u32 = 0x0000_0003;
    pub const REJECTED_RESUME: u32 = 0x0000_0004;
    pub const CONNECTION_ERROR: u32 = 0x0000_0101;
    pub const CONNECTION_CLOSE: u32 = 0x0000_0102;
    pub const APPLICATION_ERROR: u32 = 0x0000_0201;
    pub const REJECTED: u32 = 0x0000_0202;
    pub const CANCELED: u32 = 0x0000_0203;
    pub const INVALID: u32 = 0x0000_0204;

    /// Setup and connection codes terminate the whole connection.
    #[inline]
    pub fn is_connection_error(code: u32) -> bool {
        code < APPLICATION_ERROR
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Stream identifier (0 = connection level).
    pub stream_id: u32,
    /// Frame type (see `frame_type`).
    pub frame_type: u8,
    /// Flag bits (see `flags`).
    pub flags: u16,
}

impl Header {
    /// Create a new header.
    pub fn new(stream_id: u32, frame_type: u8, flags: u16) -> Self {
        Self {
            stream_id,
            frame_type,
            flags,
        }
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use elarian::protocol::{frame_type, Header};
    ///
    /// let header = Header::new(1, frame_type::REQUEST_RESPONSE, 0);
    /// assert_eq!(header.encode(), [0, 0, 0, 1, 0x10, 0x00]);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&(self.stream_id & 0x7FFF_FFFF).to_be_bytes());
        let type_and_flags = ((self.frame_type as u16) << 10) | (self.flags & flags::MASK);
        buf[4..6].copy_from_slice(&type_and_flags.to_be_bytes());
        buf
    }

    /// Decode header from bytes (Big Endian).
    ///
    /// Returns `None` if buffer is too short.
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_SIZE {
            return None;
        }
        let stream_id = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) & 0x7FFF_FFFF;
        let type_and_flags = u16::from_be_bytes([buf[4], buf[5]]);
        Some(Self {
            stream_id,
            frame_type: (type_and_flags >> 10) as u8,
            flags: type_and_flags & flags::MASK,
        })
    }

    /// Check if a flag is set on this header.
    #[inline]
    pub fn has(&self, flag: u16) -> bool {
        flags::has_flag(self.flags, flag)
    }

    /// Check if the frame may be ignored when not understood.
    #[inline]
    pub fn is_ignorable(&self) -> bool {
        self.has(flags::IGNORE)
    }
}

/// Encode a frame length as the 3-byte prefix.
pub fn encode_length(length: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    if length > MAX_FRAME_LENGTH as usize {
        return Err(ElarianError::Protocol(format!(
            "Frame size {} exceeds maximum {}",
            length, MAX_FRAME_LENGTH
        )));
    }
    let bytes = (length as u32).to_be_bytes();
    Ok([bytes[1], bytes[2], bytes[3]])
}

/// Decode the 3-byte length prefix.
///
/// Returns `None` if buffer is too short.
pub fn decode_length(buf: &[u8]) -> Option<u32> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return None;
    }
    Some(u32::from_be_bytes([0, buf[0], buf[1], buf[2]]))
}
