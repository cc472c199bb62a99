//! Protocol module - RSocket wire format, framing, and frame types.
//!
//! Implements the subset of RSocket 1.0 the client needs over TCP:
//! - 24-bit length prefix and 6-byte header encoding/decoding
//! - Frame buffer for accumulating partial reads
//! - Typed frames for SETUP, KEEPALIVE, request/response, PAYLOAD, ERROR, CANCEL

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::{Frame, Payload, Setup};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    decode_length, encode_length, error_code, flags, frame_type, Header, HEADER_SIZE,
    LENGTH_PREFIX_SIZE, MAJOR_VERSION, MAX_FRAME_LENGTH, MINOR_VERSION, OCTET_STREAM_MIME,
};
