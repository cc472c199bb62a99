//! Typed frames.
//!
//! [`Frame`] is the decoded form of everything the client sends or receives.
//! Only the request/response subset is modelled in detail; other frame types
//! are surfaced as [`Frame::Unsupported`] so the connection can reject or
//! ignore them.
//!
//! # Example
//!
//! ```
//! use elarian::protocol::{Frame, FrameBuffer, Payload};
//! use bytes::Bytes;
//!
//! let frame = Frame::RequestResponse {
//!     stream_id: 1,
//!     payload: Payload::data(Bytes::from_static(b"hello")),
//! };
//!
//! let mut buffer = FrameBuffer::new();
//! let frames = buffer.push(&frame.to_bytes().unwrap()).unwrap();
//! assert_eq!(frames, vec![frame]);
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::wire_format::{
    encode_length, flags, frame_type, Header, HEADER_SIZE, LENGTH_PREFIX_SIZE, MAJOR_VERSION,
    MINOR_VERSION,
};
use crate::error::{ElarianError, Result};

/// Metadata and data carried by request and payload frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub metadata: Option<Bytes>,
    pub data: Bytes,
}

impl Payload {
    /// Payload with data only.
    pub fn data(data: Bytes) -> Self {
        Self {
            metadata: None,
            data,
        }
    }
}

/// SETUP frame contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    /// Milliseconds between client KEEPALIVE frames.
    pub keepalive_interval: u32,
    /// Milliseconds without traffic before the peer is considered dead.
    pub max_lifetime: u32,
    pub metadata_mime: String,
    pub data_mime: String,
    pub payload: Payload,
}

/// A complete protocol frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Setup(Setup),
    Keepalive {
        respond: bool,
        last_position: u64,
        data: Bytes,
    },
    RequestResponse {
        stream_id: u32,
        payload: Payload,
    },
    RequestFireAndForget {
        stream_id: u32,
        payload: Payload,
    },
    Payload {
        stream_id: u32,
        next: bool,
        complete: bool,
        payload: Payload,
    },
    Error {
        stream_id: u32,
        code: u32,
        message: String,
    },
    Cancel {
        stream_id: u32,
    },
    MetadataPush {
        metadata: Bytes,
    },
    /// A frame type this client does not implement.
    Unsupported {
        header: Header,
    },
}

impl Frame {
    /// Stream the frame belongs to (0 = connection level).
    pub fn stream_id(&self) -> u32 {
        match self {
            Frame::RequestResponse { stream_id, .. }
            | Frame::RequestFireAndForget { stream_id, .. }
            | Frame::Payload { stream_id, .. }
            | Frame::Error { stream_id, .. }
            | Frame::Cancel { stream_id } => *stream_id,
            Frame::Unsupported { header } => header.stream_id,
            Frame::Setup(_) | Frame::Keepalive { .. } | Frame::MetadataPush { .. } => 0,
        }
    }

    /// Build the reply for a completed request-response exchange.
    pub fn response(stream_id: u32, data: Bytes) -> Self {
        Frame::Payload {
            stream_id,
            next: true,
            complete: true,
            payload: Payload::data(data),
        }
    }

    /// Build an ERROR frame.
    pub fn error(stream_id: u32, code: u32, message: impl Into<String>) -> Self {
        Frame::Error {
            stream_id,
            code,
            message: message.into(),
        }
    }

    /// Decode a frame body (everything after the length prefix).
    pub fn decode(mut buf: Bytes) -> Result<Self> {
        let header = Header::decode(&buf)
            .ok_or_else(|| ElarianError::Protocol("Frame shorter than header".to_string()))?;
        buf.advance(HEADER_SIZE);

        let frame = match header.frame_type {
            frame_type::SETUP => {
                require(&buf, 12, "SETUP")?;
                let major = buf.get_u16();
                let minor = buf.get_u16();
                if major != MAJOR_VERSION {
                    return Err(ElarianError::Protocol(format!(
                        "Unsupported protocol version {}.{}",
                        major, minor
                    )));
                }
                let keepalive_interval = buf.get_u32();
                let max_lifetime = buf.get_u32();
                if header.has(flags::RESUME_ENABLE) {
                    require(&buf, 2, "SETUP resume token")?;
                    let token_len = buf.get_u16() as usize;
                    require(&buf, token_len, "SETUP resume token")?;
                    buf.advance(token_len);
                }
                let metadata_mime = read_mime(&mut buf)?;
                let data_mime = read_mime(&mut buf)?;
                Frame::Setup(Setup {
                    keepalive_interval,
                    max_lifetime,
                    metadata_mime,
                    data_mime,
                    payload: read_payload(&header, buf)?,
                })
            }
            frame_type::KEEPALIVE => {
                require(&buf, 8, "KEEPALIVE")?;
                let last_position = buf.get_u64();
                Frame::Keepalive {
                    respond: header.has(flags::RESPOND),
                    last_position,
                    data: buf,
                }
            }
            frame_type::REQUEST_RESPONSE => Frame::RequestResponse {
                stream_id: header.stream_id,
                payload: read_payload(&header, buf)?,
            },
            frame_type::REQUEST_FNF => Frame::RequestFireAndForget {
                stream_id: header.stream_id,
                payload: read_payload(&header, buf)?,
            },
            frame_type::PAYLOAD => Frame::Payload {
                stream_id: header.stream_id,
                next: header.has(flags::NEXT),
                complete: header.has(flags::COMPLETE),
                payload: read_payload(&header, buf)?,
            },
            frame_type::ERROR => {
                require(&buf, 4, "ERROR")?;
                let code = buf.get_u32();
                Frame::Error {
                    stream_id: header.stream_id,
                    code,
                    message: String::from_utf8_lossy(&buf).into_owned(),
                }
            }
            frame_type::CANCEL => Frame::Cancel {
                stream_id: header.stream_id,
            },
            frame_type::METADATA_PUSH => Frame::MetadataPush { metadata: buf },
            _ => Frame::Unsupported { header },
        };

        Ok(frame)
    }

    /// Encode into a prefix (length, header, fixed fields, metadata) and the
    /// data section, which is shared rather than copied.
    pub fn encode_parts(&self) -> Result<(Bytes, Bytes)> {
        let mut head = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + HEADER_SIZE + 32);
        head.put_slice(&[0u8; LENGTH_PREFIX_SIZE]);

        let data = match self {
            Frame::Setup(setup) => {
                let header = Header::new(0, frame_type::SETUP, metadata_flag(&setup.payload));
                head.put_slice(&header.encode());
                head.put_u16(MAJOR_VERSION);
                head.put_u16(MINOR_VERSION);
                head.put_u32(setup.keepalive_interval);
                head.put_u32(setup.max_lifetime);
                put_mime(&mut head, &setup.metadata_mime)?;
                put_mime(&mut head, &setup.data_mime)?;
                put_metadata(&mut head, &setup.payload)?;
                setup.payload.data.clone()
            }
            Frame::Keepalive {
                respond,
                last_position,
                data,
            } => {
                let flag = if *respond { flags::RESPOND } else { 0 };
                head.put_slice(&Header::new(0, frame_type::KEEPALIVE, flag).encode());
                head.put_u64(*last_position);
                data.clone()
            }
            Frame::RequestResponse { stream_id, payload } => {
                put_request(&mut head, *stream_id, frame_type::REQUEST_RESPONSE, 0, payload)?
            }
            Frame::RequestFireAndForget { stream_id, payload } => {
                put_request(&mut head, *stream_id, frame_type::REQUEST_FNF, 0, payload)?
            }
            Frame::Payload {
                stream_id,
                next,
                complete,
                payload,
            } => {
                let mut flag = 0;
                if *next {
                    flag |= flags::NEXT;
                }
                if *complete {
                    flag |= flags::COMPLETE;
                }
                put_request(&mut head, *stream_id, frame_type::PAYLOAD, flag, payload)?
            }
            Frame::Error {
                stream_id,
                code,
                message,
            } => {
                head.put_slice(&Header::new(*stream_id, frame_type::ERROR, 0).encode());
                head.put_u32(*code);
                Bytes::copy_from_slice(message.as_bytes())
            }
            Frame::Cancel { stream_id } => {
                head.put_slice(&Header::new(*stream_id, frame_type::CANCEL, 0).encode());
                Bytes::new()
            }
            Frame::MetadataPush { metadata } => {
                let header = Header::new(0, frame_type::METADATA_PUSH, flags::METADATA);
                head.put_slice(&header.encode());
                metadata.clone()
            }
            Frame::Unsupported { header } => {
                return Err(ElarianError::Protocol(format!(
                    "Cannot encode unsupported frame type {:#04x}",
                    header.frame_type
                )));
            }
        };

        let length = encode_length(head.len() - LENGTH_PREFIX_SIZE + data.len())?;
        head[..LENGTH_PREFIX_SIZE].copy_from_slice(&length);
        Ok((head.freeze(), data))
    }

    /// Encode into a single contiguous buffer, length prefix included.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let (head, data) = self.encode_parts()?;
        let mut out = Vec::with_capacity(head.len() + data.len());
        out.extend_from_slice(&head);
        out.extend_from_slice(&data);
        Ok(out)
    }
}

fn require(buf: &Bytes, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(ElarianError::Protocol(format!(
            "Truncated {} frame: need {} bytes, have {}",
            what,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

fn read_mime(buf: &mut Bytes) -> Result<String> {
    require(buf, 1, "SETUP mime")?;
    let len = buf.get_u8() as usize;
    require(buf, len, "SETUP mime")?;
    let mime = buf.split_to(len);
    String::from_utf8(mime.to_vec())
        .map_err(|_| ElarianError::Protocol("Mime type is not UTF-8".to_string()))
}

fn read_payload(header: &Header, mut buf: Bytes) -> Result<Payload> {
    let metadata = if header.has(flags::METADATA) {
        require(&buf, 3, "metadata length")?;
        let len = buf.get_uint(3) as usize;
        require(&buf, len, "metadata")?;
        Some(buf.split_to(len))
    } else {
        None
    };
    Ok(Payload {
        metadata,
        data: buf,
    })
}

fn metadata_flag(payload: &Payload) -> u16 {
    if payload.metadata.is_some() {
        flags::METADATA
    } else {
        0
    }
}

fn put_mime(head: &mut BytesMut, mime: &str) -> Result<()> {
    let len = u8::try_from(mime.len())
        .map_err(|_| ElarianError::Protocol(format!("Mime type too long: {}", mime)))?;
    head.put_u8(len);
    head.put_slice(mime.as_bytes());
    Ok(())
}

fn put_metadata(head: &mut BytesMut, payload: &Payload) -> Result<()> {
    if let Some(metadata) = &payload.metadata {
        head.put_slice(&encode_length(metadata.len())?);
        head.put_slice(metadata);
    }
    Ok(())
}

fn put_request(
    head: &mut BytesMut,
    stream_id: u32,
    kind: u8,
    flag: u16,
    payload: &Payload,
) -> Result<Bytes> {
    let header = Header::new(stream_id, kind, flag | metadata_flag(payload));
    head.put_slice(&header.encode());
    put_metadata(head, payload)?;
    Ok(payload.data.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{decode_length, OCTET_STREAM_MIME};

    fn body(frame: &Frame) -> Bytes {
        let bytes = frame.to_bytes().unwrap();
        let length = decode_length(&bytes).unwrap() as usize;
        assert_eq!(length, bytes.len() - LENGTH_PREFIX_SIZE);
        Bytes::from(bytes[LENGTH_PREFIX_SIZE..].to_vec())
    }

    #[test]
    fn test_setup_layout() {
        let frame = Frame::Setup(Setup {
            keepalive_interval: 20_000,
            max_lifetime: 90_000,
            metadata_mime: OCTET_STREAM_MIME.to_string(),
            data_mime: OCTET_STREAM_MIME.to_string(),
            payload: Payload::data(Bytes::from_static(b"meta")),
        });
        let body = body(&frame);

        // stream 0, SETUP, no flags
        assert_eq!(&body[..6], &[0, 0, 0, 0, 0x04, 0x00]);
        // version 1.0
        assert_eq!(&body[6..10], &[0, 1, 0, 0]);
        assert_eq!(&body[10..14], &20_000u32.to_be_bytes());
        assert_eq!(body[18] as usize, OCTET_STREAM_MIME.len());
        assert!(body.ends_with(b"meta"));

        assert_eq!(Frame::decode(body).unwrap(), frame);
    }

    #[test]
    fn test_payload_with_metadata() {
        let frame = Frame::Payload {
            stream_id: 7,
            next: true,
            complete: true,
            payload: Payload {
                metadata: Some(Bytes::from_static(b"md")),
                data: Bytes::from_static(b"data"),
            },
        };
        let decoded = Frame::decode(body(&frame)).unwrap();
        assert_eq!(decoded, frame);
        assert_eq!(decoded.stream_id(), 7);
    }

    #[test]
    fn test_error_frame() {
        let frame = Frame::error(3, 0x201, "handler failed");
        let body = body(&frame);
        assert_eq!(&body[6..10], &[0, 0, 0x02, 0x01]);
        match Frame::decode(body).unwrap() {
            Frame::Error {
                stream_id,
                code,
                message,
            } => {
                assert_eq!(stream_id, 3);
                assert_eq!(code, 0x201);
                assert_eq!(message, "handler failed");
            }
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_keepalive_respond_flag() {
        let frame = Frame::Keepalive {
            respond: true,
            last_position: 0,
            data: Bytes::new(),
        };
        let decoded = Frame::decode(body(&frame)).unwrap();
        assert!(matches!(decoded, Frame::Keepalive { respond: true, .. }));
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let header = Header::new(2, frame_type::REQUEST_STREAM, flags::IGNORE);
        let decoded = Frame::decode(Bytes::copy_from_slice(&header.encode())).unwrap();
        match decoded {
            Frame::Unsupported { header } => assert!(header.is_ignorable()),
            other => panic!("unexpected frame {:?}", other),
        }
    }

    #[test]
    fn test_truncated_error_frame() {
        let header = Header::new(1, frame_type::ERROR, 0);
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&[0, 1]);
        let err = Frame::decode(Bytes::from(bytes)).unwrap_err();
        assert!(err.to_string().contains("Truncated ERROR"));
    }

    #[test]
    fn test_encode_parts_shares_data() {
        let data = Bytes::from(vec![0xAB; 128]);
        let frame = Frame::RequestResponse {
            stream_id: 1,
            payload: Payload::data(data.clone()),
        };
        let (head, body) = frame.encode_parts().unwrap();
        assert_eq!(head.len(), LENGTH_PREFIX_SIZE + HEADER_SIZE);
        assert_eq!(body.as_ptr(), data.as_ptr());
    }
}
