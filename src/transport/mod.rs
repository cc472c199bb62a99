//! Transport module - socket opening and the multiplexed RSocket connection.
//!
//! - [`Connector`] opens the byte stream ([`TcpConnector`] by default)
//! - [`Connection`] runs SETUP, keepalive, request/response correlation and
//!   the inbound request hook over that stream
//!
//! Lifecycle signals leave the connection through a [`ConnectionListener`];
//! inbound REQUEST_RESPONSE frames are answered by a [`Responder`].

mod connection;
mod tcp;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{ElarianError, Result};

pub use connection::{Connection, ConnectionOptions, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use tcp::TcpConnector;

/// Boxed future used at trait seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Any duplex byte stream a connection can run over.
pub trait AsyncStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> AsyncStream for T {}

/// Boxed duplex stream returned by a [`Connector`].
pub type BoxStream = Box<dyn AsyncStream>;

/// Opens the raw stream to the server.
pub trait Connector: Send + Sync + 'static {
    fn connect(&self, host: &str, port: u16) -> BoxFuture<'static, Result<BoxStream>>;
}

/// Receives connection lifecycle signals.
///
/// Called from the connection's own tasks; implementations must not block.
pub trait ConnectionListener: Send + Sync + 'static {
    /// SETUP has been queued and the read loop is running.
    fn on_connected(&self);

    /// The connection is gone. Called exactly once.
    fn on_closed(&self);

    /// A connection-fatal error, reported before [`on_closed`](Self::on_closed).
    fn on_error(&self, error: ElarianError);
}

/// Answers inbound REQUEST_RESPONSE exchanges.
pub trait Responder: Send + Sync + 'static {
    /// Produce the PAYLOAD data for the request, or an error that is sent
    /// back as an APPLICATION_ERROR frame.
    fn request_response(&self, data: Bytes) -> BoxFuture<'static, Result<Bytes>>;
}
