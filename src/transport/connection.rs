//! Multiplexed RSocket connection.
//!
//! A single read loop owns the read half of the stream. It resolves
//! outstanding requests, answers keepalives, hands inbound requests to the
//! [`Responder`] on their own tasks and enforces the keepalive lifetime.
//! Every write goes through the writer task.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, ReadHalf};
use tokio::sync::{oneshot, watch, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::{BoxStream, ConnectionListener, Responder};
use crate::config::{DEFAULT_KEEPALIVE_INTERVAL, DEFAULT_MAX_LIFETIME};
use crate::error::{ElarianError, Result};
use crate::protocol::{error_code, Frame, FrameBuffer, Payload, Setup, OCTET_STREAM_MIME};
use crate::writer::{spawn_writer_task, WriterConfig, WriterHandle};

/// Default maximum inbound requests handled at the same time.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 256;

/// Read buffer size (64KB).
const READ_BUFFER_SIZE: usize = 64 * 1024;

const MAX_STREAM_ID: u32 = 0x7FFF_FFFF;

type PendingMap = HashMap<u32, oneshot::Sender<Result<Bytes>>>;

/// Options for a single connection.
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// Data of the SETUP frame.
    pub setup_data: Bytes,
    pub keepalive_interval: Duration,
    pub max_lifetime: Duration,
    pub writer: WriterConfig,
    /// Inbound requests beyond this limit are rejected.
    pub max_concurrent_requests: usize,
}

impl ConnectionOptions {
    pub fn new(setup_data: Bytes) -> Self {
        Self {
            setup_data,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            writer: WriterConfig::default(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// Handle to an RSocket connection. Cheap to clone.
#[derive(Clone)]
pub struct Connection {
    shared: Arc<Shared>,
}

struct Shared {
    writer: WriterHandle,
    writer_task: Mutex<Option<JoinHandle<Result<()>>>>,
    /// Taken by `start`.
    reader: Mutex<Option<ReadHalf<BoxStream>>>,
    /// `None` once the connection is torn down.
    pending: Mutex<Option<PendingMap>>,
    next_stream_id: AtomicU32,
    shutdown: watch::Sender<bool>,
    closed: watch::Sender<bool>,
    torn_down: AtomicBool,
    listener: Arc<dyn ConnectionListener>,
    responder: Option<Arc<dyn Responder>>,
    request_limit: Arc<Semaphore>,
    options: ConnectionOptions,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

impl Connection {
    /// Wrap an open stream. Nothing is sent until [`start`](Self::start).
    ///
    /// Without a responder every inbound request is answered with REJECTED.
    pub fn new(
        stream: BoxStream,
        options: ConnectionOptions,
        listener: Arc<dyn ConnectionListener>,
        responder: Option<Arc<dyn Responder>>,
    ) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        let (writer, writer_task) = spawn_writer_task(writer, options.writer.clone());
        let (shutdown, _) = watch::channel(false);
        let (closed, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                writer,
                writer_task: Mutex::new(Some(writer_task)),
                reader: Mutex::new(Some(reader)),
                pending: Mutex::new(Some(HashMap::new())),
                next_stream_id: AtomicU32::new(1),
                shutdown,
                closed,
                torn_down: AtomicBool::new(false),
                listener,
                responder,
                request_limit: Arc::new(Semaphore::new(options.max_concurrent_requests)),
                options,
            }),
        }
    }

    /// Send SETUP, start the read loop and report `on_connected`.
    pub async fn start(&self) -> Result<()> {
        let reader = lock(&self.shared.reader)
            .take()
            .ok_or_else(|| ElarianError::Protocol("Connection already started".to_string()))?;

        let options = &self.shared.options;
        let setup = Frame::Setup(Setup {
            keepalive_interval: millis(options.keepalive_interval),
            max_lifetime: millis(options.max_lifetime),
            metadata_mime: OCTET_STREAM_MIME.to_string(),
            data_mime: OCTET_STREAM_MIME.to_string(),
            payload: Payload::data(options.setup_data.clone()),
        });
        if let Err(e) = self.shared.writer.send_frame(&setup).await {
            self.shared.teardown(None);
            return Err(e);
        }
        tracing::debug!("SETUP sent");

        self.shared.listener.on_connected();
        tokio::spawn(run(
            self.shared.clone(),
            reader,
            self.shared.shutdown.subscribe(),
        ));
        Ok(())
    }

    /// Send one request and wait for its PAYLOAD or ERROR.
    pub async fn request_response(&self, data: Bytes) -> Result<Bytes> {
        let stream_id = self.shared.next_stream_id();
        let (tx, rx) = oneshot::channel();
        match lock(&self.shared.pending).as_mut() {
            Some(pending) => {
                pending.insert(stream_id, tx);
            }
            None => return Err(ElarianError::ConnectionClosed),
        }

        let frame = Frame::RequestResponse {
            stream_id,
            payload: Payload::data(data),
        };
        if let Err(e) = self.shared.writer.send_frame(&frame).await {
            self.shared.take_pending(stream_id);
            return Err(e);
        }

        rx.await.map_err(|_| ElarianError::ConnectionClosed)?
    }

    /// Close the connection and wait until `on_closed` has been reported.
    pub async fn close(&self) {
        self.shared.shutdown.send_replace(true);
        if lock(&self.shared.reader).take().is_some() {
            // never started, there is no read loop to tear down
            self.shared.teardown(None);
        }
        self.closed().await;
    }

    /// Resolve once the connection has been torn down.
    pub async fn closed(&self) {
        let mut closed = self.shared.closed.subscribe();
        let _ = closed.wait_for(|closed| *closed).await;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        *self.shared.closed.borrow()
    }

    /// Requests sent and not yet resolved.
    pub fn pending_requests(&self) -> usize {
        lock(&self.shared.pending).as_ref().map_or(0, HashMap::len)
    }
}

impl Shared {
    /// Client-initiated streams use odd ids.
    fn next_stream_id(&self) -> u32 {
        self.next_stream_id.fetch_add(2, Ordering::Relaxed) & MAX_STREAM_ID
    }

    fn take_pending(&self, stream_id: u32) -> Option<oneshot::Sender<Result<Bytes>>> {
        lock(&self.pending)
            .as_mut()
            .and_then(|pending| pending.remove(&stream_id))
    }

    fn resolve(&self, stream_id: u32, result: Result<Bytes>) {
        match self.take_pending(stream_id) {
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => tracing::warn!("Response for unknown stream {}", stream_id),
        }
    }

    async fn handle_frame(self: &Arc<Self>, frame: Frame) -> Result<()> {
        match frame {
            Frame::Payload {
                stream_id, payload, ..
            } => self.resolve(stream_id, Ok(payload.data)),
            Frame::Error {
                stream_id: 0,
                code,
                message,
            } => return Err(ElarianError::Transport { code, message }),
            Frame::Error {
                stream_id,
                code,
                message,
            } => self.resolve(stream_id, Err(ElarianError::Transport { code, message })),
            Frame::RequestResponse { stream_id, payload } => {
                self.accept_request(stream_id, payload.data).await?
            }
            Frame::Keepalive {
                respond: true,
                data,
                ..
            } => {
                let echo = Frame::Keepalive {
                    respond: false,
                    last_position: 0,
                    data,
                };
                self.writer.send_frame(&echo).await?;
            }
            Frame::Keepalive { .. } => {}
            Frame::Cancel { stream_id } => {
                tracing::debug!("Ignoring CANCEL for stream {}", stream_id)
            }
            Frame::Unsupported { header } if header.is_ignorable() => {
                tracing::debug!("Ignoring frame type {:#04x}", header.frame_type)
            }
            other => tracing::warn!("Unexpected frame on stream {}", other.stream_id()),
        }
        Ok(())
    }

    async fn accept_request(self: &Arc<Self>, stream_id: u32, data: Bytes) -> Result<()> {
        let Some(responder) = self.responder.clone() else {
            tracing::debug!("Rejecting request on stream {}, no responder", stream_id);
            let reject = Frame::error(stream_id, error_code::REJECTED, "Notifications are disabled");
            return self.writer.send_frame(&reject).await;
        };

        let permit = match self.request_limit.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(
                    "Max concurrent requests ({}) reached, rejecting stream {}",
                    self.options.max_concurrent_requests,
                    stream_id
                );
                let reject = Frame::error(stream_id, error_code::REJECTED, "Too many requests");
                return self.writer.send_frame(&reject).await;
            }
        };

        let writer = self.writer.clone();
        tokio::spawn(async move {
            let _permit = permit;
            let frame = match responder.request_response(data).await {
                Ok(reply) => Frame::response(stream_id, reply),
                Err(e) => {
                    tracing::warn!("Request on stream {} failed: {}", stream_id, e);
                    Frame::error(stream_id, error_code::APPLICATION_ERROR, e.to_string())
                }
            };
            if let Err(e) = writer.send_frame(&frame).await {
                tracing::error!("Failed to answer stream {}: {}", stream_id, e);
            }
        });
        Ok(())
    }

    fn teardown(&self, error: Option<ElarianError>) {
        if self.torn_down.swap(true, Ordering::AcqRel) {
            return;
        }

        let pending = lock(&self.pending).take().unwrap_or_default();
        if let Some(task) = lock(&self.writer_task).take() {
            task.abort();
        }

        let transport = match &error {
            Some(ElarianError::Transport { code, message }) => Some((*code, message.clone())),
            _ => None,
        };
        if let Some(error) = error {
            self.listener.on_error(error);
        }
        for (_, tx) in pending {
            let reason = match &transport {
                Some((code, message)) => ElarianError::Transport {
                    code: *code,
                    message: message.clone(),
                },
                None => ElarianError::ConnectionClosed,
            };
            let _ = tx.send(Err(reason));
        }

        self.listener.on_closed();
        self.closed.send_replace(true);
    }
}

async fn run(shared: Arc<Shared>, reader: ReadHalf<BoxStream>, shutdown: watch::Receiver<bool>) {
    match read_loop(&shared, reader, shutdown).await {
        Ok(()) => {
            tracing::debug!("Connection closed locally");
            shared.teardown(None);
        }
        Err(ElarianError::ConnectionClosed) => {
            tracing::debug!("Connection closed by server");
            shared.teardown(None);
        }
        Err(e) => {
            tracing::error!("Read loop error: {}", e);
            shared.teardown(Some(e));
        }
    }
}

async fn read_loop(
    shared: &Arc<Shared>,
    mut reader: ReadHalf<BoxStream>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let mut buffer = FrameBuffer::new();
    let mut read_buf = vec![0u8; READ_BUFFER_SIZE];

    let interval = shared.options.keepalive_interval;
    let mut keepalive = tokio::time::interval_at(Instant::now() + interval, interval);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            // the watch::Ref must not live across the frame handling below
            _ = async { let _ = shutdown.wait_for(|closing| *closing).await; } => return Ok(()),
            read = reader.read(&mut read_buf) => {
                let n = read?;
                if n == 0 {
                    return Err(ElarianError::ConnectionClosed);
                }
                last_seen = Instant::now();

                for frame in buffer.push(&read_buf[..n])? {
                    shared.handle_frame(frame).await?;
                }
            }
            _ = keepalive.tick() => {
                if last_seen.elapsed() >= shared.options.max_lifetime {
                    return Err(ElarianError::Transport {
                        code: error_code::CONNECTION_ERROR,
                        message: format!(
                            "No frame received within {:?}",
                            shared.options.max_lifetime
                        ),
                    });
                }
                let ping = Frame::Keepalive {
                    respond: true,
                    last_position: 0,
                    data: Bytes::new(),
                };
                if let Err(e) = shared.writer.try_send_frame(&ping) {
                    tracing::warn!("Failed to queue KEEPALIVE: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::BoxFuture;
    use std::collections::VecDeque;
    use tokio::io::{duplex, AsyncWriteExt, DuplexStream};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            lock(&self.events).clone()
        }
    }

    impl ConnectionListener for Recorder {
        fn on_connected(&self) {
            lock(&self.events).push("connected".to_string());
        }

        fn on_closed(&self) {
            lock(&self.events).push("closed".to_string());
        }

        fn on_error(&self, error: ElarianError) {
            lock(&self.events).push(format!("error: {}", error));
        }
    }

    struct Echo;

    impl Responder for Echo {
        fn request_response(&self, data: Bytes) -> BoxFuture<'static, Result<Bytes>> {
            Box::pin(async move {
                if data.is_empty() {
                    return Err(ElarianError::Protocol("empty request".to_string()));
                }
                Ok(data)
            })
        }
    }

    /// Server side of the duplex pipe.
    struct Peer {
        stream: DuplexStream,
        buffer: FrameBuffer,
        queue: VecDeque<Frame>,
    }

    impl Peer {
        async fn next(&mut self) -> Frame {
            loop {
                if let Some(frame) = self.queue.pop_front() {
                    return frame;
                }
                let mut chunk = [0u8; 4096];
                let n = self.stream.read(&mut chunk).await.unwrap();
                assert!(n > 0, "client closed the stream");
                self.queue.extend(self.buffer.push(&chunk[..n]).unwrap());
            }
        }

        async fn send(&mut self, frame: &Frame) {
            self.stream.write_all(&frame.to_bytes().unwrap()).await.unwrap();
        }
    }

    async fn open(responder: Option<Arc<dyn Responder>>) -> (Connection, Peer, Arc<Recorder>) {
        let (client, server) = duplex(64 * 1024);
        let recorder = Arc::new(Recorder::default());
        let connection = Connection::new(
            Box::new(client),
            ConnectionOptions::new(Bytes::from_static(b"hello")),
            recorder.clone(),
            responder,
        );
        connection.start().await.unwrap();

        let mut peer = Peer {
            stream: server,
            buffer: FrameBuffer::new(),
            queue: VecDeque::new(),
        };
        match peer.next().await {
            Frame::Setup(setup) => assert_eq!(setup.payload.data, Bytes::from_static(b"hello")),
            other => panic!("expected SETUP, got {:?}", other),
        }
        (connection, peer, recorder)
    }

    #[tokio::test]
    async fn test_start_sends_setup() {
        let (connection, _peer, recorder) = open(None).await;
        assert_eq!(recorder.events(), vec!["connected"]);
        assert!(!connection.is_closed());
        assert!(connection.start().await.is_err());
    }

    #[tokio::test]
    async fn test_request_response_correlation() {
        let (connection, mut peer, _) = open(None).await;

        let first = tokio::spawn({
            let connection = connection.clone();
            async move { connection.request_response(Bytes::from_static(b"one")).await }
        });
        let Frame::RequestResponse { stream_id: a, .. } = peer.next().await else {
            panic!("expected request");
        };
        let second = tokio::spawn({
            let connection = connection.clone();
            async move { connection.request_response(Bytes::from_static(b"two")).await }
        });
        let Frame::RequestResponse { stream_id: b, .. } = peer.next().await else {
            panic!("expected request");
        };
        assert_eq!((a % 2, b % 2), (1, 1));
        assert_ne!(a, b);

        peer.send(&Frame::response(b, Bytes::from_static(b"second"))).await;
        peer.send(&Frame::response(a, Bytes::from_static(b"first"))).await;

        assert_eq!(first.await.unwrap().unwrap(), Bytes::from_static(b"first"));
        assert_eq!(second.await.unwrap().unwrap(), Bytes::from_static(b"second"));
        assert_eq!(connection.pending_requests(), 0);
    }

    #[tokio::test]
    async fn test_stream_error_fails_request() {
        let (connection, mut peer, recorder) = open(None).await;

        let request = tokio::spawn({
            let connection = connection.clone();
            async move { connection.request_response(Bytes::from_static(b"x")).await }
        });
        let stream_id = peer.next().await.stream_id();
        peer.send(&Frame::error(stream_id, error_code::APPLICATION_ERROR, "bad command"))
            .await;

        match request.await.unwrap() {
            Err(ElarianError::Transport { code, message }) => {
                assert_eq!(code, error_code::APPLICATION_ERROR);
                assert_eq!(message, "bad command");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!connection.is_closed());
        assert_eq!(recorder.events(), vec!["connected"]);
    }

    #[tokio::test]
    async fn test_connection_error_fails_pending() {
        let (connection, mut peer, recorder) = open(None).await;

        let request = tokio::spawn({
            let connection = connection.clone();
            async move { connection.request_response(Bytes::from_static(b"x")).await }
        });
        peer.next().await;
        peer.send(&Frame::error(0, error_code::CONNECTION_ERROR, "going away"))
            .await;

        assert!(matches!(
            request.await.unwrap(),
            Err(ElarianError::Transport { code: error_code::CONNECTION_ERROR, .. })
        ));
        connection.closed().await;

        let events = recorder.events();
        assert_eq!(events.len(), 3);
        assert!(events[1].starts_with("error: "));
        assert_eq!(events[2], "closed");
        assert!(matches!(
            connection.request_response(Bytes::new()).await,
            Err(ElarianError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_keepalive_echo() {
        let (_connection, mut peer, _) = open(None).await;

        peer.send(&Frame::Keepalive {
            respond: true,
            last_position: 0,
            data: Bytes::from_static(b"ping"),
        })
        .await;

        match peer.next().await {
            Frame::Keepalive { respond, data, .. } => {
                assert!(!respond);
                assert_eq!(data, Bytes::from_static(b"ping"));
            }
            other => panic!("expected KEEPALIVE, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inbound_request_rejected_without_responder() {
        let (_connection, mut peer, _) = open(None).await;

        peer.send(&Frame::RequestResponse {
            stream_id: 2,
            payload: Payload::data(Bytes::from_static(b"notification")),
        })
        .await;

        match peer.next().await {
            Frame::Error {
                stream_id, code, ..
            } => {
                assert_eq!(stream_id, 2);
                assert_eq!(code, error_code::REJECTED);
            }
            other => panic!("expected ERROR, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inbound_request_answered_by_responder() {
        let (_connection, mut peer, _) = open(Some(Arc::new(Echo))).await;

        peer.send(&Frame::RequestResponse {
            stream_id: 2,
            payload: Payload::data(Bytes::from_static(b"data")),
        })
        .await;
        assert_eq!(peer.next().await, Frame::response(2, Bytes::from_static(b"data")));

        peer.send(&Frame::RequestResponse {
            stream_id: 4,
            payload: Payload::data(Bytes::new()),
        })
        .await;
        match peer.next().await {
            Frame::Error {
                stream_id, code, ..
            } => {
                assert_eq!(stream_id, 4);
                assert_eq!(code, error_code::APPLICATION_ERROR);
            }
            other => panic!("expected ERROR, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_close_reports_closed() {
        let (connection, peer, recorder) = open(None).await;
        drop(peer);

        connection.closed().await;
        assert_eq!(recorder.events(), vec!["connected", "closed"]);
    }

    #[tokio::test]
    async fn test_close() {
        let (connection, _peer, recorder) = open(None).await;

        connection.close().await;
        assert!(connection.is_closed());
        assert_eq!(recorder.events(), vec!["connected", "closed"]);

        // second close is a no-op
        connection.close().await;
        assert_eq!(recorder.events().len(), 2);
    }

    #[tokio::test]
    async fn test_read_loop_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let (client, _server) = duplex(1024);
        let connection = Connection::new(
            Box::new(client),
            ConnectionOptions::new(Bytes::new()),
            Arc::new(Recorder::default()),
            Some(Arc::new(Echo)),
        );
        let reader = lock(&connection.shared.reader).take().unwrap();
        let task = run(
            connection.shared.clone(),
            reader,
            connection.shared.shutdown.subscribe(),
        );
        assert_send(&task);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_read_loop() {
        let (connection, _peer, recorder) = open(None).await;
        connection.shared.shutdown.send_replace(true);

        connection.closed().await;
        assert_eq!(recorder.events(), vec!["connected", "closed"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_server_exceeds_max_lifetime() {
        let (connection, _peer, recorder) = open(None).await;

        connection.closed().await;
        let events = recorder.events();
        assert!(events[1].starts_with("error: Transport error (0x101)"));
        assert_eq!(events[2], "closed");
    }
}
