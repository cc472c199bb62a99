//! Client builder and connection supervisor.
//!
//! The [`ClientBuilder`] registers handlers and freezes them into the client.
//! The client owns one connection at a time and drives its lifecycle:
//!
//! ```text
//! Disconnected ─connect─► Pending ─► Connecting ─► Connected ─► Closed
//!                            ▲                                    │
//!                            └──────────────connect───────────────┘
//! ```
//!
//! Lifecycle callbacks run on the blocking pool, never on the read loop.
//!
//! # Example
//!
//! ```no_run
//! use elarian::{ClientConfig, Elarian, NotificationReply};
//!
//! #[tokio::main]
//! async fn main() -> elarian::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let elarian = Elarian::builder(config)
//!         .handle("received_sms", |notification, ctx| async move {
//!             println!("{}", notification.payload["text"]);
//!             ctx.reply(NotificationReply::new()).map(|_| ())
//!         })?
//!         .build()?;
//!
//!     elarian.connect().await?;
//!     elarian.wait_for_disconnect().await
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use bytes::Bytes;
use tokio::sync::watch;

use crate::codec::ProtoCodec;
use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{ElarianError, Result};
use crate::handler::{
    Handler, HandlerRegistry, HandlerResult, Notification, NotificationContext, Role,
};
use crate::proto::{AppConnectionMetadata, StringValue};
use crate::transport::{
    Connection, ConnectionListener, ConnectionOptions, Connector, Responder, TcpConnector,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Disconnected,
    Pending,
    Connecting,
    Connected,
    Closed,
}

struct Status {
    state: ConnectionState,
    /// Bumped by every `connect`; signals from older connections are ignored.
    generation: u64,
    connection: Option<Connection>,
}

struct Supervisor {
    config: ClientConfig,
    registry: Arc<HandlerRegistry>,
    connector: Arc<dyn Connector>,
    max_concurrent_handlers: usize,
    status: watch::Sender<Status>,
    /// Connection error nobody handled, returned by `wait_for_disconnect`.
    unhandled: Mutex<Option<ElarianError>>,
}

impl Supervisor {
    fn transition(&self, generation: u64, state: ConnectionState) -> bool {
        self.status.send_if_modified(|status| {
            if status.generation != generation || status.state == state {
                return false;
            }
            status.state = state;
            if state == ConnectionState::Closed {
                status.connection = None;
            }
            true
        })
    }

    fn fire(&self, event: &'static str) {
        if let Some(callback) = self.registry.lifecycle_handler(event) {
            tokio::task::spawn_blocking(move || callback());
        }
    }

    fn report_error(&self, error: ElarianError) {
        match self.registry.error_handler() {
            Some(callback) => {
                tokio::task::spawn_blocking(move || callback(error));
            }
            None => {
                tracing::error!("Unhandled connection error: {}", error);
                *self.unhandled.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.status.borrow().generation == generation
    }

    fn handshake(&self) -> Bytes {
        let config = &self.config;
        ProtoCodec::encode(&AppConnectionMetadata {
            org_id: config.org_id.clone(),
            app_id: config.app_id.clone(),
            api_key: Some(StringValue::new(config.api_key.clone())),
            auth_token: None,
            simplex_mode: config.simplex_mode(),
            simulator_mode: config.is_simulator,
        })
    }

    fn connection_options(&self) -> ConnectionOptions {
        ConnectionOptions {
            setup_data: self.handshake(),
            keepalive_interval: self.config.keepalive_interval,
            max_lifetime: self.config.max_lifetime,
            writer: self.config.writer_config(),
            max_concurrent_requests: self.max_concurrent_handlers,
        }
    }

    fn responder(self: &Arc<Self>) -> Option<Arc<dyn Responder>> {
        if self.config.simplex_mode() {
            return None;
        }
        let dispatcher = Dispatcher::new(self.registry.clone(), self.config.notification_timeout)
            .with_client(ClientHandle(Arc::downgrade(self)));
        Some(Arc::new(dispatcher))
    }

    /// Close out a connection attempt that never got a working connection.
    fn abort_attempt(&self, generation: u64, error: &ElarianError) {
        if !self.transition(generation, ConnectionState::Closed) {
            return;
        }
        self.report_error(copy_error(error));
        self.fire("closed");
    }
}

/// Connection-level errors are reported to the error handler and returned
/// to the caller.
fn copy_error(error: &ElarianError) -> ElarianError {
    match error {
        ElarianError::Io(e) => ElarianError::Io(std::io::Error::new(e.kind(), e.to_string())),
        ElarianError::Transport { code, message } => ElarianError::Transport {
            code: *code,
            message: message.clone(),
        },
        ElarianError::ConnectionClosed => ElarianError::ConnectionClosed,
        other => ElarianError::Protocol(other.to_string()),
    }
}

/// Lifecycle hook handed to one connection.
struct Listener {
    supervisor: Weak<Supervisor>,
    generation: u64,
}

impl ConnectionListener for Listener {
    fn on_connected(&self) {
        if let Some(supervisor) = self.supervisor.upgrade() {
            if supervisor.transition(self.generation, ConnectionState::Connected) {
                supervisor.fire("connected");
            }
        }
    }

    fn on_closed(&self) {
        if let Some(supervisor) = self.supervisor.upgrade() {
            if supervisor.transition(self.generation, ConnectionState::Closed) {
                supervisor.fire("closed");
            }
        }
    }

    fn on_error(&self, error: ElarianError) {
        match self.supervisor.upgrade() {
            Some(supervisor) if supervisor.is_current(self.generation) => {
                supervisor.report_error(error)
            }
            _ => tracing::debug!("Ignoring error from a stale connection: {}", error),
        }
    }
}

/// Weak reference from a connection's dispatcher back to its client.
#[derive(Clone)]
pub(crate) struct ClientHandle(Weak<Supervisor>);

impl ClientHandle {
    /// `None` once every client handle has been dropped.
    pub(crate) fn upgrade(&self) -> Option<Client> {
        self.0.upgrade().map(|supervisor| Client { supervisor })
    }
}

/// A connection to Elarian that only sends commands.
///
/// [`Elarian`] and [`Simulator`](crate::Simulator) deref to this type.
#[derive(Clone)]
pub struct Client {
    supervisor: Arc<Supervisor>,
}

impl Client {
    pub fn builder(config: ClientConfig) -> ClientBuilder<Client> {
        ClientBuilder::new(config)
    }

    /// Open the connection. A no-op while a connection is pending, connecting
    /// or connected.
    ///
    /// Returns once SETUP has been sent; the `connected` callback fires from
    /// the connection itself.
    pub async fn connect(&self) -> Result<()> {
        let supervisor = &self.supervisor;
        supervisor.config.validate()?;

        let mut generation = 0;
        let started = supervisor.status.send_if_modified(|status| match status.state {
            ConnectionState::Pending | ConnectionState::Connecting | ConnectionState::Connected => {
                false
            }
            ConnectionState::Disconnected | ConnectionState::Closed => {
                status.state = ConnectionState::Pending;
                status.generation += 1;
                status.connection = None;
                generation = status.generation;
                true
            }
        });
        if !started {
            tracing::debug!("connect() ignored, state is {:?}", self.state());
            return Ok(());
        }
        // errors of an earlier connection are not reported for this one
        supervisor
            .unhandled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        supervisor.fire("pending");

        let config = &supervisor.config;
        tracing::debug!("Connecting to {}:{}", config.host, config.port);
        let open = supervisor.connector.connect(&config.host, config.port);
        if supervisor.transition(generation, ConnectionState::Connecting) {
            supervisor.fire("connecting");
        }

        let stream = match open.await {
            Ok(stream) => stream,
            Err(e) => {
                supervisor.abort_attempt(generation, &e);
                return Err(e);
            }
        };

        let listener = Arc::new(Listener {
            supervisor: Arc::downgrade(supervisor),
            generation,
        });
        let connection = Connection::new(
            stream,
            supervisor.connection_options(),
            listener,
            supervisor.responder(),
        );

        let current = supervisor.status.send_if_modified(|status| {
            if status.generation != generation {
                return false;
            }
            status.connection = Some(connection.clone());
            true
        });
        if !current {
            connection.close().await;
            return Err(ElarianError::ConnectionClosed);
        }

        if let Err(e) = connection.start().await {
            supervisor.abort_attempt(generation, &e);
            return Err(e);
        }
        Ok(())
    }

    /// Close the connection and wait for the `closed` transition.
    /// A no-op unless connected.
    pub async fn disconnect(&self) {
        let connection = {
            let status = self.supervisor.status.borrow();
            if status.state != ConnectionState::Connected {
                return;
            }
            status.connection.clone()
        };
        if let Some(connection) = connection {
            connection.close().await;
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        self.supervisor.status.borrow().state
    }

    /// Send one encoded command and wait for the encoded reply.
    pub async fn send_command(&self, data: Bytes) -> Result<Bytes> {
        let connection = {
            let status = self.supervisor.status.borrow();
            match (&status.state, &status.connection) {
                (ConnectionState::Connected, Some(connection)) => connection.clone(),
                _ => return Err(ElarianError::NotConnected),
            }
        };
        connection.request_response(data).await
    }

    /// Wait until the connection is closed.
    ///
    /// Returns the connection error when no `error` handler was registered
    /// to receive it.
    pub async fn wait_for_disconnect(&self) -> Result<()> {
        let mut status = self.supervisor.status.subscribe();
        let _ = status
            .wait_for(|status| {
                matches!(
                    status.state,
                    ConnectionState::Closed | ConnectionState::Disconnected
                )
            })
            .await;

        let unhandled = self
            .supervisor
            .unhandled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match unhandled {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.supervisor.config
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.supervisor.registry.role()
    }

    pub(crate) fn handle(&self) -> ClientHandle {
        ClientHandle(Arc::downgrade(&self.supervisor))
    }
}

/// Implemented by the client flavours a [`ClientBuilder`] can produce.
pub trait FromClient: Sized {
    const ROLE: Role;

    fn from_client(client: Client) -> Self;
}

impl FromClient for Client {
    const ROLE: Role = Role::Client;

    fn from_client(client: Client) -> Self {
        client
    }
}

/// Builder for [`Client`], [`Elarian`] and [`Simulator`](crate::Simulator).
///
/// Handlers can only be registered here; the built client shares them
/// read-only with its dispatcher.
pub struct ClientBuilder<T> {
    config: ClientConfig,
    registry: HandlerRegistry,
    connector: Arc<dyn Connector>,
    max_concurrent_handlers: usize,
    _role: PhantomData<fn() -> T>,
}

impl<T: FromClient> ClientBuilder<T> {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            registry: HandlerRegistry::new(T::ROLE),
            connector: Arc::new(TcpConnector),
            max_concurrent_handlers: DEFAULT_MAX_CONCURRENT_REQUESTS,
            _role: PhantomData,
        }
    }

    /// Bind a handler to an event.
    ///
    /// Fails with `InvalidEvent` for events outside the role and with
    /// `InvalidHandler` when the handler shape does not fit the event.
    pub fn on(mut self, event: &str, handler: Handler) -> Result<Self> {
        self.registry.on(event, handler)?;
        Ok(self)
    }

    /// Bind an async notification handler.
    pub fn handle<F, Fut>(self, event: &str, handler: F) -> Result<Self>
    where
        F: Fn(Notification, NotificationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.on(event, Handler::notification(handler))
    }

    /// Use a custom connector instead of plain TCP.
    pub fn connector(mut self, connector: impl Connector) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Set maximum concurrent notification handlers.
    ///
    /// Default: 256
    pub fn max_concurrent_handlers(mut self, limit: usize) -> Self {
        self.max_concurrent_handlers = limit;
        self
    }

    /// Freeze the handlers and produce the client.
    ///
    /// Simulator mode picks the simulator envelopes, so only a
    /// [`Simulator`](crate::Simulator) may be built with it.
    pub fn build(self) -> Result<T> {
        let mut config = self.config;
        match T::ROLE {
            Role::Simulator => config.is_simulator = true,
            role if config.is_simulator => {
                return Err(ElarianError::Configuration(format!(
                    "simulator mode requires a Simulator client, not {:?}",
                    role
                )))
            }
            _ => {}
        }
        config.validate()?;

        let (status, _) = watch::channel(Status {
            state: ConnectionState::Disconnected,
            generation: 0,
            connection: None,
        });
        let client = Client {
            supervisor: Arc::new(Supervisor {
                config,
                registry: Arc::new(self.registry),
                connector: self.connector,
                max_concurrent_handlers: self.max_concurrent_handlers,
                status,
                unhandled: Mutex::new(None),
            }),
        };
        Ok(T::from_client(client))
    }
}

/// Full duplex app client: commands plus customer and purse notifications.
#[derive(Clone)]
pub struct Elarian {
    client: Client,
}

impl Elarian {
    pub fn builder(config: ClientConfig) -> ClientBuilder<Elarian> {
        ClientBuilder::new(config)
    }
}

impl FromClient for Elarian {
    const ROLE: Role = Role::App;

    fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Deref for Elarian {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{BoxFuture, BoxStream};
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Refused;

    impl Connector for Refused {
        fn connect(&self, _host: &str, _port: u16) -> BoxFuture<'static, Result<BoxStream>> {
            Box::pin(async {
                Err::<BoxStream, _>(ElarianError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "refused",
                )))
            })
        }
    }

    /// Refuses the first attempt, then hands out streams whose server end
    /// is already gone.
    #[derive(Default)]
    struct RefusedOnce {
        attempts: AtomicUsize,
    }

    impl Connector for RefusedOnce {
        fn connect(&self, _host: &str, _port: u16) -> BoxFuture<'static, Result<BoxStream>> {
            let result = match self.attempts.fetch_add(1, Ordering::SeqCst) {
                0 => Err(ElarianError::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "refused",
                ))),
                _ => {
                    let (client, _server) = tokio::io::duplex(1024);
                    Ok(Box::new(client) as BoxStream)
                }
            };
            Box::pin(async move { result })
        }
    }

    fn config() -> ClientConfig {
        ClientConfig::new("org", "app", "key").endpoint("localhost", 8082)
    }

    #[test]
    fn test_build_validates_config() {
        let result = Client::builder(ClientConfig::new("", "app", "key").endpoint("h", 1)).build();
        assert!(matches!(result, Err(ElarianError::Configuration(_))));
    }

    #[test]
    fn test_simulator_mode_requires_simulator_role() {
        let result = Elarian::builder(config().simulator(true)).build();
        assert!(matches!(result, Err(ElarianError::Configuration(_))));

        let result = Client::builder(config().simulator(true)).build();
        assert!(matches!(result, Err(ElarianError::Configuration(_))));

        let client = Client::builder(config()).build().unwrap();
        assert!(!client.config().is_simulator);
    }

    #[test]
    fn test_builder_rejects_unknown_event() {
        let result = Elarian::builder(config()).handle("dummy_event", |_, _| async { Ok(()) });
        match result {
            Err(ElarianError::InvalidEvent(event)) => assert_eq!(event, "dummy_event"),
            _ => panic!("expected InvalidEvent"),
        }
    }

    #[test]
    fn test_fresh_client_is_disconnected() {
        let client = Elarian::builder(config()).build().unwrap();
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert!(!client.is_connected());
        assert_eq!(client.role(), Role::App);
    }

    #[tokio::test]
    async fn test_send_command_requires_connection() {
        let client = Client::builder(config()).build().unwrap();
        let err = client.send_command(Bytes::from_static(b"x")).await.unwrap_err();
        assert!(matches!(err, ElarianError::NotConnected));
    }

    #[tokio::test]
    async fn test_disconnect_when_not_connected_is_noop() {
        let client = Client::builder(config()).build().unwrap();
        client.disconnect().await;
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_refused_connect_reports_error() {
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = errors.clone();
        let client = Client::builder(config())
            .connector(Refused)
            .on(
                "error",
                Handler::error(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap()
            .build()
            .unwrap();

        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, ElarianError::Io(_)));
        assert_eq!(client.state(), ConnectionState::Closed);

        // handled errors are not returned again
        assert!(client.wait_for_disconnect().await.is_ok());
        tokio::task::yield_now().await;
        for _ in 0..100 {
            if errors.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unhandled_connect_error_surfaces() {
        let client = Client::builder(config()).connector(Refused).build().unwrap();

        assert!(client.connect().await.is_err());
        assert!(matches!(
            client.wait_for_disconnect().await,
            Err(ElarianError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_reconnect_clears_stale_unhandled_error() {
        let client = Client::builder(config())
            .connector(RefusedOnce::default())
            .build()
            .unwrap();

        assert!(client.connect().await.is_err());
        assert_eq!(client.state(), ConnectionState::Closed);

        client.connect().await.unwrap();
        assert!(client.wait_for_disconnect().await.is_ok());
    }
}
