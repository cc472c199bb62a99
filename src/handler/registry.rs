//! Event registry: role-scoped event names bound to handlers.
//!
//! Every role accepts the lifecycle events (`pending`, `connecting`,
//! `connected`, `closed`, `error`). Apps add the customer and purse
//! notifications, simulators add the outbound events they observe.
//! Registering the same event twice keeps the last handler.
//!
//! # Example
//!
//! ```
//! use elarian::handler::{Handler, HandlerRegistry, NotificationReply, Role};
//!
//! let mut registry = HandlerRegistry::new(Role::App);
//!
//! registry
//!     .on("received_sms", Handler::notification(|_notification, ctx| async move {
//!         ctx.reply(NotificationReply::new()).map(|_| ())
//!     }))
//!     .unwrap();
//!
//! assert!(registry.on("dummy_event", Handler::lifecycle(|| {})).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{Notification, NotificationContext};
use crate::error::{ElarianError, Result};
use crate::transport::BoxFuture;

/// Result type for notification handlers.
pub type HandlerResult = Result<()>;

/// Connection lifecycle events, accepted by every role.
pub const LIFECYCLE_EVENTS: &[&str] = &["pending", "connecting", "connected", "closed", "error"];

/// Notifications delivered to apps.
pub const APP_EVENTS: &[&str] = &[
    "reminder",
    "messaging_session_started",
    "messaging_session_renewed",
    "messaging_session_ended",
    "messaging_consent_update",
    "received_sms",
    "received_fb_messenger",
    "received_telegram",
    "received_whatsapp",
    "received_email",
    "voice_call",
    "ussd_session",
    "message_status",
    "sent_message_reaction",
    "received_payment",
    "payment_status",
    "wallet_payment_status",
    "customer_activity",
];

/// Notifications delivered to simulators.
pub const SIMULATOR_EVENTS: &[&str] = &[
    "send_message",
    "make_voice_call",
    "send_customer_payment",
    "send_channel_payment",
    "checkout_payment",
];

/// Which kind of client a registry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Commands only, lifecycle events only.
    Client,
    App,
    Simulator,
}

impl Role {
    /// Business events of this role.
    pub fn events(self) -> &'static [&'static str] {
        match self {
            Role::Client => &[],
            Role::App => APP_EVENTS,
            Role::Simulator => SIMULATOR_EVENTS,
        }
    }

    pub fn allows(self, event: &str) -> bool {
        LIFECYCLE_EVENTS.contains(&event) || self.events().contains(&event)
    }
}

/// Handles one decoded notification.
pub trait NotificationHandler: Send + Sync + 'static {
    fn call(
        &self,
        notification: Notification,
        ctx: NotificationContext,
    ) -> BoxFuture<'static, HandlerResult>;
}

/// Adapter turning an async closure into a [`NotificationHandler`].
pub struct FnHandler<F, Fut> {
    handler: F,
    _phantom: PhantomData<fn() -> Fut>,
}

impl<F, Fut> FnHandler<F, Fut>
where
    F: Fn(Notification, NotificationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, Fut> NotificationHandler for FnHandler<F, Fut>
where
    F: Fn(Notification, NotificationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        notification: Notification,
        ctx: NotificationContext,
    ) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.handler)(notification, ctx))
    }
}

pub type LifecycleCallback = Arc<dyn Fn() + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(ElarianError) + Send + Sync>;

/// A handler of one of the three shapes events accept.
#[derive(Clone)]
pub enum Handler {
    /// `pending`, `connecting`, `connected`, `closed`.
    Lifecycle(LifecycleCallback),
    /// `error`.
    Error(ErrorCallback),
    /// Business events.
    Notification(Arc<dyn NotificationHandler>),
}

impl Handler {
    pub fn lifecycle<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Handler::Lifecycle(Arc::new(callback))
    }

    pub fn error<F>(callback: F) -> Self
    where
        F: Fn(ElarianError) + Send + Sync + 'static,
    {
        Handler::Error(Arc::new(callback))
    }

    pub fn notification<F, Fut>(handler: F) -> Self
    where
        F: Fn(Notification, NotificationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Handler::Notification(Arc::new(FnHandler::new(handler)))
    }

    fn kind(&self) -> &'static str {
        match self {
            Handler::Lifecycle(_) => "lifecycle",
            Handler::Error(_) => "error",
            Handler::Notification(_) => "notification",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}", self.kind())
    }
}

fn expected_kind(event: &str) -> &'static str {
    match event {
        "error" => "error",
        "pending" | "connecting" | "connected" | "closed" => "lifecycle",
        _ => "notification",
    }
}

/// Event name to handler bindings for one client.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    role: Role,
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            handlers: HashMap::new(),
        }
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Bind `handler` to `event`, replacing any earlier binding.
    pub fn on(&mut self, event: &str, handler: Handler) -> Result<()> {
        if !self.role.allows(event) {
            return Err(ElarianError::InvalidEvent(event.to_string()));
        }

        let expected = expected_kind(event);
        if handler.kind() != expected {
            return Err(ElarianError::InvalidHandler {
                event: event.to_string(),
                reason: format!("expected a {} handler, got a {} handler", expected, handler.kind()),
            });
        }

        if self.handlers.insert(event.to_string(), handler).is_some() {
            tracing::debug!("Replaced handler for {}", event);
        }
        Ok(())
    }

    pub fn get(&self, event: &str) -> Option<&Handler> {
        self.handlers.get(event)
    }

    pub fn notification_handler(&self, event: &str) -> Option<Arc<dyn NotificationHandler>> {
        match self.handlers.get(event) {
            Some(Handler::Notification(handler)) => Some(handler.clone()),
            _ => None,
        }
    }

    pub fn lifecycle_handler(&self, event: &str) -> Option<LifecycleCallback> {
        match self.handlers.get(event) {
            Some(Handler::Lifecycle(callback)) => Some(callback.clone()),
            _ => None,
        }
    }

    pub fn error_handler(&self) -> Option<ErrorCallback> {
        match self.handlers.get("error") {
            Some(Handler::Error(callback)) => Some(callback.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> Handler {
        Handler::notification(|_, _| async { Ok(()) })
    }

    #[test]
    fn test_register_every_app_event() {
        let mut registry = HandlerRegistry::new(Role::App);
        for event in APP_EVENTS {
            registry.on(event, noop()).unwrap();
        }
        assert_eq!(registry.len(), APP_EVENTS.len());
        assert!(registry.notification_handler("ussd_session").is_some());
    }

    #[test]
    fn test_unknown_event_rejected() {
        let mut registry = HandlerRegistry::new(Role::App);

        let err = registry.on("dummy_event", noop()).unwrap_err();
        assert!(matches!(err, ElarianError::InvalidEvent(_)));
        assert!(err.to_string().contains("dummy_event"));
        assert!(err.is_configuration());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_role_scoping() {
        let mut app = HandlerRegistry::new(Role::App);
        assert!(app.on("send_message", noop()).is_err());
        assert!(app.on("received_message", noop()).is_err());

        let mut simulator = HandlerRegistry::new(Role::Simulator);
        assert!(simulator.on("send_message", noop()).is_ok());
        assert!(simulator.on("received_sms", noop()).is_err());

        let mut client = HandlerRegistry::new(Role::Client);
        assert!(client.on("reminder", noop()).is_err());
        assert!(client.on("connected", Handler::lifecycle(|| {})).is_ok());
        assert!(client.on("error", Handler::error(|_| {})).is_ok());
    }

    #[test]
    fn test_handler_shape_mismatch() {
        let mut registry = HandlerRegistry::new(Role::App);

        let err = registry.on("connected", noop()).unwrap_err();
        assert!(matches!(err, ElarianError::InvalidHandler { .. }));

        assert!(registry.on("error", Handler::lifecycle(|| {})).is_err());
        assert!(registry.on("reminder", Handler::error(|_| {})).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_registration_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut registry = HandlerRegistry::new(Role::Client);
        let counter = first.clone();
        registry
            .on("connected", Handler::lifecycle(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        let counter = second.clone();
        registry
            .on("connected", Handler::lifecycle(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let callback = registry.lifecycle_handler("connected").unwrap();
        callback();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_shape() {
        let mut registry = HandlerRegistry::new(Role::App);
        registry.on("reminder", noop()).unwrap();
        registry.on("error", Handler::error(|_| {})).unwrap();

        assert!(registry.lifecycle_handler("reminder").is_none());
        assert!(registry.notification_handler("reminder").is_some());
        assert!(registry.error_handler().is_some());
        assert!(registry.notification_handler("payment_status").is_none());
    }
}
