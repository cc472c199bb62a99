//! Notification dispatcher.
//!
//! Turns one inbound REQUEST_RESPONSE into one reply:
//!
//! ```text
//! bytes ─► decode envelope ─► normalize ─► handler task ─┐
//!                                                        ├─► first reply wins ─► bytes
//!                                     deadline (15s) ────┘
//! ```
//!
//! Events without a handler are answered at once with the app data echoed.
//! A handler that fails, panics or never replies gets the same echo once the
//! deadline passes.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use prost_types::Timestamp;
use tokio::task::JoinHandle;

use crate::client::{ClientHandle, Elarian, FromClient};
use crate::codec::data::parse_data_value;
use crate::codec::notification::{
    normalize_customer_event, normalize_purse_event, normalize_simulator_event, NormalizedEvent,
};
use crate::codec::time::from_timestamp;
use crate::codec::ProtoCodec;
use crate::customer::Customer;
use crate::error::{ElarianError, Result};
use crate::handler::{
    Entity, HandlerRegistry, HandlerResult, Notification, NotificationContext, NotificationReply,
    ReplyShape, Role,
};
use crate::proto::{
    server_to_app_notification, DataMapValue, ServerToAppNotification,
    ServerToSimulatorNotification,
};
use crate::transport::{BoxFuture, Responder};
use crate::types::CustomerNumber;

/// Dispatches inbound notifications to the registered handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    timeout: Duration,
    client: Option<ClientHandle>,
}

impl Dispatcher {
    pub fn new(registry: Arc<HandlerRegistry>, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            client: None,
        }
    }

    /// Bind customers of app notifications to `client`.
    pub(crate) fn with_client(mut self, client: ClientHandle) -> Self {
        self.client = Some(client);
        self
    }

    /// The notification's customer bound to the app client, if there is one.
    fn customer(&self, notification: &Notification) -> Option<Customer> {
        let Entity::Customer { customer_id } = &notification.entity else {
            return None;
        };
        if self.registry.role() != Role::App {
            return None;
        }
        let client = Elarian::from_client(self.client.as_ref()?.upgrade()?);
        let number = serde_json::from_value::<CustomerNumber>(
            notification.payload["customer_number"].clone(),
        )
        .ok();

        // an unknown provider still leaves the id to address the customer
        let customer = Customer::new(&client, Some(customer_id.clone()), number)
            .or_else(|_| Customer::new(&client, Some(customer_id.clone()), None));
        match customer {
            Ok(customer) => Some(customer),
            Err(e) => {
                tracing::debug!("No customer for {}: {}", notification.event, e);
                None
            }
        }
    }

    /// Decode `data`, run the handler and return the encoded reply.
    ///
    /// Only decoding fails; once a notification is decoded a reply is
    /// always produced.
    pub async fn dispatch(&self, data: Bytes) -> Result<Bytes> {
        let (notification, shape) = match self.registry.role() {
            Role::Simulator => decode_simulator(&data)?,
            Role::App | Role::Client => decode_app(&data)?,
        };
        tracing::debug!("Dispatching {}", notification.event);
        self.run(notification, shape).await
    }

    async fn run(&self, notification: Notification, shape: ReplyShape) -> Result<Bytes> {
        let event = notification.event.clone();
        let (mut ctx, mut rx) = NotificationContext::new(&event, shape);
        if let Some(customer) = self.customer(&notification) {
            ctx = ctx.with_customer(customer);
        }

        match self.registry.notification_handler(&event) {
            Some(handler) => {
                let handler_ctx = ctx.clone();
                let task = tokio::spawn(async move { handler.call(notification, handler_ctx).await });
                tokio::spawn(report_fault(event.clone(), task));
            }
            None => {
                tracing::debug!("No handler for {}, echoing app data", event);
                ctx.reply(NotificationReply::default())?;
            }
        }

        if let Ok(Ok(reply)) = tokio::time::timeout(self.timeout, &mut rx).await {
            return Ok(reply);
        }

        if ctx.reply(NotificationReply::default())? {
            tracing::warn!(
                "Handler for {} did not reply within {:?}, sent default reply",
                event,
                self.timeout
            );
        }
        rx.await
            .map_err(|_| ElarianError::Protocol(format!("Reply to {} was lost", event)))
    }
}

impl Responder for Dispatcher {
    fn request_response(&self, data: Bytes) -> BoxFuture<'static, Result<Bytes>> {
        let dispatcher = self.clone();
        Box::pin(async move { dispatcher.dispatch(data).await })
    }
}

/// Log handler failures. They never reach the transport.
async fn report_fault(event: String, task: JoinHandle<HandlerResult>) {
    let fault = match task.await {
        Ok(Ok(())) => return,
        Ok(Err(e)) => e.to_string(),
        Err(join) if join.is_panic() => "handler panicked".to_string(),
        Err(join) => join.to_string(),
    };
    let fault = ElarianError::HandlerFault {
        event,
        message: fault,
    };
    tracing::error!("{}", fault);
}

fn build(
    (event, payload): NormalizedEvent,
    entity: Entity,
    app_data: Option<&DataMapValue>,
    org_id: Option<String>,
    app_id: Option<String>,
    created_at: Option<&Timestamp>,
) -> Notification {
    Notification {
        event,
        payload,
        entity,
        app_data: app_data.map(parse_data_value),
        org_id,
        app_id,
        created_at: created_at.and_then(from_timestamp),
    }
}

fn decode_app(data: &[u8]) -> Result<(Notification, ReplyShape)> {
    let envelope: ServerToAppNotification = ProtoCodec::decode(data)?;

    match envelope.entry {
        Some(server_to_app_notification::Entry::Customer(n)) => {
            let entry = n
                .entry
                .as_ref()
                .ok_or_else(|| ElarianError::Protocol("Empty customer notification".to_string()))?;
            let notification = build(
                normalize_customer_event(entry)?,
                Entity::Customer {
                    customer_id: n.customer_id.clone(),
                },
                n.app_data.as_ref(),
                Some(n.org_id.clone()),
                Some(n.app_id.clone()),
                n.created_at.as_ref(),
            );
            Ok((notification, ReplyShape::App { original: n.app_data }))
        }
        Some(server_to_app_notification::Entry::Purse(n)) => {
            let entry = n
                .entry
                .as_ref()
                .ok_or_else(|| ElarianError::Protocol("Empty purse notification".to_string()))?;
            let notification = build(
                normalize_purse_event(entry)?,
                Entity::Purse {
                    purse_id: n.purse_id.clone(),
                },
                n.app_data.as_ref(),
                Some(n.org_id.clone()),
                Some(n.app_id.clone()),
                n.created_at.as_ref(),
            );
            Ok((notification, ReplyShape::App { original: n.app_data }))
        }
        None => Err(ElarianError::Protocol("Empty notification".to_string())),
    }
}

fn decode_simulator(data: &[u8]) -> Result<(Notification, ReplyShape)> {
    let envelope: ServerToSimulatorNotification = ProtoCodec::decode(data)?;
    let entry = envelope
        .entry
        .as_ref()
        .ok_or_else(|| ElarianError::Protocol("Empty simulator notification".to_string()))?;

    let normalized = normalize_simulator_event(entry)?;
    let org_id = normalized.1["org_id"].as_str().map(str::to_string);
    let app_id = normalized.1["app_id"].as_str().map(str::to_string);
    let notification = build(normalized, Entity::Simulator, None, org_id, app_id, None);
    Ok((notification, ReplyShape::Simulator))
}
