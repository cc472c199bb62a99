//! Notification values and the single-use reply context.
//!
//! A [`NotificationContext`] wraps one reply slot. The first
//! [`reply`](NotificationContext::reply) wins; later calls, and the deadline
//! fallback after a reply, have no effect.
//!
//! On an [`Elarian`](crate::Elarian) client the context of a customer
//! notification also carries the [`Customer`] it came from, bound to the
//! client, so handlers can issue commands.
//!
//! # Example
//!
//! ```ignore
//! async fn on_sms(notification: Notification, ctx: NotificationContext) -> Result<()> {
//!     let text = notification.payload["text"].as_str().unwrap_or_default();
//!     ctx.reply(NotificationReply::new().message(Message::text(format!("You said {}", text))))?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::codec::data::json_data_value;
use crate::codec::outbound::serialize_message;
use crate::codec::ProtoCodec;
use crate::customer::Customer;
use crate::error::Result;
use crate::message::Message;
use crate::proto::{
    AppDataUpdate, DataMapValue, ServerToAppNotificationReply, ServerToSimulatorNotificationReply,
};

/// What a notification is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Customer { customer_id: String },
    Purse { purse_id: String },
    /// Simulator notifications name the customer inside the payload.
    Simulator,
}

/// A decoded server notification.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Event name after refinement, e.g. `received_sms`.
    pub event: String,
    /// Normalized event fields.
    pub payload: Value,
    pub entity: Entity,
    /// App data attached to the entity, parsed as JSON when possible.
    pub app_data: Option<Value>,
    pub org_id: Option<String>,
    pub app_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// What a handler sends back.
///
/// Without `data_update` the app data that came with the notification is
/// echoed unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationReply {
    pub message: Option<Message>,
    pub data_update: Option<Value>,
}

impl NotificationReply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `message` to the customer the notification came from.
    pub fn message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    /// Replace the app data.
    pub fn data(mut self, data: Value) -> Self {
        self.data_update = Some(data);
        self
    }
}

/// Wire shape of the reply, fixed by the client role.
#[derive(Debug, Clone)]
pub(crate) enum ReplyShape {
    App { original: Option<DataMapValue> },
    Simulator,
}

impl ReplyShape {
    pub(crate) fn encode(&self, reply: &NotificationReply) -> Result<Bytes> {
        match self {
            ReplyShape::Simulator => Ok(ProtoCodec::encode(&ServerToSimulatorNotificationReply {})),
            ReplyShape::App { original } => {
                let data = match &reply.data_update {
                    Some(update) => Some(json_data_value(update)?),
                    None => original.clone(),
                };
                let message = reply.message.as_ref().map(serialize_message).transpose()?;
                Ok(ProtoCodec::encode(&ServerToAppNotificationReply {
                    data_update: data.map(|data| AppDataUpdate { data: Some(data) }),
                    message,
                }))
            }
        }
    }
}

type ReplySlot = Arc<Mutex<Option<oneshot::Sender<Bytes>>>>;

/// Reply handle passed to notification handlers. Cheap to clone.
#[derive(Clone)]
pub struct NotificationContext {
    event: Arc<str>,
    shape: Arc<ReplyShape>,
    slot: ReplySlot,
    customer: Option<Arc<Customer>>,
}

impl NotificationContext {
    pub(crate) fn new(event: &str, shape: ReplyShape) -> (Self, oneshot::Receiver<Bytes>) {
        let (tx, rx) = oneshot::channel();
        let ctx = Self {
            event: Arc::from(event),
            shape: Arc::new(shape),
            slot: Arc::new(Mutex::new(Some(tx))),
            customer: None,
        };
        (ctx, rx)
    }

    pub(crate) fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(Arc::new(customer));
        self
    }

    /// Event this context replies to.
    #[inline]
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The customer behind a customer notification, ready for commands.
    ///
    /// `None` for purse and simulator notifications and on clients that
    /// only send commands.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_deref()
    }

    /// Send the reply.
    ///
    /// Returns `Ok(false)` when a reply was already sent (by an earlier call
    /// or by the deadline). A message that cannot be encoded fails with the
    /// encoding error and leaves the reply unsent.
    pub fn reply(&self, reply: NotificationReply) -> Result<bool> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            tracing::debug!("Ignoring second reply to {}", self.event);
            return Ok(false);
        }

        let encoded = self.shape.encode(&reply)?;
        match slot.take() {
            Some(tx) => Ok(tx.send(encoded).is_ok()),
            None => Ok(false),
        }
    }

    /// True once a reply has been sent.
    pub fn is_replied(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::data::parse_data_value;
    use crate::error::ElarianError;
    use crate::message::{Media, MessageBody};
    use serde_json::json;

    fn original() -> Option<DataMapValue> {
        Some(json_data_value(&json!({"step": 1})).unwrap())
    }

    #[test]
    fn test_first_reply_wins() {
        let (ctx, mut rx) = NotificationContext::new("received_sms", ReplyShape::App {
            original: original(),
        });

        assert!(ctx
            .reply(NotificationReply::new().data(json!({"step": 2})))
            .unwrap());
        assert!(!ctx
            .reply(NotificationReply::new().data(json!({"step": 3})))
            .unwrap());
        assert!(ctx.is_replied());

        let bytes = rx.try_recv().unwrap();
        let reply: ServerToAppNotificationReply = ProtoCodec::decode(&bytes).unwrap();
        let data = reply.data_update.unwrap().data.unwrap();
        assert_eq!(parse_data_value(&data), json!({"step": 2}));
    }

    #[test]
    fn test_default_reply_echoes_app_data() {
        let (ctx, mut rx) = NotificationContext::new("reminder", ReplyShape::App {
            original: original(),
        });
        ctx.reply(NotificationReply::new()).unwrap();

        let reply: ServerToAppNotificationReply =
            ProtoCodec::decode(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(reply.data_update.unwrap().data, original());
        assert!(reply.message.is_none());
    }

    #[test]
    fn test_reply_with_message() {
        let (ctx, mut rx) =
            NotificationContext::new("ussd_session", ReplyShape::App { original: None });
        ctx.reply(NotificationReply::new().message(Message::ussd("Welcome", false)))
            .unwrap();

        let reply: ServerToAppNotificationReply =
            ProtoCodec::decode(&rx.try_recv().unwrap()).unwrap();
        assert!(reply.message.unwrap().body.is_some());
        assert!(reply.data_update.is_none());
    }

    #[test]
    fn test_invalid_message_keeps_slot_open() {
        let (ctx, _rx) = NotificationContext::new("received_sms", ReplyShape::App {
            original: None,
        });
        let bad = Message::new(MessageBody::Media(Media {
            url: "https://example.com/a.png".to_string(),
            media_type: Some("hologram".to_string()),
        }));

        let err = ctx.reply(NotificationReply::new().message(bad)).unwrap_err();
        assert!(matches!(err, ElarianError::InvalidKey { .. }));
        assert!(!ctx.is_replied());
        assert!(ctx.reply(NotificationReply::new()).unwrap());
    }

    #[test]
    fn test_simulator_reply_is_empty() {
        let (ctx, mut rx) = NotificationContext::new("send_message", ReplyShape::Simulator);
        ctx.reply(NotificationReply::new().data(json!({"ignored": true})))
            .unwrap();
        assert!(rx.try_recv().unwrap().is_empty());
    }
}
