//! Customer-facing value types and command replies.
//!
//! Enum-valued fields (providers, channels, statuses) are carried as their
//! short names, e.g. `"cellular"` or `"SMS"`, and are checked against the
//! wire schema when a command is built.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::Message;

/// A customer's phone number, email address or platform handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerNumber {
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
}

impl CustomerNumber {
    pub fn new(number: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            provider: Some(provider.into()),
            partition: None,
        }
    }
}

/// A channel endpoint owned by the app: short code, sender id, wallet number...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelNumber {
    pub channel: String,
    pub number: String,
}

impl ChannelNumber {
    pub fn new(channel: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            number: number.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cash {
    pub currency_code: String,
    pub amount: f64,
}

impl Cash {
    pub fn new(currency_code: impl Into<String>, amount: f64) -> Self {
        Self {
            currency_code: currency_code.into(),
            amount,
        }
    }
}

/// Key/value index attached to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expires_at: None,
        }
    }
}

/// Secondary ids share the tag shape.
pub type SecondaryId = Tag;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub key: String,
    pub remind_at: Option<DateTime<Utc>>,
    /// Repeat interval in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Reminder {
    pub fn new(key: impl Into<String>, remind_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            remind_at: Some(remind_at),
            interval: None,
            payload: None,
        }
    }
}

/// A web or mobile activity reported for a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub session_id: String,
    pub key: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Activity {
    pub fn new(session_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            key: key.into(),
            properties: HashMap::new(),
        }
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Identity state returned by `get_state`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerState {
    pub customer_id: String,
    pub customer_numbers: Vec<CustomerNumber>,
    pub tags: Vec<Tag>,
    pub secondary_ids: Vec<SecondaryId>,
    pub reminders: Vec<Reminder>,
    pub metadata: HashMap<String, Value>,
}

/// Reply to a command that updates customer state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub description: String,
    pub customer_id: Option<String>,
}

/// Reply to an app data update, lease or delete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppDataReply {
    pub description: String,
    pub customer_id: Option<String>,
    pub value: Option<Value>,
}

/// Reply to `send_message` and `reply_to_message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageReply {
    pub status: String,
    pub description: String,
    pub customer_id: Option<String>,
    pub message_id: Option<String>,
    pub session_id: Option<String>,
}

/// Reply to a messaging consent update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentReply {
    pub status: String,
    pub description: String,
    pub customer_id: Option<String>,
}

/// Reply to a simulator command. Carries the app's answer when the simulated
/// message triggered one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatorReply {
    pub description: String,
    pub message: Option<Message>,
}
