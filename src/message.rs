//! Messages exchanged with customers.
//!
//! [`Message`] is what an app sends (or replies with); [`InboundPart`] is what
//! a simulated customer sends. Both are plain serde types, so they can also be
//! built from JSON:
//!
//! ```
//! use elarian::message::{Message, MessageBody};
//!
//! let message: Message = serde_json::from_str(r#"{"body": {"text": "Hello"}}"#).unwrap();
//! assert_eq!(message.body, MessageBody::Text("Hello".to_string()));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChannelNumber, CustomerNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_prompt: Option<ReplyPrompt>,
    pub body: MessageBody,
}

impl Message {
    pub fn new(body: MessageBody) -> Self {
        Self {
            labels: Vec::new(),
            provider_tag: None,
            reply_token: None,
            reply_prompt: None,
            body,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(MessageBody::Text(text.into()))
    }

    pub fn ussd(text: impl Into<String>, is_terminal: bool) -> Self {
        Self::new(MessageBody::Ussd(UssdMenu {
            text: text.into(),
            is_terminal,
        }))
    }

    pub fn voice(actions: Vec<VoiceAction>) -> Self {
        Self::new(MessageBody::Voice(actions))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageBody {
    Text(String),
    Url(String),
    Ussd(UssdMenu),
    Media(Media),
    Location(Location),
    Template(Template),
    Email(Email),
    Voice(Vec<VoiceAction>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UssdMenu {
    pub text: String,
    #[serde(default)]
    pub is_terminal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    /// Media type name: `image`, `audio`, `video`, ...
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Email {
    pub subject: String,
    #[serde(default)]
    pub plain: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyPrompt {
    /// Expected reply kind: `text`, `phone_number`, `email`, `location`, `url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub menu: Vec<PromptMenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMenuItem {
    Text(String),
    Media(Media),
}

/// One step of a voice call dialplan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceAction {
    Say(Say),
    Play(Play),
    GetDigits(GetDigits),
    GetRecording(GetRecording),
    Dial(Dial),
    RecordSession,
    Enqueue(Enqueue),
    Dequeue(Dequeue),
    Reject,
    Redirect(Redirect),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Say {
    pub text: String,
    /// `male` or `female`; female when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_beep: Option<bool>,
}

impl Say {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            play_beep: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetDigits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub say: Option<Say>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<Play>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_on_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_digits: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetRecording {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub say: Option<Say>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<Play>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_on_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_beep: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_silence: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dial {
    pub customer_numbers: Vec<CustomerNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequential: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ringback_tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caller_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enqueue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_music: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dequeue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_number: Option<ChannelNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    pub url: String,
}

/// One part of a message received from a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundPart {
    Text(String),
    Ussd(UssdInput),
    Media(Media),
    Location(Location),
    Email(Email),
    Voice(VoiceInput),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UssdInput {
    /// `active`, `incomplete`, `completed` or `app_error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hangup_cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtmf_digits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dial_data: Option<DialInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_data: Option<QueueInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialInput {
    pub destination_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enqueued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dequeued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dequeued_to_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dequeued_to_session_id: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_duration: Option<f64>,
}
