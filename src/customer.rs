//! Customer commands.
//!
//! A [`Customer`] is addressed by its Elarian id, its number, or both. State
//! commands target the id when it is known and the number otherwise;
//! messaging and activity commands always need the number.
//!
//! # Example
//!
//! ```no_run
//! use elarian::types::{ChannelNumber, Tag};
//! use elarian::message::Message;
//! use elarian::{ClientConfig, Elarian};
//!
//! # async fn run() -> elarian::Result<()> {
//! let client = Elarian::builder(ClientConfig::from_env()?).build()?;
//! client.connect().await?;
//!
//! let customer = client.customer_by_number("+254711000000", "cellular")?;
//! customer.update_tags(&[Tag::new("tier", "gold")]).await?;
//! customer
//!     .send_message(&ChannelNumber::new("sms", "21356"), &Message::text("Karibu!"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use crate::client::Elarian;
use crate::codec::data::{json_data_value, parse_data_value};
use crate::codec::numbers::{
    activity_channel_number, customer_number, customer_number_from_wire, messaging_channel_number,
};
use crate::codec::outbound::serialize_message;
use crate::codec::time::{duration_secs, from_timestamp, to_duration, to_timestamp};
use crate::codec::{enum_label, enum_value_for_name, valid_names};
use crate::correlator::unexpected_reply;
use crate::error::{ElarianError, Result};
use crate::message::Message;
use crate::proto::{
    self, adopt_customer_state_command::OtherCustomer, app_to_server_command::Entry as Command,
    app_to_server_command_reply::Entry as Reply, CustomerIndex, CustomerNumberProvider,
    CustomerReminder, CustomerStateReplyData, CustomerTarget, IndexMapping, MessageDeliveryStatus,
    MessagingConsentUpdate, MessagingConsentUpdateStatus, StringValue,
};
use crate::types::{
    Activity, AppDataReply, ChannelNumber, CommandReply, ConsentReply, CustomerNumber,
    CustomerState, MessageReply, Reminder, SecondaryId, Tag,
};

const DEFAULT_CONSENT_ACTION: &str = "ALLOW";

/// One customer of the app, bound to a connected [`Elarian`] client.
pub struct Customer {
    client: Elarian,
    id: OnceLock<String>,
    number: Option<CustomerNumber>,
    wire_number: Option<proto::CustomerNumber>,
}

impl Customer {
    /// Bind a customer to `client`.
    ///
    /// # Errors
    ///
    /// [`ElarianError::Configuration`] when neither an id nor a number is
    /// given, [`ElarianError::InvalidKey`] for an unknown provider.
    pub fn new(
        client: &Elarian,
        id: Option<String>,
        number: Option<CustomerNumber>,
    ) -> Result<Self> {
        let id = id.filter(|id| !id.is_empty());
        let number = number.filter(|number| !number.number.is_empty());
        if id.is_none() && number.is_none() {
            return Err(ElarianError::Configuration(
                "id or number must be provided".to_string(),
            ));
        }

        let wire_number = number.as_ref().map(validated_number).transpose()?;
        let cell = OnceLock::new();
        if let Some(id) = id {
            let _ = cell.set(id);
        }

        Ok(Self {
            client: client.clone(),
            id: cell,
            number,
            wire_number,
        })
    }

    /// Elarian id, once given or resolved.
    pub fn id(&self) -> Option<&str> {
        self.id.get().map(String::as_str)
    }

    pub fn number(&self) -> Option<&CustomerNumber> {
        self.number.as_ref()
    }

    pub async fn get_state(&self) -> Result<CustomerState> {
        let command = proto::GetCustomerStateCommand {
            customer: self.target(),
        };
        match self.client.send_app(Command::GetCustomerState(command)).await? {
            Reply::GetCustomerState(reply) => customer_state(reply.data.unwrap_or_default()),
            other => Err(unexpected_reply("get_customer_state", &other)),
        }
    }

    pub async fn get_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.get_state().await?.tags)
    }

    pub async fn update_tags(&self, tags: &[Tag]) -> Result<CommandReply> {
        let command = proto::UpdateCustomerTagCommand {
            customer: self.target(),
            updates: indexes("tags", tags)?,
        };
        self.update(Command::UpdateCustomerTag(command)).await
    }

    pub async fn delete_tags<I, K>(&self, keys: I) -> Result<CommandReply>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let command = proto::DeleteCustomerTagCommand {
            customer: self.target(),
            deletions: keys.into_iter().map(Into::into).collect(),
        };
        self.update(Command::DeleteCustomerTag(command)).await
    }

    /// Schedule a reminder. Both `key` and `remind_at` are required.
    pub async fn add_reminder(&self, reminder: &Reminder) -> Result<CommandReply> {
        let command = proto::AddCustomerReminderCommand {
            customer: self.target(),
            reminder: Some(reminder_to_wire(reminder)?),
        };
        self.update(Command::AddCustomerReminder(command)).await
    }

    pub async fn cancel_reminder(&self, key: &str) -> Result<CommandReply> {
        let command = proto::CancelCustomerReminderCommand {
            customer: self.target(),
            key: key.to_string(),
        };
        self.update(Command::CancelCustomerReminder(command)).await
    }

    pub async fn get_secondary_ids(&self) -> Result<Vec<SecondaryId>> {
        Ok(self.get_state().await?.secondary_ids)
    }

    pub async fn update_secondary_ids(&self, ids: &[SecondaryId]) -> Result<CommandReply> {
        let command = proto::UpdateCustomerSecondaryIdCommand {
            customer: self.target(),
            updates: indexes("secondary_ids", ids)?,
        };
        self.update(Command::UpdateCustomerSecondaryId(command)).await
    }

    pub async fn delete_secondary_ids(&self, ids: &[SecondaryId]) -> Result<CommandReply> {
        let deletions = indexes("secondary_ids", ids)?
            .into_iter()
            .filter_map(|index| index.mapping)
            .collect();
        let command = proto::DeleteCustomerSecondaryIdCommand {
            customer: self.target(),
            deletions,
        };
        self.update(Command::DeleteCustomerSecondaryId(command)).await
    }

    /// Metadata values, parsed as JSON where possible.
    pub async fn get_metadata(&self) -> Result<HashMap<String, Value>> {
        Ok(self.get_state().await?.metadata)
    }

    pub async fn update_metadata(&self, data: &HashMap<String, Value>) -> Result<CommandReply> {
        let updates = data
            .iter()
            .map(|(key, value)| json_data_value(value).map(|value| (key.clone(), value)))
            .collect::<Result<HashMap<_, _>>>()?;
        let command = proto::UpdateCustomerMetadataCommand {
            customer: self.target(),
            updates,
        };
        self.update(Command::UpdateCustomerMetadata(command)).await
    }

    pub async fn delete_metadata<I, K>(&self, keys: I) -> Result<CommandReply>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let command = proto::DeleteCustomerMetadataCommand {
            customer: self.target(),
            deletions: keys.into_iter().map(Into::into).collect(),
        };
        self.update(Command::DeleteCustomerMetadata(command)).await
    }

    pub async fn update_app_data(&self, data: &Value) -> Result<AppDataReply> {
        let command = proto::UpdateCustomerAppDataCommand {
            customer: self.target(),
            update: Some(json_data_value(data)?),
        };
        self.app_data(Command::UpdateCustomerAppData(command)).await
    }

    pub async fn delete_app_data(&self) -> Result<AppDataReply> {
        let command = proto::DeleteCustomerAppDataCommand {
            customer: self.target(),
        };
        self.app_data(Command::DeleteCustomerAppData(command)).await
    }

    /// Read the app data and lease it to this app.
    pub async fn lease_app_data(&self) -> Result<AppDataReply> {
        let command = proto::LeaseCustomerAppDataCommand {
            customer: self.target(),
        };
        self.app_data(Command::LeaseCustomerAppData(command)).await
    }

    pub async fn update_activity(
        &self,
        channel: &ChannelNumber,
        activity: &Activity,
    ) -> Result<CommandReply> {
        let customer_number = self.require_number()?;
        if activity.session_id.is_empty() || activity.key.is_empty() {
            return Err(ElarianError::Configuration(
                "activity requires a session_id and a key".to_string(),
            ));
        }
        let command = proto::CustomerActivityCommand {
            customer_number: Some(customer_number),
            channel_number: Some(activity_channel_number(channel)?),
            session_id: activity.session_id.clone(),
            key: activity.key.clone(),
            properties: activity.properties.clone(),
        };
        self.update(Command::CustomerActivity(command)).await
    }

    pub async fn send_message(
        &self,
        channel: &ChannelNumber,
        message: &Message,
    ) -> Result<MessageReply> {
        let command = proto::SendMessageCommand {
            customer_number: Some(self.require_number()?),
            channel_number: Some(messaging_channel_number(channel)?),
            message: Some(serialize_message(message)?),
        };
        message_reply(self.client.send_app(Command::SendMessage(command)).await?)
    }

    /// Reply to an inbound message. Resolves the customer id first when only
    /// the number is known.
    pub async fn reply_to_message(&self, message_id: &str, message: &Message) -> Result<MessageReply> {
        let message = serialize_message(message)?;
        let customer_id = self.resolve_id().await?;
        let command = proto::ReplyToMessageCommand {
            customer_id,
            message_id: message_id.to_string(),
            message: Some(message),
        };
        message_reply(self.client.send_app(Command::ReplyToMessage(command)).await?)
    }

    /// Merge `other`'s state into this customer. Resolves this customer's id
    /// first when only the number is known.
    pub async fn adopt_state(&self, other: &Customer) -> Result<CommandReply> {
        let other_customer = match (other.id(), &other.wire_number, &other.number) {
            (Some(id), _, _) => OtherCustomer::OtherCustomerId(id.to_string()),
            (None, Some(wire), Some(number)) => {
                let mut wire = wire.clone();
                if number.provider.is_none() {
                    wire.provider = CustomerNumberProvider::Cellular.into();
                }
                OtherCustomer::OtherCustomerNumber(wire)
            }
            _ => {
                return Err(ElarianError::Configuration(
                    "Missing other customer id or number".to_string(),
                ))
            }
        };

        let customer_id = self.resolve_id().await?;
        let command = proto::AdoptCustomerStateCommand {
            customer_id,
            other_customer: Some(other_customer),
        };
        self.update(Command::AdoptCustomerState(command)).await
    }

    /// Allow or block messaging on `channel`. `action` defaults to `ALLOW`.
    pub async fn update_messaging_consent(
        &self,
        channel: &ChannelNumber,
        action: Option<&str>,
    ) -> Result<ConsentReply> {
        let command = proto::UpdateMessagingConsentCommand {
            customer_number: Some(self.require_number()?),
            channel_number: Some(messaging_channel_number(channel)?),
            update: enum_value_for_name::<MessagingConsentUpdate>(
                action.unwrap_or(DEFAULT_CONSENT_ACTION),
            )?,
        };
        match self
            .client
            .send_app(Command::UpdateMessagingConsent(command))
            .await?
        {
            Reply::UpdateMessagingConsent(reply) => Ok(ConsentReply {
                status: enum_label::<MessagingConsentUpdateStatus>(reply.status)?,
                description: reply.description,
                customer_id: string_value(reply.customer_id),
            }),
            other => Err(unexpected_reply("update_messaging_consent", &other)),
        }
    }

    fn target(&self) -> Option<CustomerTarget> {
        match self.id.get() {
            Some(id) => Some(CustomerTarget::CustomerId(id.clone())),
            None => self.wire_number.clone().map(CustomerTarget::CustomerNumber),
        }
    }

    fn require_number(&self) -> Result<proto::CustomerNumber> {
        self.wire_number
            .clone()
            .ok_or_else(|| ElarianError::Configuration("Customer number not set".to_string()))
    }

    async fn resolve_id(&self) -> Result<String> {
        if let Some(id) = self.id.get() {
            return Ok(id.clone());
        }
        let state = self.get_state().await?;
        if state.customer_id.is_empty() {
            return Err(ElarianError::Protocol(
                "Customer state carried no customer id".to_string(),
            ));
        }
        tracing::debug!("Resolved customer id {}", state.customer_id);
        Ok(self.id.get_or_init(|| state.customer_id).clone())
    }

    async fn update(&self, command: Command) -> Result<CommandReply> {
        match self.client.send_app(command).await? {
            Reply::UpdateCustomerState(reply) => Ok(CommandReply {
                description: reply.description,
                customer_id: string_value(reply.customer_id),
            }),
            other => Err(unexpected_reply("update_customer_state", &other)),
        }
    }

    async fn app_data(&self, command: Command) -> Result<AppDataReply> {
        match self.client.send_app(command).await? {
            Reply::UpdateCustomerAppData(reply) => Ok(AppDataReply {
                description: reply.description,
                customer_id: string_value(reply.customer_id),
                value: reply.value.as_ref().map(parse_data_value),
            }),
            other => Err(unexpected_reply("update_customer_app_data", &other)),
        }
    }
}

impl fmt::Debug for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id.get())
            .field("number", &self.number)
            .finish()
    }
}

impl Elarian {
    /// Bind a customer known by id, number, or both.
    pub fn customer(&self, id: Option<String>, number: Option<CustomerNumber>) -> Result<Customer> {
        Customer::new(self, id, number)
    }

    pub fn customer_by_id(&self, id: impl Into<String>) -> Result<Customer> {
        Customer::new(self, Some(id.into()), None)
    }

    pub fn customer_by_number(
        &self,
        number: impl Into<String>,
        provider: impl Into<String>,
    ) -> Result<Customer> {
        Customer::new(self, None, Some(CustomerNumber::new(number, provider)))
    }
}

/// Wire number with the provider checked. `UNSPECIFIED` is not a provider.
fn validated_number(number: &CustomerNumber) -> Result<proto::CustomerNumber> {
    let wire = customer_number(number)?;
    let unspecified: i32 = CustomerNumberProvider::Unspecified.into();
    match &number.provider {
        Some(provider) if wire.provider == unspecified => Err(ElarianError::InvalidKey {
            key: provider.clone(),
            valid: valid_names::<CustomerNumberProvider>(),
        }),
        _ => Ok(wire),
    }
}

fn string_value(value: Option<StringValue>) -> Option<String> {
    value.map(|value| value.value)
}

fn indexes(name: &str, entries: &[Tag]) -> Result<Vec<CustomerIndex>> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            if entry.key.is_empty() || entry.value.is_empty() {
                return Err(ElarianError::Configuration(format!(
                    "{}[{}] is missing a key or value",
                    name, idx
                )));
            }
            Ok(CustomerIndex {
                mapping: Some(IndexMapping {
                    key: entry.key.clone(),
                    value: Some(StringValue::new(entry.value.clone())),
                }),
                expires_at: entry.expires_at.as_ref().map(to_timestamp),
            })
        })
        .collect()
}

fn index_entry(index: &CustomerIndex) -> Tag {
    let mapping = index.mapping.clone().unwrap_or_default();
    Tag {
        key: mapping.key,
        value: string_value(mapping.value).unwrap_or_default(),
        expires_at: index.expires_at.as_ref().and_then(from_timestamp),
    }
}

fn reminder_to_wire(reminder: &Reminder) -> Result<CustomerReminder> {
    let remind_at = match &reminder.remind_at {
        Some(remind_at) if !reminder.key.is_empty() => remind_at,
        _ => {
            return Err(ElarianError::Configuration(
                "Either key or remind_at is missing in reminder".to_string(),
            ))
        }
    };
    Ok(CustomerReminder {
        key: reminder.key.clone(),
        remind_at: Some(to_timestamp(remind_at)),
        interval: reminder.interval.map(to_duration),
        payload: reminder.payload.clone().map(StringValue::new),
    })
}

fn reminder_entry(reminder: &CustomerReminder) -> Reminder {
    Reminder {
        key: reminder.key.clone(),
        remind_at: reminder.remind_at.as_ref().and_then(from_timestamp),
        interval: reminder.interval.as_ref().map(duration_secs),
        payload: reminder.payload.as_ref().map(|payload| payload.value.clone()),
    }
}

fn customer_state(data: CustomerStateReplyData) -> Result<CustomerState> {
    let identity = data.identity_state.unwrap_or_default();
    Ok(CustomerState {
        customer_id: data.customer_id,
        customer_numbers: identity
            .customer_numbers
            .iter()
            .map(customer_number_from_wire)
            .collect::<Result<_>>()?,
        tags: identity.tags.iter().map(index_entry).collect(),
        secondary_ids: identity.secondary_ids.iter().map(index_entry).collect(),
        reminders: identity.reminders.iter().map(reminder_entry).collect(),
        metadata: identity
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), parse_data_value(value)))
            .collect(),
    })
}

fn message_reply(entry: Reply) -> Result<MessageReply> {
    match entry {
        Reply::SendMessage(reply) => Ok(MessageReply {
            status: enum_label::<MessageDeliveryStatus>(reply.status)?,
            description: reply.description,
            customer_id: string_value(reply.customer_id),
            message_id: string_value(reply.message_id),
            session_id: string_value(reply.session_id),
        }),
        other => Err(unexpected_reply("send_message", &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::proto::{data_map_value, CustomerIdentityState, DataMapValue, SendMessageReply};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn client() -> Elarian {
        Elarian::builder(ClientConfig::new("org", "app", "key").endpoint("localhost", 8082))
            .build()
            .unwrap()
    }

    #[test]
    fn test_customer_needs_id_or_number() {
        let err = client().customer(None, None).unwrap_err();
        assert!(matches!(err, ElarianError::Configuration(_)));

        let err = client().customer(Some(String::new()), None).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_provider_validated() {
        let customer = client().customer_by_number("+254711000000", "cellular").unwrap();
        assert_eq!(customer.number().unwrap().number, "+254711000000");
        assert!(customer.id().is_none());

        let err = client().customer_by_number("+254711000000", "pigeon").unwrap_err();
        match err {
            ElarianError::InvalidKey { key, valid } => {
                assert_eq!(key, "pigeon");
                assert!(valid.contains(&"CELLULAR"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(client().customer_by_number("+254711000000", "unspecified").is_err());
    }

    #[test]
    fn test_target_prefers_id() {
        let client = client();
        let by_number = client.customer_by_number("+254711000000", "cellular").unwrap();
        assert!(matches!(by_number.target(), Some(CustomerTarget::CustomerNumber(_))));

        let both = client
            .customer(
                Some("el_cst_1".to_string()),
                Some(CustomerNumber::new("+254711000000", "cellular")),
            )
            .unwrap();
        assert_eq!(
            both.target(),
            Some(CustomerTarget::CustomerId("el_cst_1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_number_scoped_commands_need_number() {
        let customer = client().customer_by_id("el_cst_1").unwrap();
        let channel = ChannelNumber::new("sms", "21356");

        let err = customer
            .send_message(&channel, &Message::text("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::Configuration(_)));

        let err = customer
            .update_messaging_consent(&channel, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::Configuration(_)));

        let err = customer
            .update_activity(&ChannelNumber::new("web", "app.example"), &Activity::new("s1", "k"))
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_arguments_checked_before_sending() {
        let customer = client().customer_by_number("+254711000000", "cellular").unwrap();

        let reminder = Reminder {
            key: "renewal".to_string(),
            remind_at: None,
            interval: None,
            payload: None,
        };
        let err = customer.add_reminder(&reminder).await.unwrap_err();
        assert!(matches!(err, ElarianError::Configuration(_)));

        let err = customer
            .update_tags(&[Tag::new("tier", "")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("tags[0]"));

        let err = customer
            .update_messaging_consent(&ChannelNumber::new("sms", "21356"), Some("MAYBE"))
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::InvalidKey { .. }));

        // Arguments pass, the client is not connected.
        let err = customer.cancel_reminder("renewal").await.unwrap_err();
        assert!(matches!(err, ElarianError::NotConnected));
    }

    #[test]
    fn test_reminder_to_wire() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap();
        let mut reminder = Reminder::new("renewal", at);
        reminder.interval = Some(60.0);
        reminder.payload = Some("plan-a".to_string());

        let wire = reminder_to_wire(&reminder).unwrap();
        assert_eq!(wire.remind_at.as_ref().unwrap().seconds, at.timestamp());
        assert_eq!(wire.interval.as_ref().unwrap().seconds, 60);
        assert_eq!(reminder_entry(&wire), reminder);
    }

    #[test]
    fn test_customer_state_from_wire() {
        let mut metadata = HashMap::new();
        metadata.insert(
            "profile".to_string(),
            json_data_value(&json!({"age": 31})).unwrap(),
        );
        metadata.insert(
            "note".to_string(),
            DataMapValue {
                value: Some(data_map_value::Value::StringVal("plain text".to_string())),
            },
        );

        let state = customer_state(CustomerStateReplyData {
            customer_id: "el_cst_1".to_string(),
            identity_state: Some(CustomerIdentityState {
                customer_numbers: vec![customer_number(&CustomerNumber::new(
                    "+254711000000",
                    "cellular",
                ))
                .unwrap()],
                tags: indexes("tags", &[Tag::new("tier", "gold")]).unwrap(),
                reminders: vec![],
                secondary_ids: vec![],
                metadata,
            }),
        })
        .unwrap();

        assert_eq!(state.customer_id, "el_cst_1");
        assert_eq!(state.customer_numbers[0].provider.as_deref(), Some("cellular"));
        assert_eq!(state.tags, vec![Tag::new("tier", "gold")]);
        assert_eq!(state.metadata["profile"], json!({"age": 31}));
        assert_eq!(state.metadata["note"], json!("plain text"));
    }

    #[test]
    fn test_message_reply_status_label() {
        let reply = message_reply(Reply::SendMessage(SendMessageReply {
            status: MessageDeliveryStatus::Sent as i32,
            description: "Sent".to_string(),
            message_id: Some(StringValue::new("msg_1")),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(reply.status, "sent");
        assert_eq!(reply.message_id.as_deref(), Some("msg_1"));

        let err = message_reply(Reply::UpdateCustomerState(Default::default())).unwrap_err();
        assert!(matches!(err, ElarianError::Protocol(_)));
    }
}
