//! Notification payload normalization.
//!
//! Each server notification variant becomes an `(event, payload)` pair. The
//! payload is a JSON object in which enum values are short lower-case names,
//! wrapper scalars are unwrapped, timestamps are RFC 3339 strings and
//! durations are fractional seconds.
//!
//! Received messages are refined by channel, and the refined event replaces
//! `received_message`:
//!
//! | channel                                   | event               | added fields                   |
//! |-------------------------------------------|---------------------|--------------------------------|
//! | ussd                                      | `ussd_session`      | `input`                        |
//! | voice                                     | `voice_call`        | `voice`                        |
//! | sms, whatsapp, telegram, fb_messenger     | `received_<channel>`| `text`, `media`, `location`    |
//! | email                                     | `received_email`    | `email`                        |

use prost_types::Timestamp;
use serde_json::{json, Map, Value};

use super::enums::enum_label;
use super::inbound::deserialize_part;
use super::numbers::{cash_json, channel_number_json, customer_number_json};
use super::outbound::deserialize_message;
use super::time::{duration_secs, timestamp_json};
use crate::error::Result;
use crate::message::InboundPart;
use crate::proto::{
    server_to_app_customer_notification, server_to_app_purse_notification,
    server_to_simulator_notification, ActivityChannel, Cash, ChannelPaymentParty, CustomerNumber,
    CustomerPaymentParty, MessageDeliveryStatus, MessageReaction, MessagingChannel,
    MessagingChannelNumber, MessagingConsentUpdate, MessagingConsentUpdateStatus,
    MessagingSessionEndReason, PaymentChannel, PaymentChannelNumber, PaymentPurseCounterParty,
    PaymentStatus, PaymentWalletCounterParty, ReceivedMessageNotification, StringValue,
};

/// Event name and normalized payload.
pub type NormalizedEvent = (String, Value);

fn string_value(value: &Option<StringValue>) -> Value {
    value
        .as_ref()
        .map_or(Value::Null, |v| Value::String(v.value.clone()))
}

fn timestamp(value: &Option<Timestamp>) -> Value {
    value.as_ref().map_or(Value::Null, timestamp_json)
}

fn customer_number(number: &Option<CustomerNumber>) -> Result<Value> {
    number.as_ref().map_or(Ok(Value::Null), customer_number_json)
}

fn messaging_channel(number: &Option<MessagingChannelNumber>) -> Result<Value> {
    number.as_ref().map_or(Ok(Value::Null), |n| {
        channel_number_json::<MessagingChannel>(n.channel, &n.number)
    })
}

fn payment_channel(number: &Option<PaymentChannelNumber>) -> Result<Value> {
    number.as_ref().map_or(Ok(Value::Null), |n| {
        channel_number_json::<PaymentChannel>(n.channel, &n.number)
    })
}

fn cash(value: &Option<Cash>) -> Value {
    value.as_ref().map_or(Value::Null, cash_json)
}

fn event(name: &str, payload: Value) -> Result<NormalizedEvent> {
    Ok((name.to_string(), payload))
}

/// Normalize a customer-scoped notification.
pub fn normalize_customer_event(
    entry: &server_to_app_customer_notification::Entry,
) -> Result<NormalizedEvent> {
    use server_to_app_customer_notification::Entry;

    match entry {
        Entry::Reminder(n) => {
            let reminder = n.reminder.as_ref().map(|r| {
                json!({
                    "key": r.key,
                    "remind_at": timestamp(&r.remind_at),
                    "interval": r.interval.as_ref().map(duration_secs),
                    "payload": string_value(&r.payload),
                })
            });
            let tag = n.tag.as_ref().map(|t| {
                json!({
                    "key": t.key,
                    "value": string_value(&t.value),
                })
            });
            event(
                "reminder",
                json!({
                    "reminder": reminder,
                    "tag": tag,
                    "work_id": string_value(&n.work_id),
                }),
            )
        }
        Entry::MessagingSessionStarted(n) | Entry::MessagingSessionRenewed(n) => {
            let name = if matches!(entry, Entry::MessagingSessionStarted(_)) {
                "messaging_session_started"
            } else {
                "messaging_session_renewed"
            };
            event(
                name,
                json!({
                    "customer_number": customer_number(&n.customer_number)?,
                    "channel_number": messaging_channel(&n.channel_number)?,
                    "session_id": string_value(&n.session_id),
                    "expires_at": timestamp(&n.expires_at),
                }),
            )
        }
        Entry::MessagingSessionEnded(n) => event(
            "messaging_session_ended",
            json!({
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": messaging_channel(&n.channel_number)?,
                "session_id": string_value(&n.session_id),
                "duration": n.duration.as_ref().map(duration_secs),
                "reason": enum_label::<MessagingSessionEndReason>(n.reason)?,
            }),
        ),
        Entry::MessagingConsentUpdate(n) => event(
            "messaging_consent_update",
            json!({
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": messaging_channel(&n.channel_number)?,
                "update": enum_label::<MessagingConsentUpdate>(n.update)?,
                "status": enum_label::<MessagingConsentUpdateStatus>(n.status)?,
                "session_id": string_value(&n.session_id),
            }),
        ),
        Entry::ReceivedMessage(n) => normalize_received_message(n),
        Entry::MessageStatus(n) => event(
            "message_status",
            json!({
                "customer_number": customer_number(&n.customer_number)?,
                "message_id": n.message_id,
                "status": enum_label::<MessageDeliveryStatus>(n.status)?,
            }),
        ),
        Entry::SentMessageReaction(n) => event(
            "sent_message_reaction",
            json!({
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": messaging_channel(&n.channel_number)?,
                "message_id": n.message_id,
                "reaction": enum_label::<MessageReaction>(n.reaction)?,
            }),
        ),
        Entry::ReceivedPayment(n) => event(
            "received_payment",
            json!({
                "purse_id": n.purse_id,
                "transaction_id": n.transaction_id,
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": payment_channel(&n.channel_number)?,
                "value": cash(&n.value),
                "status": enum_label::<PaymentStatus>(n.status)?,
                "created_at": timestamp(&n.created_at),
            }),
        ),
        Entry::PaymentStatus(n) => event(
            "payment_status",
            json!({
                "transaction_id": n.transaction_id,
                "status": enum_label::<PaymentStatus>(n.status)?,
            }),
        ),
        Entry::WalletPaymentStatus(n) => event(
            "wallet_payment_status",
            json!({
                "wallet_id": n.wallet_id,
                "transaction_id": n.transaction_id,
                "status": enum_label::<PaymentStatus>(n.status)?,
            }),
        ),
        Entry::CustomerActivity(n) => {
            let channel_number = n.channel_number.as_ref().map_or(Ok(Value::Null), |c| {
                channel_number_json::<ActivityChannel>(c.channel, &c.number)
            })?;
            let activity = n.activity.as_ref().map(|a| {
                json!({
                    "key": a.key,
                    "properties": a.properties,
                    "created_at": timestamp(&a.created_at),
                })
            });
            event(
                "customer_activity",
                json!({
                    "customer_number": customer_number(&n.customer_number)?,
                    "channel_number": channel_number,
                    "session_id": string_value(&n.session_id),
                    "activity": activity,
                }),
            )
        }
    }
}

fn normalize_received_message(n: &ReceivedMessageNotification) -> Result<NormalizedEvent> {
    let mut payload = Map::new();
    payload.insert("customer_number".into(), customer_number(&n.customer_number)?);
    payload.insert("channel_number".into(), messaging_channel(&n.channel_number)?);
    payload.insert("message_id".into(), Value::String(n.message_id.clone()));
    payload.insert("session_id".into(), string_value(&n.session_id));
    payload.insert("in_reply_to".into(), string_value(&n.in_reply_to));

    let parts = n
        .parts
        .iter()
        .map(deserialize_part)
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    let channel = match &n.channel_number {
        Some(number) => enum_label::<MessagingChannel>(number.channel)?,
        None => "unspecified".to_string(),
    };

    let name = match channel.as_str() {
        "ussd" => {
            let input = parts.iter().find_map(|part| match part {
                InboundPart::Ussd(ussd) => Some(ussd),
                _ => None,
            });
            payload.insert("input".into(), serde_json::to_value(input)?);
            "ussd_session".to_string()
        }
        "voice" => {
            let voice = parts.iter().find_map(|part| match part {
                InboundPart::Voice(voice) => Some(voice),
                _ => None,
            });
            payload.insert("voice".into(), serde_json::to_value(voice)?);
            "voice_call".to_string()
        }
        "email" => {
            let email = parts.iter().find_map(|part| match part {
                InboundPart::Email(email) => Some(email),
                _ => None,
            });
            payload.insert("email".into(), serde_json::to_value(email)?);
            "received_email".to_string()
        }
        "sms" | "whatsapp" | "telegram" | "fb_messenger" => {
            for part in &parts {
                let (key, value) = match part {
                    InboundPart::Text(text) => ("text", Value::String(text.clone())),
                    InboundPart::Media(media) => ("media", serde_json::to_value(media)?),
                    InboundPart::Location(location) => ("location", serde_json::to_value(location)?),
                    _ => continue,
                };
                payload.entry(key).or_insert(value);
            }
            format!("received_{}", channel)
        }
        _ => {
            payload.insert("parts".into(), serde_json::to_value(&parts)?);
            "received_message".to_string()
        }
    };

    Ok((name, Value::Object(payload)))
}

/// Normalize a purse-scoped notification.
pub fn normalize_purse_event(
    entry: &server_to_app_purse_notification::Entry,
) -> Result<NormalizedEvent> {
    use server_to_app_purse_notification::Entry;

    match entry {
        Entry::PaymentStatus(n) => event(
            "payment_status",
            json!({
                "transaction_id": n.transaction_id,
                "status": enum_label::<PaymentStatus>(n.status)?,
            }),
        ),
    }
}

fn wallet_json(wallet: &PaymentWalletCounterParty) -> Value {
    json!({"wallet": {"customer_id": wallet.customer_id, "wallet_id": wallet.wallet_id}})
}

fn purse_json(purse: &PaymentPurseCounterParty) -> Value {
    json!({"purse": {"purse_id": purse.purse_id}})
}

fn customer_party(party: &Option<CustomerPaymentParty>) -> Value {
    match party {
        Some(CustomerPaymentParty::Wallet(wallet)) => wallet_json(wallet),
        Some(CustomerPaymentParty::Purse(purse)) => purse_json(purse),
        None => Value::Null,
    }
}

fn channel_party(party: &Option<ChannelPaymentParty>) -> Value {
    match party {
        Some(ChannelPaymentParty::Wallet(wallet)) => wallet_json(wallet),
        Some(ChannelPaymentParty::Purse(purse)) => purse_json(purse),
        None => Value::Null,
    }
}

/// Normalize a notification addressed to a simulator.
pub fn normalize_simulator_event(
    entry: &server_to_simulator_notification::Entry,
) -> Result<NormalizedEvent> {
    use server_to_simulator_notification::Entry;

    match entry {
        Entry::SendMessage(n) => {
            let message = match &n.message {
                Some(message) => serde_json::to_value(deserialize_message(message)?)?,
                None => Value::Null,
            };
            event(
                "send_message",
                json!({
                    "org_id": n.org_id,
                    "customer_id": n.customer_id,
                    "message_id": n.message_id,
                    "customer_number": customer_number(&n.customer_number)?,
                    "channel_number": messaging_channel(&n.channel_number)?,
                    "message": message,
                }),
            )
        }
        Entry::MakeVoiceCall(n) => event(
            "make_voice_call",
            json!({
                "org_id": n.org_id,
                "customer_id": n.customer_id,
                "session_id": n.session_id,
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": messaging_channel(&n.channel_number)?,
            }),
        ),
        Entry::SendCustomerPayment(n) => event(
            "send_customer_payment",
            json!({
                "org_id": n.org_id,
                "customer_id": n.customer_id,
                "app_id": n.app_id,
                "debit_party": customer_party(&n.debit_party),
                "transaction_id": n.transaction_id,
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": payment_channel(&n.channel_number)?,
                "value": cash(&n.value),
            }),
        ),
        Entry::SendChannelPayment(n) => event(
            "send_channel_payment",
            json!({
                "org_id": n.org_id,
                "app_id": n.app_id,
                "debit_party": channel_party(&n.debit_party),
                "transaction_id": n.transaction_id,
                "channel": enum_label::<PaymentChannel>(n.channel)?,
                "source": n.source,
                "destination": n.destination,
                "account": string_value(&n.account),
                "value": cash(&n.value),
            }),
        ),
        Entry::CheckoutPayment(n) => event(
            "checkout_payment",
            json!({
                "org_id": n.org_id,
                "customer_id": n.customer_id,
                "app_id": n.app_id,
                "credit_party": customer_party(&n.credit_party),
                "transaction_id": n.transaction_id,
                "customer_number": customer_number(&n.customer_number)?,
                "channel_number": payment_channel(&n.channel_number)?,
                "value": cash(&n.value),
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{
        inbound_message_body, InboundMessageBody, MessageStatusNotification,
        MessagingSessionEndedNotification, PaymentStatusNotification, UssdInputMessageBody,
    };
    use server_to_app_customer_notification::Entry;

    fn received(channel: MessagingChannel, parts: Vec<inbound_message_body::Entry>) -> Entry {
        Entry::ReceivedMessage(ReceivedMessageNotification {
            customer_number: Some(CustomerNumber {
                number: "+254711000000".to_string(),
                provider: 2,
                partition: None,
            }),
            channel_number: Some(MessagingChannelNumber {
                channel: channel as i32,
                number: "*384#".to_string(),
            }),
            message_id: "msg-1".to_string(),
            session_id: Some(StringValue::new("session-1")),
            in_reply_to: None,
            parts: parts
                .into_iter()
                .map(|entry| InboundMessageBody { entry: Some(entry) })
                .collect(),
        })
    }

    #[test]
    fn test_ussd_message_becomes_ussd_session() {
        let entry = received(
            MessagingChannel::Ussd,
            vec![inbound_message_body::Entry::Ussd(UssdInputMessageBody {
                status: 1,
                text: Some(StringValue::new("1")),
            })],
        );
        let (name, payload) = normalize_customer_event(&entry).unwrap();

        assert_eq!(name, "ussd_session");
        assert_eq!(payload["input"], json!({"status": "active", "text": "1"}));
        assert_eq!(payload["session_id"], json!("session-1"));
        assert_eq!(
            payload["customer_number"],
            json!({"number": "+254711000000", "provider": "cellular"})
        );
        assert_eq!(payload["channel_number"], json!({"channel": "ussd", "number": "*384#"}));
        assert!(payload.get("parts").is_none());
    }

    #[test]
    fn test_sms_message_becomes_received_sms() {
        let entry = received(
            MessagingChannel::Sms,
            vec![inbound_message_body::Entry::Text("hello".to_string())],
        );
        let (name, payload) = normalize_customer_event(&entry).unwrap();
        assert_eq!(name, "received_sms");
        assert_eq!(payload["text"], json!("hello"));
        assert!(payload.get("parts").is_none());
    }

    #[test]
    fn test_fb_messenger_keeps_underscore() {
        let entry = received(MessagingChannel::FbMessenger, vec![]);
        let (name, _) = normalize_customer_event(&entry).unwrap();
        assert_eq!(name, "received_fb_messenger");
    }

    #[test]
    fn test_session_ended_duration_and_reason() {
        let entry = Entry::MessagingSessionEnded(MessagingSessionEndedNotification {
            customer_number: None,
            channel_number: None,
            session_id: Some(StringValue::new("s")),
            duration: Some(prost_types::Duration {
                seconds: 12,
                nanos: 500_000_000,
            }),
            reason: MessagingSessionEndReason::Inactivity as i32,
        });
        let (name, payload) = normalize_customer_event(&entry).unwrap();
        assert_eq!(name, "messaging_session_ended");
        assert_eq!(payload["duration"], json!(12.5));
        assert_eq!(payload["reason"], json!("inactivity"));
        assert_eq!(payload["customer_number"], Value::Null);
    }

    #[test]
    fn test_unknown_enum_value_is_an_error() {
        let entry = Entry::MessageStatus(MessageStatusNotification {
            customer_number: None,
            message_id: "m".to_string(),
            status: 999,
        });
        assert!(normalize_customer_event(&entry).is_err());
    }

    #[test]
    fn test_purse_payment_status() {
        let entry = server_to_app_purse_notification::Entry::PaymentStatus(PaymentStatusNotification {
            transaction_id: "tx".to_string(),
            status: PaymentStatus::Success as i32,
        });
        let (name, payload) = normalize_purse_event(&entry).unwrap();
        assert_eq!(name, "payment_status");
        assert_eq!(payload, json!({"transaction_id": "tx", "status": "success"}));
    }
}
