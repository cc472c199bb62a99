//! App socket: connection metadata, app commands and replies, server notifications.

use std::collections::HashMap;

use prost_types::{Duration, Timestamp};

use super::common::{
    ActivityChannelNumber, CustomerActivity, CustomerIndex, CustomerNumber, CustomerReminder,
    DataMapValue, IndexMapping, StringValue,
};
use super::messaging::{
    InboundMessageBody, MessageDeliveryStatus, MessageReaction, MessagingChannelNumber,
    MessagingConsentUpdate, MessagingConsentUpdateStatus, MessagingSessionEndReason,
    OutboundMessage,
};
use super::payment::{
    PaymentStatusNotification, ReceivedPaymentNotification, WalletPaymentStatusNotification,
};

/// Handshake data carried in the SETUP frame.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppConnectionMetadata {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub app_id: String,
    #[prost(message, optional, tag = "3")]
    pub api_key: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub auth_token: Option<StringValue>,
    #[prost(bool, tag = "5")]
    pub simplex_mode: bool,
    #[prost(bool, tag = "6")]
    pub simulator_mode: bool,
}

/// Customer addressed by a command, either by id or by number.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum CustomerTarget {
    #[prost(string, tag = "1")]
    CustomerId(String),
    #[prost(message, tag = "2")]
    CustomerNumber(CustomerNumber),
}

// Commands.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCustomerStateCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AdoptCustomerStateCommand {
    #[prost(string, tag = "1")]
    pub customer_id: String,
    #[prost(oneof = "adopt_customer_state_command::OtherCustomer", tags = "2, 3")]
    pub other_customer: Option<adopt_customer_state_command::OtherCustomer>,
}

pub mod adopt_customer_state_command {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum OtherCustomer {
        #[prost(string, tag = "2")]
        OtherCustomerId(String),
        #[prost(message, tag = "3")]
        OtherCustomerNumber(CustomerNumber),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddCustomerReminderCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(message, optional, tag = "3")]
    pub reminder: Option<CustomerReminder>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CancelCustomerReminderCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(string, tag = "3")]
    pub key: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerTagCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(message, repeated, tag = "3")]
    pub updates: Vec<CustomerIndex>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteCustomerTagCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(string, repeated, tag = "3")]
    pub deletions: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerSecondaryIdCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(message, repeated, tag = "3")]
    pub updates: Vec<CustomerIndex>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteCustomerSecondaryIdCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(message, repeated, tag = "3")]
    pub deletions: Vec<IndexMapping>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerAppDataCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(message, optional, tag = "3")]
    pub update: Option<DataMapValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LeaseCustomerAppDataCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteCustomerAppDataCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerMetadataCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(map = "string, message", tag = "3")]
    pub updates: HashMap<String, DataMapValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteCustomerMetadataCommand {
    #[prost(oneof = "CustomerTarget", tags = "1, 2")]
    pub customer: Option<CustomerTarget>,
    #[prost(string, repeated, tag = "3")]
    pub deletions: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendMessageCommand {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(message, optional, tag = "3")]
    pub message: Option<OutboundMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReplyToMessageCommand {
    #[prost(string, tag = "1")]
    pub customer_id: String,
    #[prost(string, tag = "2")]
    pub message_id: String,
    #[prost(message, optional, tag = "3")]
    pub message: Option<OutboundMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateMessagingConsentCommand {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(enumeration = "MessagingConsentUpdate", tag = "3")]
    pub update: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerActivityCommand {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<ActivityChannelNumber>,
    #[prost(string, tag = "3")]
    pub session_id: String,
    #[prost(string, tag = "4")]
    pub key: String,
    #[prost(map = "string, string", tag = "5")]
    pub properties: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppToServerCommand {
    #[prost(
        oneof = "app_to_server_command::Entry",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17"
    )]
    pub entry: Option<app_to_server_command::Entry>,
}

pub mod app_to_server_command {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        GetCustomerState(GetCustomerStateCommand),
        #[prost(message, tag = "2")]
        AdoptCustomerState(AdoptCustomerStateCommand),
        #[prost(message, tag = "3")]
        AddCustomerReminder(AddCustomerReminderCommand),
        #[prost(message, tag = "4")]
        CancelCustomerReminder(CancelCustomerReminderCommand),
        #[prost(message, tag = "5")]
        UpdateCustomerTag(UpdateCustomerTagCommand),
        #[prost(message, tag = "6")]
        DeleteCustomerTag(DeleteCustomerTagCommand),
        #[prost(message, tag = "7")]
        UpdateCustomerSecondaryId(UpdateCustomerSecondaryIdCommand),
        #[prost(message, tag = "8")]
        DeleteCustomerSecondaryId(DeleteCustomerSecondaryIdCommand),
        #[prost(message, tag = "9")]
        UpdateCustomerAppData(UpdateCustomerAppDataCommand),
        #[prost(message, tag = "10")]
        LeaseCustomerAppData(LeaseCustomerAppDataCommand),
        #[prost(message, tag = "11")]
        DeleteCustomerAppData(DeleteCustomerAppDataCommand),
        #[prost(message, tag = "12")]
        UpdateCustomerMetadata(UpdateCustomerMetadataCommand),
        #[prost(message, tag = "13")]
        DeleteCustomerMetadata(DeleteCustomerMetadataCommand),
        #[prost(message, tag = "14")]
        SendMessage(SendMessageCommand),
        #[prost(message, tag = "15")]
        ReplyToMessage(ReplyToMessageCommand),
        #[prost(message, tag = "16")]
        UpdateMessagingConsent(UpdateMessagingConsentCommand),
        #[prost(message, tag = "17")]
        CustomerActivity(CustomerActivityCommand),
    }
}

// Replies.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerIdentityState {
    #[prost(message, repeated, tag = "1")]
    pub customer_numbers: Vec<CustomerNumber>,
    #[prost(message, repeated, tag = "2")]
    pub tags: Vec<CustomerIndex>,
    #[prost(message, repeated, tag = "3")]
    pub reminders: Vec<CustomerReminder>,
    #[prost(message, repeated, tag = "4")]
    pub secondary_ids: Vec<CustomerIndex>,
    #[prost(map = "string, message", tag = "5")]
    pub metadata: HashMap<String, DataMapValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerStateReplyData {
    #[prost(string, tag = "1")]
    pub customer_id: String,
    #[prost(message, optional, tag = "2")]
    pub identity_state: Option<CustomerIdentityState>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetCustomerStateReply {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub data: Option<CustomerStateReplyData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerStateReply {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub customer_id: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateCustomerAppDataReply {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub customer_id: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub value: Option<DataMapValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendMessageReply {
    #[prost(enumeration = "MessageDeliveryStatus", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub customer_id: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub message_id: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub session_id: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateMessagingConsentReply {
    #[prost(enumeration = "MessagingConsentUpdateStatus", tag = "1")]
    pub status: i32,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub customer_id: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppToServerCommandReply {
    #[prost(oneof = "app_to_server_command_reply::Entry", tags = "1, 2, 3, 4, 5")]
    pub entry: Option<app_to_server_command_reply::Entry>,
}

pub mod app_to_server_command_reply {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        GetCustomerState(GetCustomerStateReply),
        #[prost(message, tag = "2")]
        UpdateCustomerState(UpdateCustomerStateReply),
        #[prost(message, tag = "3")]
        UpdateCustomerAppData(UpdateCustomerAppDataReply),
        #[prost(message, tag = "4")]
        SendMessage(SendMessageReply),
        #[prost(message, tag = "5")]
        UpdateMessagingConsent(UpdateMessagingConsentReply),
    }
}

// Notifications.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReminderNotification {
    #[prost(message, optional, tag = "1")]
    pub reminder: Option<CustomerReminder>,
    #[prost(message, optional, tag = "2")]
    pub tag: Option<IndexMapping>,
    #[prost(message, optional, tag = "3")]
    pub work_id: Option<StringValue>,
}

/// Started and renewed sessions share one shape.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessagingSessionNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(message, optional, tag = "3")]
    pub session_id: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub expires_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessagingSessionEndedNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(message, optional, tag = "3")]
    pub session_id: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub duration: Option<Duration>,
    #[prost(enumeration = "MessagingSessionEndReason", tag = "5")]
    pub reason: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessagingConsentUpdateNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(enumeration = "MessagingConsentUpdate", tag = "3")]
    pub update: i32,
    #[prost(enumeration = "MessagingConsentUpdateStatus", tag = "4")]
    pub status: i32,
    #[prost(message, optional, tag = "5")]
    pub session_id: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReceivedMessageNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(string, tag = "3")]
    pub message_id: String,
    #[prost(message, optional, tag = "4")]
    pub session_id: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub in_reply_to: Option<StringValue>,
    #[prost(message, repeated, tag = "6")]
    pub parts: Vec<InboundMessageBody>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageStatusNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(string, tag = "2")]
    pub message_id: String,
    #[prost(enumeration = "MessageDeliveryStatus", tag = "3")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SentMessageReactionNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(string, tag = "3")]
    pub message_id: String,
    #[prost(enumeration = "MessageReaction", tag = "4")]
    pub reaction: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerActivityNotification {
    #[prost(message, optional, tag = "1")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<ActivityChannelNumber>,
    #[prost(message, optional, tag = "3")]
    pub session_id: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub activity: Option<CustomerActivity>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToAppCustomerNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub app_id: String,
    #[prost(string, tag = "3")]
    pub customer_id: String,
    #[prost(message, optional, tag = "4")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub app_data: Option<DataMapValue>,
    #[prost(
        oneof = "server_to_app_customer_notification::Entry",
        tags = "6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17"
    )]
    pub entry: Option<server_to_app_customer_notification::Entry>,
}

pub mod server_to_app_customer_notification {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "6")]
        Reminder(ReminderNotification),
        #[prost(message, tag = "7")]
        MessagingSessionStarted(MessagingSessionNotification),
        #[prost(message, tag = "8")]
        MessagingSessionRenewed(MessagingSessionNotification),
        #[prost(message, tag = "9")]
        MessagingSessionEnded(MessagingSessionEndedNotification),
        #[prost(message, tag = "10")]
        MessagingConsentUpdate(MessagingConsentUpdateNotification),
        #[prost(message, tag = "11")]
        ReceivedMessage(ReceivedMessageNotification),
        #[prost(message, tag = "12")]
        MessageStatus(MessageStatusNotification),
        #[prost(message, tag = "13")]
        SentMessageReaction(SentMessageReactionNotification),
        #[prost(message, tag = "14")]
        ReceivedPayment(ReceivedPaymentNotification),
        #[prost(message, tag = "15")]
        PaymentStatus(PaymentStatusNotification),
        #[prost(message, tag = "16")]
        WalletPaymentStatus(WalletPaymentStatusNotification),
        #[prost(message, tag = "17")]
        CustomerActivity(CustomerActivityNotification),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToAppPurseNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub app_id: String,
    #[prost(string, tag = "3")]
    pub purse_id: String,
    #[prost(message, optional, tag = "4")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "5")]
    pub app_data: Option<DataMapValue>,
    #[prost(oneof = "server_to_app_purse_notification::Entry", tags = "6")]
    pub entry: Option<server_to_app_purse_notification::Entry>,
}

pub mod server_to_app_purse_notification {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "6")]
        PaymentStatus(PaymentStatusNotification),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToAppNotification {
    #[prost(oneof = "server_to_app_notification::Entry", tags = "1, 2")]
    pub entry: Option<server_to_app_notification::Entry>,
}

pub mod server_to_app_notification {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        Customer(ServerToAppCustomerNotification),
        #[prost(message, tag = "2")]
        Purse(ServerToAppPurseNotification),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AppDataUpdate {
    #[prost(message, optional, tag = "1")]
    pub data: Option<DataMapValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToAppNotificationReply {
    #[prost(message, optional, tag = "1")]
    pub data_update: Option<AppDataUpdate>,
    #[prost(message, optional, tag = "2")]
    pub message: Option<OutboundMessage>,
}
