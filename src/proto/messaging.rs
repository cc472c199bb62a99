//! Messaging model: channels, outbound and inbound message bodies, voice.

use std::collections::HashMap;

use prost_types::{Duration, Timestamp};

use super::common::{CustomerEventDirection, CustomerNumber, Int32Value, StringValue};

wire_enum! {
    pub enum MessagingChannel: "MESSAGING_CHANNEL" {
        Unspecified = 0 => "UNSPECIFIED",
        Sms = 1 => "SMS",
        Voice = 2 => "VOICE",
        Ussd = 3 => "USSD",
        FbMessenger = 4 => "FB_MESSENGER",
        Telegram = 5 => "TELEGRAM",
        Whatsapp = 6 => "WHATSAPP",
        Email = 7 => "EMAIL",
    }
}

wire_enum! {
    pub enum MessagingConsentUpdate: "MESSAGING_CONSENT_UPDATE" {
        Unspecified = 0 => "UNSPECIFIED",
        Allow = 1 => "ALLOW",
        Block = 2 => "BLOCK",
    }
}

wire_enum! {
    pub enum MessagingConsentUpdateStatus: "MESSAGING_CONSENT_UPDATE_STATUS" {
        Unspecified = 0 => "UNSPECIFIED",
        Queued = 100 => "QUEUED",
        Completed = 300 => "COMPLETED",
        InvalidChannelNumber = 401 => "INVALID_CHANNEL_NUMBER",
        DecommissionedCustomerId = 402 => "DECOMMISSIONED_CUSTOMER_ID",
        ApplicationError = 501 => "APPLICATION_ERROR",
    }
}

wire_enum! {
    pub enum MessagingSessionEndReason: "MESSAGING_SESSION_END_REASON" {
        Unspecified = 0 => "UNSPECIFIED",
        NormalClearing = 100 => "NORMAL_CLEARING",
        Inactivity = 200 => "INACTIVITY",
        Failure = 300 => "FAILURE",
    }
}

wire_enum! {
    pub enum MessageReaction: "MESSAGE_REACTION" {
        Unspecified = 0 => "UNSPECIFIED",
        Clicked = 100 => "CLICKED",
        Unsubscribed = 200 => "UNSUBSCRIBED",
        Complained = 201 => "COMPLAINED",
    }
}

wire_enum! {
    pub enum MessageDeliveryStatus: "MESSAGE_DELIVERY_STATUS" {
        Unspecified = 0 => "UNSPECIFIED",
        Queued = 100 => "QUEUED",
        Sent = 101 => "SENT",
        Delivered = 300 => "DELIVERED",
        Read = 301 => "READ",
        Received = 302 => "RECEIVED",
        SessionInitiated = 303 => "SESSION_INITIATED",
        Failed = 400 => "FAILED",
        NoSession = 401 => "NO_SESSION",
        NoCapacity = 402 => "NO_CAPACITY",
        InsufficientCredit = 403 => "INSUFFICIENT_CREDIT",
        InvalidChannelNumber = 404 => "INVALID_CHANNEL_NUMBER",
        InvalidCustomerNumber = 405 => "INVALID_CUSTOMER_NUMBER",
        NoConsent = 406 => "NO_CONSENT",
        DecommissionedCustomerId = 407 => "DECOMMISSIONED_CUSTOMER_ID",
        InvalidReplyToken = 408 => "INVALID_REPLY_TOKEN",
        ApplicationError = 501 => "APPLICATION_ERROR",
    }
}

wire_enum! {
    pub enum MediaType: "MEDIA_TYPE" {
        Unspecified = 0 => "UNSPECIFIED",
        Image = 1 => "IMAGE",
        Audio = 2 => "AUDIO",
        Video = 3 => "VIDEO",
        Document = 4 => "DOCUMENT",
        Voice = 5 => "VOICE",
        Sticker = 6 => "STICKER",
        Contact = 7 => "CONTACT",
    }
}

wire_enum! {
    pub enum UssdSessionStatus: "USSD_SESSION_STATUS" {
        Unspecified = 0 => "UNSPECIFIED",
        Active = 1 => "ACTIVE",
        Incomplete = 2 => "INCOMPLETE",
        Completed = 3 => "COMPLETED",
        AppError = 4 => "APP_ERROR",
    }
}

wire_enum! {
    pub enum VoiceCallStatus: "VOICE_CALL_STATUS" {
        Unspecified = 0 => "UNSPECIFIED",
        Queued = 100 => "QUEUED",
        Answered = 101 => "ANSWERED",
        Ringing = 102 => "RINGING",
        Active = 200 => "ACTIVE",
        Dialing = 201 => "DIALING",
        DialAnswered = 202 => "DIAL_ANSWERED",
        Bridged = 203 => "BRIDGED",
        Enqueued = 204 => "ENQUEUED",
        Dequeued = 205 => "DEQUEUED",
        Transferred = 206 => "TRANSFERRED",
        TransferAnswered = 207 => "TRANSFER_ANSWERED",
        Completed = 300 => "COMPLETED",
        InsufficientCredit = 400 => "INSUFFICIENT_CREDIT",
        NotAnswered = 401 => "NOT_ANSWERED",
        InvalidPhoneNumber = 402 => "INVALID_PHONE_NUMBER",
        DestinationNotSupported = 403 => "DESTINATION_NOT_SUPPORTED",
        DecommissionedCustomerId = 404 => "DECOMMISSIONED_CUSTOMER_ID",
        Expired = 405 => "EXPIRED",
        InvalidChannelNumber = 406 => "INVALID_CHANNEL_NUMBER",
        ApplicationError = 501 => "APPLICATION_ERROR",
    }
}

wire_enum! {
    pub enum VoiceCallHangupCause: "VOICE_CALL_HANGUP_CAUSE" {
        Unspecified = 0 => "UNSPECIFIED",
        UnallocatedNumber = 1 => "UNALLOCATED_NUMBER",
        NormalClearing = 16 => "NORMAL_CLEARING",
        UserBusy = 17 => "USER_BUSY",
        NoUserResponse = 18 => "NO_USER_RESPONSE",
        NoAnswer = 19 => "NO_ANSWER",
        SubscriberAbsent = 20 => "SUBSCRIBER_ABSENT",
        CallRejected = 21 => "CALL_REJECTED",
        NormalUnspecified = 31 => "NORMAL_UNSPECIFIED",
        NormalTemporaryFailure = 41 => "NORMAL_TEMPORARY_FAILURE",
        ServiceUnavailable = 63 => "SERVICE_UNAVAILABLE",
        RecoveryOnTimerExpire = 102 => "RECOVERY_ON_TIMER_EXPIRE",
        OriginatorCancel = 487 => "ORIGINATOR_CANCEL",
        LoseRace = 502 => "LOSE_RACE",
        UserNotRegistered = 606 => "USER_NOT_REGISTERED",
    }
}

wire_enum! {
    pub enum TextToSpeechVoice: "TEXT_TO_SPEECH_VOICE" {
        Unspecified = 0 => "UNSPECIFIED",
        Male = 1 => "MALE",
        Female = 2 => "FEMALE",
    }
}

wire_enum! {
    pub enum PromptMessageReplyAction: "PROMPT_MESSAGE_REPLY_ACTION" {
        Unknown = 0 => "UNKNOWN",
        Text = 1 => "TEXT",
        PhoneNumber = 2 => "PHONE_NUMBER",
        Email = 3 => "EMAIL",
        Location = 4 => "LOCATION",
        Url = 5 => "URL",
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessagingChannelNumber {
    #[prost(enumeration = "MessagingChannel", tag = "1")]
    pub channel: i32,
    #[prost(string, tag = "2")]
    pub number: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MediaMessageBody {
    #[prost(string, tag = "1")]
    pub url: String,
    #[prost(enumeration = "MediaType", tag = "2")]
    pub media: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LocationMessageBody {
    #[prost(double, tag = "1")]
    pub latitude: f64,
    #[prost(double, tag = "2")]
    pub longitude: f64,
    #[prost(message, optional, tag = "3")]
    pub label: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub address: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmailMessageBody {
    #[prost(string, tag = "1")]
    pub subject: String,
    #[prost(string, tag = "2")]
    pub body_plain: String,
    #[prost(string, tag = "3")]
    pub body_html: String,
    #[prost(string, repeated, tag = "4")]
    pub cc_list: Vec<String>,
    #[prost(string, repeated, tag = "5")]
    pub bcc_list: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub attachments: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TemplateMessageBody {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(map = "string, string", tag = "2")]
    pub params: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UssdMenuMessageBody {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(bool, tag = "2")]
    pub is_terminal: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UssdInputMessageBody {
    #[prost(enumeration = "UssdSessionStatus", tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub text: Option<StringValue>,
}

// Voice dial plan actions.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SayCallAction {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(bool, tag = "2")]
    pub play_beep: bool,
    #[prost(enumeration = "TextToSpeechVoice", tag = "3")]
    pub voice: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PlayCallAction {
    #[prost(string, tag = "1")]
    pub url: String,
}

/// Prompt played before collecting digits or a recording.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum CallPrompt {
    #[prost(message, tag = "1")]
    Say(SayCallAction),
    #[prost(message, tag = "2")]
    Play(PlayCallAction),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetDigitsCallAction {
    #[prost(oneof = "CallPrompt", tags = "1, 2")]
    pub prompt: Option<CallPrompt>,
    #[prost(message, optional, tag = "3")]
    pub timeout: Option<Duration>,
    #[prost(message, optional, tag = "4")]
    pub finish_on_key: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub num_digits: Option<Int32Value>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRecordingCallAction {
    #[prost(oneof = "CallPrompt", tags = "1, 2")]
    pub prompt: Option<CallPrompt>,
    #[prost(message, optional, tag = "3")]
    pub timeout: Option<Duration>,
    #[prost(message, optional, tag = "4")]
    pub max_length: Option<Duration>,
    #[prost(message, optional, tag = "5")]
    pub finish_on_key: Option<StringValue>,
    #[prost(bool, tag = "6")]
    pub play_beep: bool,
    #[prost(bool, tag = "7")]
    pub trim_silence: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DialCallAction {
    #[prost(message, repeated, tag = "1")]
    pub customer_numbers: Vec<CustomerNumber>,
    #[prost(bool, tag = "2")]
    pub record: bool,
    #[prost(bool, tag = "3")]
    pub sequential: bool,
    #[prost(message, optional, tag = "4")]
    pub ringback_tone: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub caller_id: Option<StringValue>,
    #[prost(message, optional, tag = "6")]
    pub max_duration: Option<Int32Value>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RecordSessionCallAction {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnqueueCallAction {
    #[prost(message, optional, tag = "1")]
    pub hold_music: Option<StringValue>,
    #[prost(message, optional, tag = "2")]
    pub queue_name: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DequeueCallAction {
    #[prost(message, optional, tag = "1")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(bool, tag = "2")]
    pub record: bool,
    #[prost(message, optional, tag = "3")]
    pub queue_name: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RejectCallAction {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RedirectCallAction {
    #[prost(string, tag = "1")]
    pub url: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoiceCallAction {
    #[prost(oneof = "voice_call_action::Entry", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10")]
    pub entry: Option<voice_call_action::Entry>,
}

pub mod voice_call_action {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        Say(SayCallAction),
        #[prost(message, tag = "2")]
        Play(PlayCallAction),
        #[prost(message, tag = "3")]
        GetDigits(GetDigitsCallAction),
        #[prost(message, tag = "4")]
        Dial(DialCallAction),
        #[prost(message, tag = "5")]
        RecordSession(RecordSessionCallAction),
        #[prost(message, tag = "6")]
        GetRecording(GetRecordingCallAction),
        #[prost(message, tag = "7")]
        Enqueue(EnqueueCallAction),
        #[prost(message, tag = "8")]
        Dequeue(DequeueCallAction),
        #[prost(message, tag = "9")]
        Reject(RejectCallAction),
        #[prost(message, tag = "10")]
        Redirect(RedirectCallAction),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoiceCallDialplanMessageBody {
    #[prost(message, repeated, tag = "1")]
    pub actions: Vec<VoiceCallAction>,
}

// Voice call input reported by the server (or injected by the simulator).

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoiceCallDialInput {
    #[prost(string, tag = "1")]
    pub destination_number: String,
    #[prost(message, optional, tag = "2")]
    pub started_at: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub duration: Option<Duration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoiceCallQueueInput {
    #[prost(message, optional, tag = "1")]
    pub enqueued_at: Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub dequeued_at: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub dequeued_to_number: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub dequeued_to_session_id: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub queue_duration: Option<Duration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VoiceCallInputMessageBody {
    #[prost(enumeration = "CustomerEventDirection", tag = "1")]
    pub direction: i32,
    #[prost(enumeration = "VoiceCallStatus", tag = "2")]
    pub status: i32,
    #[prost(message, optional, tag = "3")]
    pub started_at: Option<Timestamp>,
    #[prost(enumeration = "VoiceCallHangupCause", tag = "4")]
    pub hangup_cause: i32,
    #[prost(message, optional, tag = "5")]
    pub dtmf_digits: Option<StringValue>,
    #[prost(message, optional, tag = "6")]
    pub recording_url: Option<StringValue>,
    #[prost(message, optional, tag = "7")]
    pub dial_data: Option<VoiceCallDialInput>,
    #[prost(message, optional, tag = "8")]
    pub queue_data: Option<VoiceCallQueueInput>,
}

// Outbound message.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutboundMessageBody {
    #[prost(oneof = "outbound_message_body::Entry", tags = "1, 2, 3, 4, 5, 6, 7, 8")]
    pub entry: Option<outbound_message_body::Entry>,
}

pub mod outbound_message_body {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(string, tag = "1")]
        Text(String),
        #[prost(message, tag = "2")]
        Media(MediaMessageBody),
        #[prost(message, tag = "3")]
        Location(LocationMessageBody),
        #[prost(message, tag = "4")]
        Email(EmailMessageBody),
        #[prost(message, tag = "5")]
        Template(TemplateMessageBody),
        #[prost(string, tag = "6")]
        Url(String),
        #[prost(message, tag = "7")]
        Voice(VoiceCallDialplanMessageBody),
        #[prost(message, tag = "8")]
        Ussd(UssdMenuMessageBody),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PromptMessageMenuItemBody {
    #[prost(oneof = "prompt_message_menu_item_body::Entry", tags = "1, 2")]
    pub entry: Option<prompt_message_menu_item_body::Entry>,
}

pub mod prompt_message_menu_item_body {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(string, tag = "1")]
        Text(String),
        #[prost(message, tag = "2")]
        Media(MediaMessageBody),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutboundMessageReplyPrompt {
    #[prost(enumeration = "PromptMessageReplyAction", tag = "1")]
    pub action: i32,
    #[prost(message, repeated, tag = "2")]
    pub menu: Vec<PromptMessageMenuItemBody>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutboundMessage {
    #[prost(message, optional, tag = "1")]
    pub body: Option<OutboundMessageBody>,
    #[prost(string, repeated, tag = "2")]
    pub labels: Vec<String>,
    #[prost(message, optional, tag = "3")]
    pub provider_tag: Option<StringValue>,
    #[prost(message, optional, tag = "4")]
    pub reply_token: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub reply_prompt: Option<OutboundMessageReplyPrompt>,
}

// Inbound message.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InboundMessageBody {
    #[prost(oneof = "inbound_message_body::Entry", tags = "1, 2, 3, 4, 5, 6")]
    pub entry: Option<inbound_message_body::Entry>,
}

pub mod inbound_message_body {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(string, tag = "1")]
        Text(String),
        #[prost(message, tag = "2")]
        Media(MediaMessageBody),
        #[prost(message, tag = "3")]
        Location(LocationMessageBody),
        #[prost(message, tag = "4")]
        Email(EmailMessageBody),
        #[prost(message, tag = "5")]
        Voice(VoiceCallInputMessageBody),
        #[prost(message, tag = "6")]
        Ussd(UssdInputMessageBody),
    }
}
