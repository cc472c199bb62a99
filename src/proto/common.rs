//! Shared model: customer numbers, money, app data, indexes, reminders, activity.

use std::collections::HashMap;

use prost_types::{Duration, Timestamp};

/// `google.protobuf.StringValue`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringValue {
    #[prost(string, tag = "1")]
    pub value: String,
}

impl StringValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// `google.protobuf.Int32Value`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Int32Value {
    #[prost(int32, tag = "1")]
    pub value: i32,
}

wire_enum! {
    pub enum CustomerNumberProvider: "CUSTOMER_NUMBER_PROVIDER" {
        Unspecified = 0 => "UNSPECIFIED",
        Facebook = 1 => "FACEBOOK",
        Cellular = 2 => "CELLULAR",
        Telegram = 3 => "TELEGRAM",
        App = 4 => "APP",
        Email = 5 => "EMAIL",
    }
}

wire_enum! {
    pub enum CustomerEventDirection: "CUSTOMER_EVENT_DIRECTION" {
        Unspecified = 0 => "UNSPECIFIED",
        Inbound = 1 => "INBOUND",
        Outbound = 2 => "OUTBOUND",
    }
}

wire_enum! {
    pub enum ActivityChannel: "ACTIVITY_CHANNEL" {
        Unspecified = 0 => "UNSPECIFIED",
        Web = 1 => "WEB",
        Mobile = 2 => "MOBILE",
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerNumber {
    #[prost(string, tag = "1")]
    pub number: String,
    #[prost(enumeration = "CustomerNumberProvider", tag = "2")]
    pub provider: i32,
    #[prost(message, optional, tag = "3")]
    pub partition: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Cash {
    #[prost(string, tag = "1")]
    pub currency_code: String,
    #[prost(double, tag = "2")]
    pub amount: f64,
}

/// Opaque app data or metadata value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DataMapValue {
    #[prost(oneof = "data_map_value::Value", tags = "1, 2")]
    pub value: Option<data_map_value::Value>,
}

pub mod data_map_value {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(string, tag = "1")]
        StringVal(String),
        #[prost(bytes = "vec", tag = "2")]
        BytesVal(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IndexMapping {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(message, optional, tag = "2")]
    pub value: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerIndex {
    #[prost(message, optional, tag = "1")]
    pub mapping: Option<IndexMapping>,
    #[prost(message, optional, tag = "2")]
    pub expires_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerReminder {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(message, optional, tag = "2")]
    pub remind_at: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub interval: Option<Duration>,
    #[prost(message, optional, tag = "4")]
    pub payload: Option<StringValue>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActivityChannelNumber {
    #[prost(enumeration = "ActivityChannel", tag = "1")]
    pub channel: i32,
    #[prost(string, tag = "2")]
    pub number: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomerActivity {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(map = "string, string", tag = "2")]
    pub properties: HashMap<String, String>,
    #[prost(message, optional, tag = "3")]
    pub created_at: Option<Timestamp>,
}
