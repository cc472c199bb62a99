//! Codec module - conversion between application values and the wire schema.
//!
//! - [`ProtoCodec`] - protobuf encoding of envelopes (`prost`)
//! - [`enums`] - enum name/value translation
//! - [`outbound`], [`inbound`] - message bodies
//! - [`notification`] - normalized notification payloads
//! - [`data`], [`time`], [`numbers`] - app data, timestamps, customer and channel numbers
//!
//! # Example
//!
//! ```
//! use elarian::codec::{enum_value_for_name, outbound};
//! use elarian::message::Message;
//! use elarian::proto::MessagingChannel;
//!
//! assert_eq!(enum_value_for_name::<MessagingChannel>("sms").unwrap(), 1);
//!
//! let wire = outbound::serialize_message(&Message::text("hello")).unwrap();
//! assert!(wire.body.is_some());
//! ```

pub mod data;
pub mod enums;
pub mod inbound;
pub mod notification;
pub mod numbers;
pub mod outbound;
mod protobuf;
pub mod time;

pub use enums::{enum_label, enum_name_for_value, enum_value_for_name, valid_names, WireEnum};
pub use protobuf::ProtoCodec;
