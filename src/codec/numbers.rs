//! Customer numbers, channel numbers and cash.

use serde_json::{json, Value};

use super::enums::{enum_label, enum_value_for_name, WireEnum};
use crate::error::Result;
use crate::proto::{self, ActivityChannel, CustomerNumberProvider, MessagingChannel, PaymentChannel};
use crate::types::{Cash, ChannelNumber, CustomerNumber};

pub fn customer_number(number: &CustomerNumber) -> Result<proto::CustomerNumber> {
    let provider = match number.provider.as_deref() {
        Some(provider) => enum_value_for_name::<CustomerNumberProvider>(provider)?,
        None => CustomerNumberProvider::Unspecified.into(),
    };
    Ok(proto::CustomerNumber {
        number: number.number.clone(),
        provider,
        partition: number.partition.clone().map(proto::StringValue::new),
    })
}

pub fn customer_number_from_wire(number: &proto::CustomerNumber) -> Result<CustomerNumber> {
    Ok(CustomerNumber {
        number: number.number.clone(),
        provider: Some(enum_label::<CustomerNumberProvider>(number.provider)?),
        partition: number.partition.as_ref().map(|p| p.value.clone()),
    })
}

pub fn customer_number_json(number: &proto::CustomerNumber) -> Result<Value> {
    Ok(serde_json::to_value(customer_number_from_wire(number)?)?)
}

pub fn messaging_channel_number(number: &ChannelNumber) -> Result<proto::MessagingChannelNumber> {
    Ok(proto::MessagingChannelNumber {
        channel: enum_value_for_name::<MessagingChannel>(&number.channel)?,
        number: number.number.clone(),
    })
}

pub fn payment_channel_number(number: &ChannelNumber) -> Result<proto::PaymentChannelNumber> {
    Ok(proto::PaymentChannelNumber {
        channel: enum_value_for_name::<PaymentChannel>(&number.channel)?,
        number: number.number.clone(),
    })
}

pub fn activity_channel_number(number: &ChannelNumber) -> Result<proto::ActivityChannelNumber> {
    Ok(proto::ActivityChannelNumber {
        channel: enum_value_for_name::<ActivityChannel>(&number.channel)?,
        number: number.number.clone(),
    })
}

/// Channel number with the channel of enum `E` decoded to its name.
pub fn channel_number_from_wire<E: WireEnum>(channel: i32, number: &str) -> Result<ChannelNumber> {
    Ok(ChannelNumber::new(enum_label::<E>(channel)?, number))
}

pub fn channel_number_json<E: WireEnum>(channel: i32, number: &str) -> Result<Value> {
    Ok(json!({
        "channel": enum_label::<E>(channel)?,
        "number": number,
    }))
}

pub fn cash(cash: &Cash) -> proto::Cash {
    proto::Cash {
        currency_code: cash.currency_code.clone(),
        amount: cash.amount,
    }
}

pub fn cash_json(cash: &proto::Cash) -> Value {
    json!({
        "currency_code": cash.currency_code,
        "amount": cash.amount,
    })
}
