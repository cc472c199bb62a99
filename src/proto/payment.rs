//! Payment model.

use prost_types::Timestamp;

use super::common::{Cash, CustomerNumber};

wire_enum! {
    pub enum PaymentChannel: "PAYMENT_CHANNEL" {
        Unspecified = 0 => "UNSPECIFIED",
        Cellular = 1 => "CELLULAR",
        Air = 2 => "AIR",
    }
}

wire_enum! {
    pub enum PaymentMode: "PAYMENT_MODE" {
        Unknown = 0 => "UNKNOWN",
        ConsumerToBusiness = 1 => "CONSUMER_TO_BUSINESS",
        BusinessToConsumer = 2 => "BUSINESS_TO_CONSUMER",
        BusinessToBusiness = 3 => "BUSINESS_TO_BUSINESS",
        Transfer = 4 => "TRANSFER",
    }
}

wire_enum! {
    pub enum PaymentStatus: "PAYMENT_STATUS" {
        Unspecified = 0 => "UNSPECIFIED",
        Queued = 100 => "QUEUED",
        PendingConfirmation = 101 => "PENDING_CONFIRMATION",
        PendingValidation = 102 => "PENDING_VALIDATION",
        Validated = 103 => "VALIDATED",
        InvalidRequest = 200 => "INVALID_REQUEST",
        NotSupported = 201 => "NOT_SUPPORTED",
        InsufficientFunds = 202 => "INSUFFICIENT_FUNDS",
        ApplicationError = 203 => "APPLICATION_ERROR",
        NotAllowed = 204 => "NOT_ALLOWED",
        DuplicateRequest = 205 => "DUPLICATE_REQUEST",
        InvalidPurse = 206 => "INVALID_PURSE",
        InvalidWallet = 207 => "INVALID_WALLET",
        DecommissionedCustomerId = 299 => "DECOMMISSIONED_CUSTOMER_ID",
        Success = 300 => "SUCCESS",
        PassThrough = 301 => "PASS_THROUGH",
        Failed = 400 => "FAILED",
        Throttled = 401 => "THROTTLED",
        Expired = 402 => "EXPIRED",
        Rejected = 403 => "REJECTED",
        Reversed = 500 => "REVERSED",
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaymentChannelNumber {
    #[prost(enumeration = "PaymentChannel", tag = "1")]
    pub channel: i32,
    #[prost(string, tag = "2")]
    pub number: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaymentWalletCounterParty {
    #[prost(string, tag = "1")]
    pub customer_id: String,
    #[prost(string, tag = "2")]
    pub wallet_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaymentPurseCounterParty {
    #[prost(string, tag = "1")]
    pub purse_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaymentStatusNotification {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(enumeration = "PaymentStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WalletPaymentStatusNotification {
    #[prost(string, tag = "1")]
    pub wallet_id: String,
    #[prost(string, tag = "2")]
    pub transaction_id: String,
    #[prost(enumeration = "PaymentStatus", tag = "3")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReceivedPaymentNotification {
    #[prost(string, tag = "1")]
    pub purse_id: String,
    #[prost(string, tag = "2")]
    pub transaction_id: String,
    #[prost(message, optional, tag = "3")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "4")]
    pub channel_number: Option<PaymentChannelNumber>,
    #[prost(message, optional, tag = "5")]
    pub value: Option<Cash>,
    #[prost(enumeration = "PaymentStatus", tag = "6")]
    pub status: i32,
    #[prost(message, optional, tag = "7")]
    pub created_at: Option<Timestamp>,
}
