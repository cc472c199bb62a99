//! Simulator socket: commands that impersonate customers, and the notifications
//! the server sends to a simulator when an app reaches out to a customer.

use prost_types::Duration;

use super::common::{Cash, CustomerNumber, StringValue};
use super::messaging::{InboundMessageBody, MessagingChannelNumber, OutboundMessage};
use super::payment::{
    PaymentChannel, PaymentChannelNumber, PaymentMode, PaymentPurseCounterParty, PaymentStatus,
    PaymentWalletCounterParty,
};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReceiveMessageSimulatorCommand {
    #[prost(string, tag = "1")]
    pub customer_number: String,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(message, repeated, tag = "3")]
    pub parts: Vec<InboundMessageBody>,
    #[prost(message, optional, tag = "4")]
    pub session_id: Option<StringValue>,
    #[prost(message, optional, tag = "5")]
    pub cost: Option<Cash>,
    #[prost(message, optional, tag = "6")]
    pub duration: Option<Duration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReceivePaymentSimulatorCommand {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(message, optional, tag = "2")]
    pub channel_number: Option<PaymentChannelNumber>,
    #[prost(string, tag = "3")]
    pub customer_number: String,
    #[prost(message, optional, tag = "4")]
    pub value: Option<Cash>,
    #[prost(enumeration = "PaymentMode", tag = "5")]
    pub mode: i32,
    #[prost(enumeration = "PaymentStatus", tag = "6")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdatePaymentStatusSimulatorCommand {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(enumeration = "PaymentStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SimulatorToServerCommand {
    #[prost(oneof = "simulator_to_server_command::Entry", tags = "1, 2, 3")]
    pub entry: Option<simulator_to_server_command::Entry>,
}

pub mod simulator_to_server_command {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        ReceiveMessage(ReceiveMessageSimulatorCommand),
        #[prost(message, tag = "2")]
        ReceivePayment(ReceivePaymentSimulatorCommand),
        #[prost(message, tag = "3")]
        UpdatePaymentStatus(UpdatePaymentStatusSimulatorCommand),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SimulatorToServerCommandReply {
    #[prost(bool, tag = "1")]
    pub status: bool,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(message, optional, tag = "3")]
    pub message: Option<OutboundMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendMessageSimulatorNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub customer_id: String,
    #[prost(string, tag = "3")]
    pub message_id: String,
    #[prost(message, optional, tag = "4")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "5")]
    pub channel_number: Option<MessagingChannelNumber>,
    #[prost(message, optional, tag = "6")]
    pub message: Option<OutboundMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MakeVoiceCallSimulatorNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub customer_id: String,
    #[prost(string, tag = "3")]
    pub session_id: String,
    #[prost(message, optional, tag = "4")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "5")]
    pub channel_number: Option<MessagingChannelNumber>,
}

/// Wallet or purse side of a customer payment or checkout.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum CustomerPaymentParty {
    #[prost(message, tag = "4")]
    Wallet(PaymentWalletCounterParty),
    #[prost(message, tag = "5")]
    Purse(PaymentPurseCounterParty),
}

/// Wallet or purse side of a channel payment.
#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum ChannelPaymentParty {
    #[prost(message, tag = "3")]
    Wallet(PaymentWalletCounterParty),
    #[prost(message, tag = "4")]
    Purse(PaymentPurseCounterParty),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendCustomerPaymentSimulatorNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub customer_id: String,
    #[prost(string, tag = "3")]
    pub app_id: String,
    #[prost(oneof = "CustomerPaymentParty", tags = "4, 5")]
    pub debit_party: Option<CustomerPaymentParty>,
    #[prost(string, tag = "6")]
    pub transaction_id: String,
    #[prost(message, optional, tag = "7")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "8")]
    pub channel_number: Option<PaymentChannelNumber>,
    #[prost(message, optional, tag = "9")]
    pub value: Option<Cash>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SendChannelPaymentSimulatorNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub app_id: String,
    #[prost(oneof = "ChannelPaymentParty", tags = "3, 4")]
    pub debit_party: Option<ChannelPaymentParty>,
    #[prost(string, tag = "5")]
    pub transaction_id: String,
    #[prost(enumeration = "PaymentChannel", tag = "6")]
    pub channel: i32,
    #[prost(string, tag = "7")]
    pub source: String,
    #[prost(string, tag = "8")]
    pub destination: String,
    #[prost(message, optional, tag = "9")]
    pub account: Option<StringValue>,
    #[prost(message, optional, tag = "10")]
    pub value: Option<Cash>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CheckoutPaymentSimulatorNotification {
    #[prost(string, tag = "1")]
    pub org_id: String,
    #[prost(string, tag = "2")]
    pub customer_id: String,
    #[prost(string, tag = "3")]
    pub app_id: String,
    #[prost(oneof = "CustomerPaymentParty", tags = "4, 5")]
    pub credit_party: Option<CustomerPaymentParty>,
    #[prost(string, tag = "6")]
    pub transaction_id: String,
    #[prost(message, optional, tag = "7")]
    pub customer_number: Option<CustomerNumber>,
    #[prost(message, optional, tag = "8")]
    pub channel_number: Option<PaymentChannelNumber>,
    #[prost(message, optional, tag = "9")]
    pub value: Option<Cash>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToSimulatorNotification {
    #[prost(oneof = "server_to_simulator_notification::Entry", tags = "1, 2, 3, 4, 5")]
    pub entry: Option<server_to_simulator_notification::Entry>,
}

pub mod server_to_simulator_notification {
    use super::*;

    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Entry {
        #[prost(message, tag = "1")]
        SendMessage(SendMessageSimulatorNotification),
        #[prost(message, tag = "2")]
        MakeVoiceCall(MakeVoiceCallSimulatorNotification),
        #[prost(message, tag = "3")]
        SendCustomerPayment(SendCustomerPaymentSimulatorNotification),
        #[prost(message, tag = "4")]
        SendChannelPayment(SendChannelPaymentSimulatorNotification),
        #[prost(message, tag = "5")]
        CheckoutPayment(CheckoutPaymentSimulatorNotification),
    }
}

/// Simulators never carry anything back.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServerToSimulatorNotificationReply {}
