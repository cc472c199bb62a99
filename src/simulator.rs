//! Simulator client: impersonates customers to exercise an app end to end.
//!
//! Commands are validated before anything is sent, so an unknown channel or
//! payment status fails with [`ElarianError::InvalidKey`] and no frame leaves
//! the client.

use std::ops::Deref;

use crate::client::{Client, ClientBuilder, FromClient};
use crate::codec::inbound::serialize_parts;
use crate::codec::numbers::{cash, messaging_channel_number, payment_channel_number};
use crate::codec::enum_value_for_name;
use crate::codec::outbound::deserialize_message;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::handler::Role;
use crate::message::InboundPart;
use crate::proto::{
    simulator_to_server_command::Entry, PaymentStatus, ReceiveMessageSimulatorCommand,
    ReceivePaymentSimulatorCommand, SimulatorToServerCommandReply, StringValue,
    UpdatePaymentStatusSimulatorCommand,
};
use crate::types::{Cash, ChannelNumber, SimulatorReply};

const DEFAULT_COST_CURRENCY: &str = "KES";

/// Simulator role client. Always connects in simulator mode.
#[derive(Clone)]
pub struct Simulator {
    client: Client,
}

impl Simulator {
    pub fn builder(config: ClientConfig) -> ClientBuilder<Simulator> {
        ClientBuilder::new(config)
    }

    /// Deliver `parts` to the app as if `phone_number` had sent them on
    /// `channel`. Costs default to KES 0.
    pub async fn receive_message(
        &self,
        phone_number: &str,
        channel: &ChannelNumber,
        session_id: &str,
        parts: &[InboundPart],
        cost: Option<&Cash>,
    ) -> Result<SimulatorReply> {
        let default_cost = Cash::new(DEFAULT_COST_CURRENCY, 0.0);
        let command = ReceiveMessageSimulatorCommand {
            customer_number: phone_number.to_string(),
            channel_number: Some(messaging_channel_number(channel)?),
            parts: serialize_parts(parts)?,
            session_id: Some(StringValue::new(session_id)),
            cost: Some(cash(cost.unwrap_or(&default_cost))),
            duration: None,
        };
        simulator_reply(self.send_simulator(Entry::ReceiveMessage(command)).await?)
    }

    /// Report a payment from `phone_number` into `channel`.
    pub async fn receive_payment(
        &self,
        phone_number: &str,
        channel: &ChannelNumber,
        transaction_id: &str,
        value: &Cash,
        status: &str,
    ) -> Result<SimulatorReply> {
        let command = ReceivePaymentSimulatorCommand {
            transaction_id: transaction_id.to_string(),
            channel_number: Some(payment_channel_number(channel)?),
            customer_number: phone_number.to_string(),
            value: Some(cash(value)),
            mode: 0,
            status: enum_value_for_name::<PaymentStatus>(status)?,
        };
        simulator_reply(self.send_simulator(Entry::ReceivePayment(command)).await?)
    }

    pub async fn update_payment_status(
        &self,
        transaction_id: &str,
        status: &str,
    ) -> Result<SimulatorReply> {
        let command = UpdatePaymentStatusSimulatorCommand {
            transaction_id: transaction_id.to_string(),
            status: enum_value_for_name::<PaymentStatus>(status)?,
        };
        simulator_reply(self.send_simulator(Entry::UpdatePaymentStatus(command)).await?)
    }
}

impl FromClient for Simulator {
    const ROLE: Role = Role::Simulator;

    fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Deref for Simulator {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

fn simulator_reply(reply: SimulatorToServerCommandReply) -> Result<SimulatorReply> {
    Ok(SimulatorReply {
        description: reply.description,
        message: reply.message.as_ref().map(deserialize_message).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::outbound::serialize_message;
    use crate::error::ElarianError;
    use crate::message::{Message, MessageBody};

    fn simulator() -> Simulator {
        Simulator::builder(ClientConfig::new("org", "app", "key").endpoint("localhost", 8082))
            .build()
            .unwrap()
    }

    #[test]
    fn test_simulator_mode_forced() {
        let simulator = simulator();
        assert_eq!(simulator.role(), Role::Simulator);
        assert!(simulator.config().is_simulator);
    }

    #[test]
    fn test_simulator_events_only() {
        let result = Simulator::builder(ClientConfig::new("org", "app", "key").endpoint("h", 1))
            .handle("received_sms", |_, _| async { Ok(()) });
        assert!(matches!(result, Err(ElarianError::InvalidEvent(_))));

        let result = Simulator::builder(ClientConfig::new("org", "app", "key").endpoint("h", 1))
            .handle("send_message", |_, _| async { Ok(()) });
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_status_rejected_before_sending() {
        let simulator = simulator();

        let err = simulator
            .update_payment_status("tx_1", "NOT_A_STATUS")
            .await
            .unwrap_err();
        match err {
            ElarianError::InvalidKey { key, valid } => {
                assert_eq!(key, "NOT_A_STATUS");
                assert!(valid.contains(&"SUCCESS"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = simulator
            .receive_payment(
                "+254711000000",
                &ChannelNumber::new("cellular", "525900"),
                "tx_1",
                &Cash::new("KES", 100.0),
                "bogus",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::InvalidKey { .. }));
    }

    #[tokio::test]
    async fn test_valid_command_needs_connection() {
        let err = simulator()
            .receive_message(
                "+254711000000",
                &ChannelNumber::new("sms", "21356"),
                "session_1",
                &[InboundPart::Text("hello".to_string())],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ElarianError::NotConnected));
    }

    #[test]
    fn test_reply_carries_app_message() {
        let reply = simulator_reply(SimulatorToServerCommandReply {
            status: true,
            description: "Delivered".to_string(),
            message: Some(serialize_message(&Message::text("Welcome")).unwrap()),
        })
        .unwrap();
        assert_eq!(reply.description, "Delivered");
        assert_eq!(
            reply.message.unwrap().body,
            MessageBody::Text("Welcome".to_string())
        );

        let empty = simulator_reply(SimulatorToServerCommandReply::default()).unwrap();
        assert!(empty.message.is_none());
    }
}
