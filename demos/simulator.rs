//! Simulator - example of impersonating a customer.
//!
//! This example demonstrates:
//! - Building a simulator client (simulator mode is forced on)
//! - Observing what apps send to customers with simulator events
//! - Dialing a USSD code and paying into a wallet channel
//!
//! Run it next to `--example app` with the same environment.

use elarian::message::{InboundPart, UssdInput};
use elarian::types::{Cash, ChannelNumber};
use elarian::{ClientConfig, NotificationReply, Simulator};
use tracing_subscriber::EnvFilter;

const PHONE_NUMBER: &str = "+254711000000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let simulator = Simulator::builder(ClientConfig::from_env()?)
        .handle("send_message", |notification, ctx| async move {
            tracing::info!("App sent: {}", notification.payload["message"]);
            ctx.reply(NotificationReply::new()).map(|_| ())
        })?
        .build()?;

    simulator.connect().await?;

    let ussd = ChannelNumber::new("ussd", "*384*1#");
    let dial = UssdInput {
        status: Some("active".to_string()),
        text: Some(String::new()),
    };
    let reply = simulator
        .receive_message(PHONE_NUMBER, &ussd, "demo-session", &[InboundPart::Ussd(dial)], None)
        .await?;
    tracing::info!("App answered {:?}", reply.message.map(|m| m.body));

    let paybill = ChannelNumber::new("cellular", "525900");
    let payment = simulator
        .receive_payment(
            PHONE_NUMBER,
            &paybill,
            "demo-transaction",
            &Cash::new("KES", 100.0),
            "success",
        )
        .await?;
    tracing::info!("Payment: {}", payment.description);

    simulator.disconnect().await;
    Ok(())
}
