//! USSD and SMS app - example of answering customer notifications.
//!
//! This example demonstrates:
//! - Registering notification handlers with `.handle()`
//! - Replying with a message and an app data update
//! - Sending commands to a customer from inside a handler
//!
//! # Running
//!
//! ```sh
//! ORG_ID=... APP_ID=... API_KEY=... URL=tcp.elarian.com PORT=8082 \
//!     RUST_LOG=elarian=debug cargo run --example app
//! ```

use elarian::message::Message;
use elarian::types::{ChannelNumber, Tag};
use elarian::{ClientConfig, Elarian, Handler, NotificationReply};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const SMS_SHORT_CODE: &str = "21356";

fn visits(app_data: &Option<Value>) -> u64 {
    app_data
        .as_ref()
        .and_then(|data| data.get("visits"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Elarian::builder(ClientConfig::from_env()?)
        .on("connected", Handler::lifecycle(|| tracing::info!("App is connected")))?
        .on("error", Handler::error(|e| tracing::error!("Connection error: {}", e)))?
        .handle("ussd_session", |notification, ctx| async move {
            let input = notification.payload["input"]["text"].as_str().unwrap_or("");
            let count = visits(&notification.app_data) + 1;

            if let Some(customer) = ctx.customer() {
                customer
                    .update_tags(&[Tag::new("ussd_visits", count.to_string())])
                    .await?;
            }

            let menu = match input {
                "" => Message::ussd("Welcome!\n1. Balance\n2. Quit", false),
                "1" => Message::ussd(format!("Visit number {}. Your balance is KES 0", count), true),
                _ => Message::ussd("Goodbye", true),
            };
            ctx.reply(
                NotificationReply::new()
                    .message(menu)
                    .data(json!({ "visits": count })),
            )
            .map(|_| ())
        })?
        .build()?;

    client.connect().await?;

    // Tag and greet a known customer once connected.
    let customer = client.customer_by_number("+254711000000", "cellular")?;
    let reply = customer.update_tags(&[Tag::new("demo", "true")]).await?;
    tracing::info!("Tagged customer: {}", reply.description);

    let sent = customer
        .send_message(
            &ChannelNumber::new("sms", SMS_SHORT_CODE),
            &Message::text("Dial our USSD code to check your balance"),
        )
        .await?;
    tracing::info!("Message {:?} is {}", sent.message_id, sent.status);

    client.wait_for_disconnect().await?;
    Ok(())
}
