//! # elarian
//!
//! Rust client SDK for the Elarian customer engagement platform.
//!
//! A client keeps one long-lived RSocket connection to the platform and uses
//! it in both directions:
//!
//! - **Commands** (client → server): customer state, messaging, payments and
//!   simulator actions, each answered by one typed reply
//! - **Notifications** (server → client): inbound messages, payment updates,
//!   reminders... each answered by one handler reply within 15 seconds
//!
//! Payloads are protobuf envelopes carried as RSocket request-response
//! exchanges over TCP.
//!
//! ## Example
//!
//! ```no_run
//! use elarian::message::Message;
//! use elarian::{ClientConfig, Elarian, NotificationReply};
//!
//! #[tokio::main]
//! async fn main() -> elarian::Result<()> {
//!     let client = Elarian::builder(ClientConfig::from_env()?)
//!         .handle("received_sms", |notification, ctx| async move {
//!             tracing::info!("SMS from {:?}", notification.entity);
//!             ctx.reply(NotificationReply::new().message(Message::text("Thanks!")))
//!                 .map(|_| ())
//!         })?
//!         .build()?;
//!
//!     client.connect().await?;
//!     client.wait_for_disconnect().await
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod proto;
pub mod protocol;
pub mod transport;
pub mod types;

mod client;
mod correlator;
mod customer;
mod dispatcher;
mod simulator;
mod writer;

pub use client::{Client, ClientBuilder, ConnectionState, Elarian, FromClient};
pub use config::ClientConfig;
pub use customer::Customer;
pub use dispatcher::Dispatcher;
pub use error::{ElarianError, Result};
pub use handler::{Handler, Notification, NotificationContext, NotificationReply, Role};
pub use simulator::Simulator;
pub use writer::WriterConfig;
