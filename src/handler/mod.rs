//! Handler module - event registration and notification replies.
//!
//! Provides:
//! - [`HandlerRegistry`] - role-scoped event names bound to handlers
//! - [`NotificationContext`] - lets a handler reply to a notification once
//!
//! # Example
//!
//! ```
//! use elarian::handler::{Handler, HandlerRegistry, NotificationReply, Role};
//! use elarian::message::Message;
//!
//! let mut registry = HandlerRegistry::new(Role::App);
//!
//! registry
//!     .on("connected", Handler::lifecycle(|| println!("connected")))
//!     .unwrap();
//!
//! registry
//!     .on("ussd_session", Handler::notification(|_notification, ctx| async move {
//!         ctx.reply(NotificationReply::new().message(Message::ussd("Hello", true)))
//!             .map(|_| ())
//!     }))
//!     .unwrap();
//! ```

mod context;
mod registry;

pub(crate) use context::ReplyShape;
pub use context::{Entity, Notification, NotificationContext, NotificationReply};
pub use registry::{
    ErrorCallback, FnHandler, Handler, HandlerRegistry, HandlerResult, LifecycleCallback,
    NotificationHandler, Role, APP_EVENTS, LIFECYCLE_EVENTS, SIMULATOR_EVENTS,
};
