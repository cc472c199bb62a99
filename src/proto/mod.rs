//! Wire schema for the hera socket protocol.
//!
//! Messages are declared with `prost` derives so they encode exactly like the
//! generated code of the server side. Enums are declared through
//! [`wire_enum!`], which also records the short names (wire name minus the
//! enum prefix) used by the application-level API.

/// Declare a protobuf enum together with its short names.
///
/// ```ignore
/// wire_enum! {
///     pub enum MessagingChannel: "MESSAGING_CHANNEL" {
///         Unspecified = 0 => "UNSPECIFIED",
///         Sms = 1 => "SMS",
///     }
/// }
/// ```
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $prefix:literal {
            $($variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value,)+
        }

        impl $crate::codec::WireEnum for $name {
            const PREFIX: &'static str = $prefix;
            const VARIANTS: &'static [Self] = &[$(Self::$variant,)+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }
    };
}

pub mod app_socket;
pub mod common;
pub mod messaging;
pub mod payment;
pub mod simulator_socket;

pub use app_socket::*;
pub use common::*;
pub use messaging::*;
pub use payment::*;
pub use simulator_socket::*;
