//! Translation between wire enum integers and their short names.
//!
//! Wire names carry an enum prefix (`MESSAGING_CHANNEL_SMS`); the application
//! API uses the short, lower-case form (`sms`). Lookups by name are
//! case-insensitive and also accept the fully prefixed name.

use crate::error::{ElarianError, Result};

/// A protobuf enum with a known table of short names.
///
/// Implemented by the `wire_enum!` declarations in [`crate::proto`].
pub trait WireEnum: Copy + Into<i32> + 'static {
    /// Prefix shared by all wire names of the enum.
    const PREFIX: &'static str;
    /// Every declared variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Upper-case short name (`"FB_MESSENGER"`).
    fn name(self) -> &'static str;
}

/// Short name for a wire integer.
///
/// # Errors
///
/// Returns [`ElarianError::Protocol`] when the value is not declared.
pub fn enum_name_for_value<E: WireEnum>(value: i32) -> Result<&'static str> {
    E::VARIANTS
        .iter()
        .find(|variant| (**variant).into() == value)
        .map(|variant| variant.name())
        .ok_or_else(|| {
            ElarianError::Protocol(format!("unknown {} value {}", E::PREFIX, value))
        })
}

/// Lower-case short name for a wire integer, the form used in notification
/// payloads.
pub fn enum_label<E: WireEnum>(value: i32) -> Result<String> {
    enum_name_for_value::<E>(value).map(|name| name.to_ascii_lowercase())
}

/// Wire integer for a short (or fully prefixed) name.
///
/// # Errors
///
/// Returns [`ElarianError::InvalidKey`] listing the usable names.
pub fn enum_value_for_name<E: WireEnum>(name: &str) -> Result<i32> {
    let wanted = name.trim().to_ascii_uppercase();
    let short = wanted
        .strip_prefix(E::PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(&wanted);

    E::VARIANTS
        .iter()
        .find(|variant| variant.name() == short)
        .map(|variant| (*variant).into())
        .ok_or_else(|| ElarianError::InvalidKey {
            key: name.to_string(),
            valid: valid_names::<E>(),
        })
}

/// Short names a caller may pass, excluding the zero placeholders.
pub fn valid_names<E: WireEnum>() -> Vec<&'static str> {
    E::VARIANTS
        .iter()
        .map(|variant| variant.name())
        .filter(|name| *name != "UNSPECIFIED" && *name != "UNKNOWN")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{CustomerNumberProvider, MessagingChannel, PaymentStatus};

    #[test]
    fn test_name_for_value() {
        assert_eq!(
            enum_name_for_value::<MessagingChannel>(4).unwrap(),
            "FB_MESSENGER"
        );
        assert_eq!(enum_label::<PaymentStatus>(300).unwrap(), "success");
    }

    #[test]
    fn test_name_for_unknown_value() {
        let err = enum_name_for_value::<MessagingChannel>(99).unwrap_err();
        assert!(matches!(err, ElarianError::Protocol(_)));
        assert!(err.to_string().contains("MESSAGING_CHANNEL"));
    }

    #[test]
    fn test_value_for_name_is_case_insensitive() {
        assert_eq!(enum_value_for_name::<MessagingChannel>("sms").unwrap(), 1);
        assert_eq!(enum_value_for_name::<MessagingChannel>("WhatsApp").unwrap(), 6);
        assert_eq!(
            enum_value_for_name::<MessagingChannel>("MESSAGING_CHANNEL_EMAIL").unwrap(),
            7
        );
    }

    #[test]
    fn test_value_for_invalid_name() {
        let err = enum_value_for_name::<PaymentStatus>("not_a_status").unwrap_err();
        match err {
            ElarianError::InvalidKey { key, valid } => {
                assert_eq!(key, "not_a_status");
                assert!(valid.contains(&"SUCCESS"));
                assert!(!valid.contains(&"UNSPECIFIED"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_valid_names_skip_placeholder() {
        let names = valid_names::<CustomerNumberProvider>();
        assert_eq!(names, vec!["FACEBOOK", "CELLULAR", "TELEGRAM", "APP", "EMAIL"]);
    }
}
