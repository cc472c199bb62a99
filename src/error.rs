//! Error types for the Elarian client.

use thiserror::Error;

/// Main error type for all client operations.
#[derive(Debug, Error)]
pub enum ElarianError {
    /// I/O error on the transport socket.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (app data, metadata, config).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protobuf encoding error.
    #[error("Protobuf encode error: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Protobuf decoding error.
    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Invalid client or command configuration (missing credentials, missing ids, ...).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Event name is not part of the role's allow-list.
    #[error("Unrecognized event ({0})")]
    InvalidEvent(String),

    /// Handler shape does not fit the event it was registered for.
    #[error("Invalid handler provided for {event}: {reason}")]
    InvalidHandler { event: String, reason: String },

    /// Enum name that does not exist in the wire schema.
    #[error("Invalid key {key:?}. Valid keys are {valid:?}")]
    InvalidKey {
        key: String,
        valid: Vec<&'static str>,
    },

    /// Command issued while the client is not connected.
    #[error("Client is not connected")]
    NotConnected,

    /// The server answered a command with a failed status.
    #[error("Application error: {0}")]
    Application(String),

    /// RSocket ERROR frame, either for a single exchange or for the whole connection.
    #[error("Transport error ({code:#05x}): {message}")]
    Transport { code: u32, message: String },

    /// Protocol error (malformed frame, unexpected enum value, empty envelope, ...).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A notification handler failed. Logged, never returned to callers.
    #[error("Handler for {event} failed: {message}")]
    HandlerFault { event: String, message: String },

    /// Connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Backpressure timeout - write buffer full.
    #[error("Backpressure timeout")]
    BackpressureTimeout,
}

impl ElarianError {
    /// Errors raised synchronously by argument or registration checks.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ElarianError::Configuration(_)
                | ElarianError::InvalidEvent(_)
                | ElarianError::InvalidHandler { .. }
                | ElarianError::InvalidKey { .. }
        )
    }

    /// Errors that mean the connection itself is gone.
    pub fn is_connection_level(&self) -> bool {
        matches!(
            self,
            ElarianError::Transport { .. } | ElarianError::ConnectionClosed | ElarianError::Io(_)
        )
    }
}

/// Result type alias using ElarianError.
pub type Result<T> = std::result::Result<T, ElarianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_message() {
        let err = ElarianError::InvalidKey {
            key: "NOT_A_STATUS".to_string(),
            valid: vec!["QUEUED", "SUCCESS"],
        };
        assert_eq!(
            err.to_string(),
            r#"Invalid key "NOT_A_STATUS". Valid keys are ["QUEUED", "SUCCESS"]"#
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_invalid_event_mentions_name() {
        let err = ElarianError::InvalidEvent("dummy_event".to_string());
        assert!(err.to_string().contains("dummy_event"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = ElarianError::Transport {
            code: 0x201,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Transport error (0x201): boom");
        assert!(err.is_connection_level());
        assert!(!err.is_configuration());
    }
}
