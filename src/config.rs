//! Client configuration.
//!
//! [`ClientConfig`] carries the credentials sent in the connection handshake,
//! the endpoint, and the tuning knobs for the transport and the notification
//! deadline. It can be built in code, deserialized with serde, or read from
//! the environment.
//!
//! # Example
//!
//! ```
//! use elarian::ClientConfig;
//!
//! let config = ClientConfig::new("org-id", "app-id", "api-key")
//!     .endpoint("tcp.example.com", 8082)
//!     .allow_notifications(false);
//!
//! assert!(config.simplex_mode());
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ElarianError, Result};
use crate::writer::{
    WriterConfig, DEFAULT_BACKPRESSURE_TIMEOUT, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_MAX_PENDING_FRAMES,
};

/// How long a notification handler may take before the fallback reply is sent.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Interval between client KEEPALIVE frames.
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(20);

/// Silence after which the connection is considered dead.
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(90);

/// Configuration for a client, app or simulator connection.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub org_id: String,
    pub app_id: String,
    pub api_key: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// When false the connection is opened in simplex mode and the server
    /// never pushes notifications.
    #[serde(default = "default_true")]
    pub allow_notifications: bool,
    #[serde(default)]
    pub is_simulator: bool,
    #[serde(default = "default_notification_timeout", with = "millis")]
    pub notification_timeout: Duration,
    #[serde(default = "default_keepalive_interval", with = "millis")]
    pub keepalive_interval: Duration,
    #[serde(default = "default_max_lifetime", with = "millis")]
    pub max_lifetime: Duration,
    #[serde(default = "default_max_pending_frames")]
    pub max_pending_frames: usize,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_backpressure_timeout", with = "millis")]
    pub backpressure_timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with default options.
    pub fn new(
        org_id: impl Into<String>,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            app_id: app_id.into(),
            api_key: api_key.into(),
            host: String::new(),
            port: 0,
            allow_notifications: true,
            is_simulator: false,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            keepalive_interval: DEFAULT_KEEPALIVE_INTERVAL,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            max_pending_frames: DEFAULT_MAX_PENDING_FRAMES,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            backpressure_timeout: DEFAULT_BACKPRESSURE_TIMEOUT,
        }
    }

    /// Build a configuration from `ORG_ID`, `APP_ID`, `API_KEY`, `URL` and `PORT`.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|_| ElarianError::Configuration(format!("{} is not set", name)))
        };
        let port = var("PORT")?
            .parse::<u16>()
            .map_err(|e| ElarianError::Configuration(format!("Invalid PORT: {}", e)))?;

        Ok(Self::new(var("ORG_ID")?, var("APP_ID")?, var("API_KEY")?).endpoint(var("URL")?, port))
    }

    /// Set the server endpoint.
    pub fn endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Enable or disable server pushed notifications.
    pub fn allow_notifications(mut self, allow: bool) -> Self {
        self.allow_notifications = allow;
        self
    }

    /// Open the connection in simulator mode.
    pub fn simulator(mut self, is_simulator: bool) -> Self {
        self.is_simulator = is_simulator;
        self
    }

    /// Set the reply deadline for notification handlers.
    ///
    /// Default: 15 seconds
    pub fn notification_timeout(mut self, timeout: Duration) -> Self {
        self.notification_timeout = timeout;
        self
    }

    /// Set the keepalive interval and the maximum silent lifetime.
    pub fn keepalive(mut self, interval: Duration, max_lifetime: Duration) -> Self {
        self.keepalive_interval = interval;
        self.max_lifetime = max_lifetime;
        self
    }

    /// Set the maximum pending frames for backpressure.
    ///
    /// Default: 1024
    pub fn max_pending_frames(mut self, limit: usize) -> Self {
        self.max_pending_frames = limit;
        self
    }

    /// Simplex connections never receive notifications.
    #[inline]
    pub fn simplex_mode(&self) -> bool {
        !self.allow_notifications
    }

    /// Check that the configuration can be used to open a connection.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("org_id", &self.org_id),
            ("app_id", &self.app_id),
            ("api_key", &self.api_key),
            ("host", &self.host),
        ] {
            if value.trim().is_empty() {
                return Err(ElarianError::Configuration(format!("{} must be provided", name)));
            }
        }
        if self.port == 0 {
            return Err(ElarianError::Configuration("port must be provided".to_string()));
        }
        if self.notification_timeout.is_zero() {
            return Err(ElarianError::Configuration(
                "notification_timeout must be greater than zero".to_string(),
            ));
        }
        if self.keepalive_interval.is_zero() || self.max_lifetime < self.keepalive_interval {
            return Err(ElarianError::Configuration(
                "max_lifetime must be at least one keepalive_interval".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            max_pending_frames: self.max_pending_frames,
            channel_capacity: self.channel_capacity,
            backpressure_timeout: self.backpressure_timeout,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_timeout() -> Duration {
    DEFAULT_NOTIFICATION_TIMEOUT
}

fn default_keepalive_interval() -> Duration {
    DEFAULT_KEEPALIVE_INTERVAL
}

fn default_max_lifetime() -> Duration {
    DEFAULT_MAX_LIFETIME
}

fn default_max_pending_frames() -> usize {
    DEFAULT_MAX_PENDING_FRAMES
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_backpressure_timeout() -> Duration {
    DEFAULT_BACKPRESSURE_TIMEOUT
}

/// Durations are written as integer milliseconds in config files.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("org", "app", "key");
        assert!(config.allow_notifications);
        assert!(!config.simplex_mode());
        assert!(!config.is_simulator);
        assert_eq!(config.notification_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let config = ClientConfig::new("", "app", "key").endpoint("localhost", 8082);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("org_id"));

        let config = ClientConfig::new("org", "app", " ").endpoint("localhost", 8082);
        assert!(config.validate().unwrap_err().to_string().contains("api_key"));
    }

    #[test]
    fn test_validate_rejects_missing_endpoint() {
        let config = ClientConfig::new("org", "app", "key");
        assert!(matches!(
            config.validate(),
            Err(ElarianError::Configuration(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "org_id": "org",
            "app_id": "app",
            "api_key": "key",
            "host": "localhost",
            "port": 8082,
            "notification_timeout": 500
        }"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.notification_timeout, Duration::from_millis(500));
        assert_eq!(config.keepalive_interval, DEFAULT_KEEPALIVE_INTERVAL);
        assert!(config.allow_notifications);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_configuration() {
        let config = ClientConfig::new("org", "app", "key")
            .endpoint("localhost", 9000)
            .simulator(true)
            .keepalive(Duration::from_secs(5), Duration::from_secs(30))
            .max_pending_frames(16);

        assert!(config.is_simulator);
        assert_eq!(config.port, 9000);
        assert_eq!(config.writer_config().max_pending_frames, 16);
        assert_eq!(config.max_lifetime, Duration::from_secs(30));
    }
}
