//! Runtime configuration.
//!
//! All options have defaults matching the sensor firmware that publishes to
//! the broker, so running without arguments talks to a local broker on the
//! standard port.

use std::time::Duration;

/// Default broker host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default broker port (plain MQTT).
pub const DEFAULT_PORT: u16 = 1883;
/// Default topic carrying sample payloads.
pub const DEFAULT_TOPIC: &str = "graph/data";
/// Default number of samples kept in the ring buffer.
pub const DEFAULT_CAPACITY: usize = 2000;
/// Default redraw interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;
/// Default MQTT keep-alive in seconds.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 60;

/// Error returned by [`Config::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Ring buffer capacity must be at least one sample.
    ZeroCapacity,
    /// Redraw interval must be non-zero.
    ZeroInterval,
    /// Topic name is empty.
    EmptyTopic,
    /// Client id is empty.
    EmptyClientId,
    /// Keep-alive does not fit the 16-bit CONNECT field.
    KeepAliveTooLong(u64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "capacity must be at least 1"),
            ConfigError::ZeroInterval => write!(f, "redraw interval must be greater than 0 ms"),
            ConfigError::EmptyTopic => write!(f, "topic must not be empty"),
            ConfigError::EmptyClientId => write!(f, "client id must not be empty"),
            ConfigError::KeepAliveTooLong(secs) => write!(
                f,
                "keep-alive {}s exceeds the MQTT maximum of {}s",
                secs,
                u16::MAX
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub topic: String,
    pub capacity: usize,
    pub interval_ms: u64,
    pub client_id: String,
    pub keep_alive_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            topic: DEFAULT_TOPIC.to_string(),
            capacity: DEFAULT_CAPACITY,
            interval_ms: DEFAULT_INTERVAL_MS,
            client_id: default_client_id(),
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl Config {
    /// Checks option values that the rest of the program relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.topic.trim().is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        if self.client_id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        if self.keep_alive_secs > u64::from(u16::MAX) {
            return Err(ConfigError::KeepAliveTooLong(self.keep_alive_secs));
        }
        Ok(())
    }

    /// Redraw interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// `host:port` for display and logging.
    pub fn broker_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client id unique per process so two viewers on one broker don't kick
/// each other off.
pub fn default_client_id() -> String {
    format!("mqtt-plot-{}", std::process::id())
}
