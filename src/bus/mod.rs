//! Message bus plumbing.
//!
//! The program never talks to the broker directly. A bus source (the MQTT
//! client or the in-process demo publisher) owns the connection and drives a
//! [`MessageHandler`], one message at a time, in arrival order.

pub mod demo;
pub mod mqtt;

pub use demo::DemoSource;
pub use mqtt::MqttSource;

/// Error types raised by a bus source.
#[derive(Debug, Clone)]
pub enum BusError {
    /// Subscribe request could not be queued.
    Subscribe(String),
    /// Connection-level failure reported by the client library.
    Connection(String),
}

impl std::fmt::Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusError::Subscribe(msg) => write!(f, "Subscribe error: {}", msg),
            BusError::Connection(msg) => write!(f, "Connection error: {}", msg),
        }
    }
}

impl std::error::Error for BusError {}

/// The part of a connected client a handler may use from `on_connected`.
pub trait Session {
    /// Requests a subscription to `topic`.
    fn subscribe(&mut self, topic: &str) -> Result<(), BusError>;
}

/// Callbacks invoked by a bus source.
///
/// Sources call these from their own delivery thread, never concurrently.
pub trait MessageHandler: Send {
    /// Called after every successful (re)connect, before any message of the
    /// new session is delivered.
    fn on_connected(&mut self, session: &mut dyn Session) -> Result<(), BusError>;

    /// Called once per inbound message with the raw payload bytes.
    fn on_message(&mut self, payload: &[u8]);

    /// Called when the connection drops. Sources keep polling afterwards.
    fn on_disconnected(&mut self, _error: &BusError) {}
}
