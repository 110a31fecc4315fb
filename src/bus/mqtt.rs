//! MQTT bus source backed by `rumqttc`'s blocking client.
//!
//! The client library owns reconnection: after a connection error the next
//! poll of the event loop dials the broker again. This module only sleeps
//! between failed attempts so a dead broker doesn't spin the thread.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use rumqttc::{Client, Connection, ConnectionError, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use super::{BusError, MessageHandler, Session};
use crate::config::Config;

/// Capacity of the client's outgoing request queue.
const REQUEST_QUEUE_CAPACITY: usize = 10;

/// Pause after a connection error before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(1);

impl Session for Client {
    fn subscribe(&mut self, topic: &str) -> Result<(), BusError> {
        Client::subscribe(self, topic, QoS::AtMostOnce)
            .map_err(|e| BusError::Subscribe(e.to_string()))
    }
}

/// Connection to one broker, delivering messages to a [`MessageHandler`].
pub struct MqttSource {
    client: Client,
    connection: Connection,
    broker: String,
}

impl MqttSource {
    /// Prepares a client for the configured broker. Nothing is sent until
    /// [`run`](Self::run) starts polling.
    pub fn new(config: &Config) -> Self {
        let mut options = MqttOptions::new(config.client_id.clone(), config.host.clone(), config.port);
        options.set_keep_alive(config.keep_alive());
        let (client, connection) = Client::new(options, REQUEST_QUEUE_CAPACITY);
        Self {
            client,
            connection,
            broker: config.broker_addr(),
        }
    }

    /// Handle that can disconnect the session from another thread.
    pub fn handle(&self) -> MqttHandle {
        MqttHandle {
            client: self.client.clone(),
        }
    }

    /// Polls the connection for as long as the client library yields
    /// events, invoking `handler` for every connect and every publish, in
    /// arrival order.
    pub fn run(mut self, handler: &mut dyn MessageHandler) {
        info!(broker = %self.broker, "connecting");

        for notification in self.connection.iter() {
            if let Err(e) = dispatch(notification, handler, &mut self.client) {
                debug!(broker = %self.broker, error = %e, "connection error");
                thread::sleep(RETRY_DELAY);
            }
        }
        debug!(broker = %self.broker, "event loop finished");
    }

    /// Runs the event loop on a dedicated thread, which owns `handler`.
    pub fn spawn(self, mut handler: Box<dyn MessageHandler>) -> JoinHandle<()> {
        thread::spawn(move || self.run(handler.as_mut()))
    }
}

/// Routes one event-loop notification to `handler`.
///
/// A ConnAck (re)subscribes through `session`, a Publish hands its payload
/// to `on_message`. A connection error is reported to `on_disconnected` and
/// returned so the caller can back off before polling again.
fn dispatch(
    notification: Result<Event, ConnectionError>,
    handler: &mut dyn MessageHandler,
    session: &mut dyn Session,
) -> Result<(), BusError> {
    match notification {
        Ok(Event::Incoming(Packet::ConnAck(ack))) => {
            info!(code = ?ack.code, "connected");
            if let Err(e) = handler.on_connected(session) {
                warn!(error = %e, "subscription failed");
            }
        }
        Ok(Event::Incoming(Packet::Publish(publish))) => {
            debug!(topic = %publish.topic, bytes = publish.payload.len(), "message");
            handler.on_message(&publish.payload);
        }
        Ok(Event::Incoming(Packet::SubAck(ack))) => {
            debug!(pkid = ack.pkid, codes = ?ack.return_codes, "subscribed");
        }
        Ok(_) => {}
        Err(e) => {
            let error = BusError::Connection(e.to_string());
            handler.on_disconnected(&error);
            return Err(error);
        }
    }
    Ok(())
}

/// Cloneable handle to a running [`MqttSource`].
#[derive(Clone)]
pub struct MqttHandle {
    client: Client,
}

impl MqttHandle {
    /// Queues a DISCONNECT for the broker.
    pub fn disconnect(&self) -> Result<(), BusError> {
        self.client
            .disconnect()
            .map_err(|e| BusError::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestHandler;
    use crate::sample::{Sample, SharedStore};
    use rumqttc::{ConnAck, ConnectReturnCode, Publish, SubAck, SubscribeReasonCode};

    #[derive(Default)]
    struct RecordingSession {
        topics: Vec<String>,
    }

    impl Session for RecordingSession {
        fn subscribe(&mut self, topic: &str) -> Result<(), BusError> {
            self.topics.push(topic.to_string());
            Ok(())
        }
    }

    fn connack() -> Result<Event, ConnectionError> {
        Ok(Event::Incoming(Packet::ConnAck(ConnAck::new(
            ConnectReturnCode::Success,
            false,
        ))))
    }

    fn publish(payload: &str) -> Result<Event, ConnectionError> {
        Ok(Event::Incoming(Packet::Publish(Publish::new(
            "graph/data",
            QoS::AtMostOnce,
            payload,
        ))))
    }

    fn connection_error() -> Result<Event, ConnectionError> {
        Err(ConnectionError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        )))
    }

    #[test]
    fn test_connack_subscribes_on_every_connect() {
        let mut handler = IngestHandler::new("graph/data", SharedStore::new(10));
        let mut session = RecordingSession::default();

        assert!(dispatch(connack(), &mut handler, &mut session).is_ok());
        assert!(handler.stats().status().connected);
        assert!(dispatch(connection_error(), &mut handler, &mut session).is_err());
        assert!(dispatch(connack(), &mut handler, &mut session).is_ok());

        assert_eq!(session.topics, vec!["graph/data", "graph/data"]);
    }

    #[test]
    fn test_publishes_reach_store_in_order() {
        let store = SharedStore::new(10);
        let mut handler = IngestHandler::new("graph/data", store.clone());
        let mut session = RecordingSession::default();

        for notification in [
            connack(),
            publish("2024-01-01 10:00:00,42,1"),
            Ok(Event::Incoming(Packet::SubAck(SubAck::new(
                1,
                vec![SubscribeReasonCode::Success(QoS::AtMostOnce)],
            )))),
            publish("garbage"),
            publish("2024-01-01 10:00:01,40,0"),
        ] {
            dispatch(notification, &mut handler, &mut session).unwrap();
        }

        assert_eq!(
            store.snapshot(),
            vec![
                Sample::new("10:00:00", 42, 1),
                Sample::new("10:00:01", 40, 0)
            ]
        );
        assert_eq!(handler.stats().status().rejected, 1);
    }

    #[test]
    fn test_connection_error_reports_disconnect() {
        let store = SharedStore::new(10);
        let mut handler = IngestHandler::new("graph/data", store.clone());
        let mut session = RecordingSession::default();
        dispatch(connack(), &mut handler, &mut session).unwrap();

        let err = dispatch(connection_error(), &mut handler, &mut session).unwrap_err();
        assert!(matches!(err, BusError::Connection(ref msg) if msg.contains("reset by peer")));
        assert!(!handler.stats().status().connected);
        assert_eq!(store.len(), 0);
    }
}
