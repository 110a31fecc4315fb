//! Ingest handler: turns bus messages into buffered samples.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::bus::{BusError, MessageHandler, Session};
use crate::sample::{SharedStore, parse_payload};

/// Counters shared between the ingest handler and the UI header.
#[derive(Debug, Default)]
pub struct IngestStats {
    connected: AtomicBool,
    accepted: AtomicU64,
    rejected: AtomicU64,
    last_error: Mutex<Option<String>>,
}

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStatus {
    pub connected: bool,
    pub accepted: u64,
    pub rejected: u64,
    pub last_error: Option<String>,
}

impl IngestStats {
    pub fn status(&self) -> IngestStatus {
        IngestStatus {
            connected: self.connected.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    fn set_last_error(&self, error: String) {
        *self
            .last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }
}

/// Subscribes to the sample topic and appends every well-formed payload to
/// the store. Malformed payloads are logged and dropped.
pub struct IngestHandler {
    topic: String,
    store: SharedStore,
    stats: Arc<IngestStats>,
}

impl IngestHandler {
    pub fn new(topic: impl Into<String>, store: SharedStore) -> Self {
        Self {
            topic: topic.into(),
            store,
            stats: Arc::new(IngestStats::default()),
        }
    }

    /// Handle to the counters, for display.
    pub fn stats(&self) -> Arc<IngestStats> {
        Arc::clone(&self.stats)
    }
}

impl MessageHandler for IngestHandler {
    fn on_connected(&mut self, session: &mut dyn Session) -> Result<(), BusError> {
        self.stats.set_connected(true);
        info!(topic = %self.topic, "connected, subscribing");
        session.subscribe(&self.topic)
    }

    fn on_message(&mut self, payload: &[u8]) {
        match parse_payload(payload) {
            Ok(sample) => {
                debug!(
                    label = %sample.label,
                    value = sample.value,
                    flag = sample.flag,
                    "sample received"
                );
                self.store.append(sample);
                self.stats.accepted.fetch_add(1, Ordering::Relaxed);
                debug!(buffered = self.store.len(), "buffer size");
            }
            Err(e) => {
                warn!(
                    payload = %String::from_utf8_lossy(payload),
                    error = %e,
                    "bad payload"
                );
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                self.stats.set_last_error(e.to_string());
            }
        }
    }

    fn on_disconnected(&mut self, error: &BusError) {
        if self.stats.connected.swap(false, Ordering::Relaxed) {
            warn!(error = %error, "disconnected");
        }
    }
}
