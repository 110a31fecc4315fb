//! In-process demo publisher.
//!
//! Emulates the soil-moisture controller that normally publishes to the
//! sample topic: the reading drifts upward as soil dries, and once it crosses
//! the threshold the valve opens for a fixed number of ticks (flag = 1) while
//! the reading falls. Useful for trying the viewer without a broker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use tracing::info;

use super::{BusError, MessageHandler, Session};
use crate::sample::WIRE_TIME_FORMAT;

const START_READING: f64 = 2200.0;
const DRY_THRESHOLD: f64 = 2600.0;
const WATERING_TICKS: u32 = 10;
const WATERING_DROP: f64 = 45.0;

/// Deterministic moisture model driving the demo.
#[derive(Debug, Clone)]
pub struct MoistureModel {
    reading: f64,
    watering_left: u32,
    tick: u64,
}

impl Default for MoistureModel {
    fn default() -> Self {
        Self {
            reading: START_READING,
            watering_left: 0,
            tick: 0,
        }
    }
}

impl MoistureModel {
    /// Advances one tick and returns `(reading, valve_open)`.
    pub fn step(&mut self) -> (i64, bool) {
        self.tick += 1;

        if self.watering_left > 0 {
            self.watering_left -= 1;
            self.reading -= WATERING_DROP;
        } else {
            let wobble = (self.tick as f64 * 0.3).sin() * 5.0;
            self.reading += 7.0 + wobble;
            if self.reading > DRY_THRESHOLD {
                self.watering_left = WATERING_TICKS;
            }
        }

        (self.reading.round() as i64, self.watering_left > 0)
    }
}

/// Formats one wire payload stamped with the current local time.
pub fn demo_payload(reading: i64, valve_open: bool) -> String {
    format!(
        "{},{},{}",
        Local::now().format(WIRE_TIME_FORMAT),
        reading,
        u8::from(valve_open)
    )
}

struct DemoSession;

impl Session for DemoSession {
    fn subscribe(&mut self, topic: &str) -> Result<(), BusError> {
        info!(topic = %topic, "demo source subscribed");
        Ok(())
    }
}

/// Bus source that generates samples instead of receiving them.
pub struct DemoSource {
    interval: Duration,
    model: MoistureModel,
    stop: Arc<AtomicBool>,
}

impl DemoSource {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            model: MoistureModel::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends [`run`](Self::run) after the current tick.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Publishes one payload per interval to `handler` until stopped.
    pub fn run(mut self, handler: &mut dyn MessageHandler) {
        let mut session = DemoSession;
        if let Err(e) = handler.on_connected(&mut session) {
            handler.on_disconnected(&e);
            return;
        }

        while !self.stop.load(Ordering::Relaxed) {
            let (reading, valve_open) = self.model.step();
            handler.on_message(demo_payload(reading, valve_open).as_bytes());
            thread::sleep(self.interval);
        }
    }

    pub fn spawn(self, mut handler: Box<dyn MessageHandler>) -> JoinHandle<()> {
        thread::spawn(move || self.run(handler.as_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::IngestHandler;
    use crate::sample::{SharedStore, parse_payload};

    #[test]
    fn test_model_waters_after_crossing_threshold() {
        let mut model = MoistureModel::default();
        let steps: Vec<(i64, bool)> = (0..200).map(|_| model.step()).collect();

        let first_on = steps.iter().position(|&(_, on)| on).unwrap();
        assert!(steps[first_on].0 as f64 >= DRY_THRESHOLD);
        assert!(steps[..first_on].iter().all(|&(_, on)| !on));

        // Valve stays open for the watering period while the reading falls.
        let run: Vec<_> = steps[first_on..]
            .iter()
            .take_while(|&&(_, on)| on)
            .collect();
        assert_eq!(run.len() as u32, WATERING_TICKS);
        assert!(run.windows(2).all(|w| w[1].0 < w[0].0));
    }

    #[test]
    fn test_demo_payload_is_valid_wire_format() {
        let sample = parse_payload(demo_payload(2345, true).as_bytes()).unwrap();
        assert_eq!(sample.value, 2345);
        assert_eq!(sample.flag, 1);
        assert_eq!(sample.label.len(), 8);

        let sample = parse_payload(demo_payload(-1, false).as_bytes()).unwrap();
        assert_eq!(sample.flag, 0);
    }

    #[test]
    fn test_source_feeds_handler_until_stopped() {
        let store = SharedStore::new(100);
        let handler = IngestHandler::new("graph/data", store.clone());
        let stats = handler.stats();

        let source = DemoSource::new(Duration::from_millis(5));
        let stop = source.stop_flag();
        let worker = source.spawn(Box::new(handler));

        while store.len() < 3 {
            thread::sleep(Duration::from_millis(5));
        }
        stop.store(true, Ordering::Relaxed);
        worker.join().unwrap();

        let status = stats.status();
        assert!(status.connected);
        assert_eq!(status.rejected, 0);
        assert_eq!(status.accepted as usize, store.len());
    }
}
