//! mqtt-plot - live terminal chart of sensor samples published over MQTT.
//!
//! Samples arrive as `YYYY-MM-DD HH:MM:SS,<value>,<flag>` payloads on one
//! topic. The bus thread parses them into a bounded [`sample::SharedStore`];
//! the TUI redraws a chart from a snapshot of that store on a fixed interval.

pub mod bus;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod plot;
pub mod sample;
pub mod tui;
