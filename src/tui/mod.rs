//! Terminal User Interface for mqtt-plot.
//!
//! The chart is redrawn from a store snapshot on every tick of the event
//! loop; ingest happens on the bus thread and never touches the terminal.

mod app;
mod event;
mod input;
mod render;
mod style;
mod widgets;

pub use app::App;

/// Static description of what is being viewed, shown in the header.
#[derive(Debug, Clone)]
pub struct ViewInfo {
    /// Broker address, or `demo` for the in-process publisher.
    pub source: String,
    pub topic: String,
    pub capacity: usize,
}
