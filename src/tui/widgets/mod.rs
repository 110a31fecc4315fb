//! TUI widgets for mqtt-plot.

mod chart;
mod footer;
mod header;

pub use chart::{render_chart, render_placeholder};
pub use footer::render_footer;
pub use header::render_header;
