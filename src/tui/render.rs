//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::ingest::IngestStatus;
use crate::plot::PlotFrame;

use super::ViewInfo;
use super::widgets::{render_chart, render_footer, render_header, render_placeholder};

/// Main render function. `plot` is `None` until the first sample arrives.
pub fn render(
    frame: &mut Frame,
    plot: Option<&PlotFrame>,
    info: &ViewInfo,
    status: &IngestStatus,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // Chart
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    render_header(frame, chunks[0], info, status, plot);

    match plot {
        Some(plot) => render_chart(frame, chunks[1], plot),
        None => render_placeholder(frame, chunks[1], &info.topic),
    }

    render_footer(frame, chunks[2], status);
}
