//! Header bar: source, topic, link state and buffer fill.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ingest::IngestStatus;
use crate::plot::PlotFrame;
use crate::tui::ViewInfo;
use crate::tui::style::{Styles, Theme};

/// Renders the header bar.
pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    info: &ViewInfo,
    status: &IngestStatus,
    plot: Option<&PlotFrame>,
) {
    let link = if status.connected {
        " CONNECTED "
    } else {
        " WAITING "
    };
    let buffered = plot.map(|p| p.line.len()).unwrap_or(0);

    let mut spans = vec![
        Span::styled(" mqtt-plot ", Styles::header()),
        Span::styled(format!("│ {} ", info.source), Styles::header()),
        Span::styled(format!("│ {} ", info.topic), Styles::header()),
        Span::styled("│", Styles::header()),
        Span::styled(link, Styles::link(status.connected)),
        Span::styled(
            format!("│ {}/{} ", buffered, info.capacity),
            Styles::header(),
        ),
        Span::styled(
            format!("│ ok {} bad {} ", status.accepted, status.rejected),
            Styles::header(),
        ),
    ];

    if let Some(plot) = plot {
        let latest = &plot.latest;
        let (state, color) = if latest.is_on() {
            ("ON ", Theme::ON)
        } else {
            ("OFF ", Theme::OFF)
        };
        spans.push(Span::styled(
            format!("│ {} {} ", latest.label, latest.value),
            Styles::header(),
        ));
        spans.push(Span::styled(state, Styles::header().fg(color)));
    }

    let header = Paragraph::new(Line::from(spans)).style(Styles::header());
    frame.render_widget(header, area);
}
