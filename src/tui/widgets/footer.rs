//! Footer: key hints and the most recent ingest error.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ingest::IngestStatus;
use crate::tui::style::Styles;

pub fn render_footer(frame: &mut Frame, area: Rect, status: &IngestStatus) {
    let mut spans = vec![
        Span::styled(" q", Styles::help_key()),
        Span::styled("/", Styles::dim()),
        Span::styled("Esc", Styles::help_key()),
        Span::styled(" quit ", Styles::dim()),
    ];

    if let Some(ref error) = status.last_error {
        spans.push(Span::styled("│ last rejected: ", Styles::dim()));
        spans.push(Span::styled(error.clone(), Styles::error()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
