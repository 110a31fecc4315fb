//! Sample chart: value line with ON/OFF colored markers.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::symbols;
use ratatui::text::Line;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};

use crate::plot::{PlotFrame, TITLE, X_LABEL, Y_LABEL};
use crate::tui::style::Styles;

/// Renders the chart for a non-empty frame.
pub fn render_chart(frame: &mut Frame, area: Rect, plot: &PlotFrame) {
    // Line first so markers are painted over it.
    let datasets = vec![
        Dataset::default()
            .name("value")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Styles::line())
            .data(&plot.line),
        Dataset::default()
            .name("ON")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Styles::on())
            .data(&plot.on_points),
        Dataset::default()
            .name("OFF")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Styles::off())
            .data(&plot.off_points),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", TITLE)),
        )
        .x_axis(
            Axis::default()
                .title(Line::styled(X_LABEL, Styles::dim()))
                .style(Styles::axis())
                .bounds(plot.x_bounds)
                .labels(plot.x_labels.iter().map(String::as_str)),
        )
        .y_axis(
            Axis::default()
                .title(Line::styled(Y_LABEL, Styles::dim()))
                .style(Styles::axis())
                .bounds(plot.y_bounds)
                .labels(plot.y_labels()),
        );

    frame.render_widget(chart, area);
}

/// Renders the empty chart shown before the first sample arrives.
pub fn render_placeholder(frame: &mut Frame, area: Rect, topic: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", TITLE));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = vec![
        Line::from(""),
        Line::styled(format!("Waiting for samples on '{}'...", topic), Styles::default()),
        Line::styled("payload: YYYY-MM-DD HH:MM:SS,<value>,<flag>", Styles::dim()),
    ];
    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
