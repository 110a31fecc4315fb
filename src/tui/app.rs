//! Main TUI application.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::debug;

use crate::ingest::{IngestStats, IngestStatus};
use crate::plot::{self, PlotFrame, PlotSurface};
use crate::sample::SharedStore;

use super::ViewInfo;
use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;

/// Paints plot frames on a terminal, together with header and footer.
struct TerminalSurface<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    info: &'a ViewInfo,
    status: IngestStatus,
}

impl<B: Backend> PlotSurface for TerminalSurface<'_, B> {
    fn draw(&mut self, plot: &PlotFrame) -> io::Result<()> {
        let info = self.info;
        let status = &self.status;
        self.terminal
            .draw(|frame| render(frame, Some(plot), info, status))?;
        Ok(())
    }
}

/// Main TUI application.
pub struct App {
    store: SharedStore,
    stats: Arc<IngestStats>,
    info: ViewInfo,
}

impl App {
    /// Creates a viewer reading from `store`. `stats` feeds the header.
    pub fn new(store: SharedStore, stats: Arc<IngestStats>, info: ViewInfo) -> Self {
        Self { store, stats, info }
    }

    /// Runs the TUI until the user quits. Redraws every `tick_rate`.
    pub fn run(self, tick_rate: Duration) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal, tick_rate);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B: Backend>(
        &self,
        terminal: &mut Terminal<B>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);
        self.repaint(terminal)?;

        loop {
            match events.next() {
                Ok(Event::Tick) => {
                    self.redraw(terminal)?;
                }
                Ok(Event::Key(key)) => {
                    if handle_key(key) == KeyAction::Quit {
                        debug!("quit requested");
                        break;
                    }
                }
                Ok(Event::Resize) => self.repaint(terminal)?,
                Err(_) => break,
            }
        }

        Ok(())
    }

    /// One redraw cycle. Leaves the screen untouched while the store is
    /// empty and returns `false` in that case.
    pub fn redraw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<bool> {
        let mut surface = TerminalSurface {
            terminal,
            info: &self.info,
            status: self.stats.status(),
        };
        plot::redraw(&self.store, &mut surface)
    }

    /// Draws the current state, falling back to the waiting screen when
    /// there is nothing to plot yet. Used at startup and after a resize.
    fn repaint<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        if !self.redraw(terminal)? {
            let status = self.stats.status();
            terminal.draw(|frame| render(frame, None, &self.info, &status))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MessageHandler;
    use crate::ingest::IngestHandler;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    fn app_with_handler(capacity: usize) -> (App, IngestHandler) {
        let store = SharedStore::new(capacity);
        let handler = IngestHandler::new("graph/data", store.clone());
        let info = ViewInfo {
            source: "localhost:1883".to_string(),
            topic: "graph/data".to_string(),
            capacity,
        };
        (App::new(store, handler.stats(), info), handler)
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    /// Marker cells inside the chart body, excluding header and footer rows.
    fn marker_colors(buffer: &Buffer) -> Vec<Color> {
        let area = buffer.area;
        let mut colors = Vec::new();
        for y in area.top() + 1..area.bottom() - 1 {
            for x in area.left()..area.right() {
                let cell = &buffer[(x, y)];
                if cell.symbol() == ratatui::symbols::DOT {
                    colors.push(cell.fg);
                }
            }
        }
        colors
    }

    #[test]
    fn test_redraw_empty_store_leaves_screen_untouched() {
        let (app, _handler) = app_with_handler(10);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        assert!(!app.redraw(&mut terminal).unwrap());
        assert_eq!(terminal.backend().buffer(), &Buffer::empty(terminal.backend().buffer().area));
    }

    #[test]
    fn test_repaint_empty_store_shows_waiting_screen() {
        let (app, _handler) = app_with_handler(10);
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        app.repaint(&mut terminal).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Waiting for samples on 'graph/data'"));
        assert!(text.contains("0/10"));
    }

    #[test]
    fn test_single_on_sample_renders_green_marker() {
        let (app, mut handler) = app_with_handler(10);
        handler.on_message(b"2024-01-01 10:00:00,42,1");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        assert!(app.redraw(&mut terminal).unwrap());

        let buffer = terminal.backend().buffer();
        let text = buffer_text(buffer);
        assert!(text.contains("Real-Time Humidity (green = ON, red = OFF)"));
        assert!(text.contains("10:00:00"));
        assert!(text.contains("1/10"));

        let colors = marker_colors(buffer);
        assert!(colors.contains(&Color::Green));
        assert!(!colors.contains(&Color::Red));
    }

    #[test]
    fn test_off_sample_renders_red_marker() {
        let (app, mut handler) = app_with_handler(10);
        handler.on_message(b"2024-01-01 10:00:00,42,0");
        handler.on_message(b"2024-01-01 10:00:01,50,3");
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        assert!(app.redraw(&mut terminal).unwrap());

        let colors = marker_colors(terminal.backend().buffer());
        assert!(colors.contains(&Color::Red));
        assert!(!colors.contains(&Color::Green));
    }

    #[test]
    fn test_rejected_payload_shown_in_footer() {
        let (app, mut handler) = app_with_handler(10);
        handler.on_message(b"2024-01-01 10:00:00,42,1");
        handler.on_message(b"garbage");
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        app.redraw(&mut terminal).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("ok 1 bad 1"));
        assert!(text.contains("last rejected: expected 3 fields, got 1"));
    }
}
