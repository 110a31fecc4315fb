//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Color palette.
pub struct Theme;

impl Theme {
    // Background colors
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;

    // Foreground colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    // Chart colors
    pub const LINE: Color = Color::Gray;
    pub const ON: Color = Color::Green;
    pub const OFF: Color = Color::Red;
    pub const AXIS: Color = Color::DarkGray;

    // Status colors
    pub const CONNECTED: Color = Color::Green;
    pub const DISCONNECTED: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Connection indicator, green when connected.
    pub fn link(connected: bool) -> Style {
        let fg = if connected {
            Theme::CONNECTED
        } else {
            Theme::DISCONNECTED
        };
        Self::header().fg(fg)
    }

    /// Value line connecting all samples.
    pub fn line() -> Style {
        Style::default().fg(Theme::LINE)
    }

    /// Marker for a sample with the flag ON.
    pub fn on() -> Style {
        Style::default().fg(Theme::ON)
    }

    /// Marker for a sample with the flag OFF.
    pub fn off() -> Style {
        Style::default().fg(Theme::OFF)
    }

    pub fn axis() -> Style {
        Style::default().fg(Theme::AXIS)
    }

    pub fn error() -> Style {
        Style::default().fg(Theme::ERROR)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Help key style (highlighted keys in help line).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }
}
