//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::controller::RunState;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Line color of the signal series.
    pub signal: Color,
    /// Line color of the noise series.
    pub noise: Color,
    /// Color of the Running indicator.
    pub running: Color,
    /// Color of the Idle indicator.
    pub idle: Color,
    /// Color for borders, axes and separators.
    pub border: Color,
    /// Style for titles and headings.
    pub header: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            signal: Color::LightBlue,
            noise: Color::LightRed,
            running: Color::Green,
            idle: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            signal: Color::Blue,
            noise: Color::Red,
            running: Color::Green,
            idle: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for the run state indicator
    pub fn state_style(&self, state: RunState) -> Style {
        match state {
            RunState::Running => Style::default().fg(self.running).add_modifier(Modifier::BOLD),
            RunState::Idle => Style::default().fg(self.idle),
        }
    }
}
