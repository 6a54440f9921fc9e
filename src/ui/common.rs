//! Common UI components.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::controller::RunState;

/// Render the header bar.
///
/// Displays: run state, interval, latest readings, noise average, margin.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.state();
    let interval = app.controller().interval().secs();

    let mut spans = vec![
        Span::styled(" ● ", app.theme.state_style(state)),
        Span::styled("WIFIWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("{:<8}", state.label()), app.theme.state_style(state)),
        Span::raw("│ "),
        Span::raw(format!("every {}s ", interval)),
    ];

    match app.history.latest() {
        Some(latest) => {
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("signal {:.1}% ", latest.signal()),
                Style::default().fg(app.theme.signal),
            ));
            spans.push(Span::styled(
                format!("noise {:.1}% ", latest.noise()),
                Style::default().fg(app.theme.noise),
            ));
            if let Some(avg) = app.history.noise_average() {
                spans.push(Span::raw(format!("avg {:.1}% ", avg)));
            }
            spans.push(Span::raw(format!("│ margin {:.1} ", latest.margin())));
            spans.push(Span::raw(format!("│ {} samples", app.history.total())));
        }
        None => spans.push(Span::styled(
            "│ no samples yet",
            Style::default().add_modifier(Modifier::DIM),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows: time of the last sample, data source, available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.state() {
        RunState::Idle => "space:start +/-:interval ?:help q:quit",
        RunState::Running => "space:stop ?:help q:quit",
    };

    let status = match app.history.latest() {
        Some(latest) => format!(
            " Last {} | {} → {} | {}",
            latest.timestamp().format("%H:%M:%S"),
            app.source_description(),
            app.database_description(),
            controls
        ),
        None => format!(" {} | {}", app.database_description(), controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the chart.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Sampling",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  space s     Start / stop"),
        Line::from("  + → l       Longer interval"),
        Line::from("  - ← h       Shorter interval"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?           Toggle help"),
        Line::from("  q Ctrl+Q    Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Interval changes only while stopped",
            Style::default().add_modifier(Modifier::DIM),
        )]),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
