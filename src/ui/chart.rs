//! Signal/noise line chart.
//!
//! A pure projection of [`History`]: two series plotted against reading
//! index on a fixed 0-100 y axis.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame,
};

use crate::app::App;
use crate::data::History;

/// Fixed y axis ticks, in percent.
pub const Y_TICKS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

/// Minimum number of readings the x axis spans, so the first few points
/// are not stretched across the whole width.
const MIN_X_SPAN: f64 = 10.0;

/// X axis bounds covering every held reading.
pub fn x_bounds(history: &History) -> [f64; 2] {
    let first = history.first_index() as f64;
    let last = history.total().saturating_sub(1) as f64;
    [first, last.max(first + MIN_X_SPAN)]
}

/// Render the chart for the current history.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let signal = app.history.signal_points();
    let noise = app.history.noise_points();

    let datasets = vec![
        Dataset::default()
            .name("Signal")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.signal))
            .data(&signal),
        Dataset::default()
            .name("Noise")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(app.theme.noise))
            .data(&noise),
    ];

    let [x_min, x_max] = x_bounds(&app.history);
    let axis_style = Style::default().fg(app.theme.border);

    let x_axis = Axis::default()
        .title("Reading")
        .style(axis_style)
        .bounds([x_min, x_max])
        .labels([
            Span::raw(format!("{:.0}", x_min)),
            Span::raw(format!("{:.0}", (x_min + x_max) / 2.0)),
            Span::raw(format!("{:.0}", x_max)),
        ]);

    let y_axis = Axis::default()
        .title("Signal Strength (% of Max)")
        .style(axis_style)
        .bounds([Y_TICKS[0], Y_TICKS[Y_TICKS.len() - 1]])
        .labels(Y_TICKS.iter().map(|t| Span::raw(format!("{:.0}", t))));

    let block = Block::default()
        .title(Span::styled(
            " Wifi Signal Strength ",
            app.theme.header.add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));

    frame.render_widget(chart, area);
}
