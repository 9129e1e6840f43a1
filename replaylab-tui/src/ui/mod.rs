//! Top-level UI layout — header, chart column, card column, status bar.

pub mod header;
pub mod help;
pub mod kpi_panel;
pub mod performance_chart;
pub mod price_chart;
pub mod sentiment_chart;
pub mod signal_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use replaylab_core::Clock;

use crate::app::App;
use crate::theme;

/// Draw the entire UI.
pub fn draw<C: Clock + Clone>(f: &mut Frame, app: &App<C>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render(f, rows[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(38)])
        .split(rows[1]);

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(body[0]);

    let cards = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Min(6),
        ])
        .split(body[1]);

    match app.frame() {
        Some(frame) => {
            price_chart::render(f, charts[0], frame);
            sentiment_chart::render(f, charts[1], frame, &app.config.strategy);
            performance_chart::render(f, charts[2], frame);
            kpi_panel::render(f, cards[0], Some(&frame.kpis));
        }
        None => {
            let msg = if app.building {
                "Building dataset..."
            } else {
                "No dataset loaded. Press l to build one."
            };
            placeholder(f, charts[0], " Price ", msg);
            placeholder(f, charts[1], " Fear & Greed ", "");
            placeholder(f, charts[2], " Performance ", "");
            kpi_panel::render(f, cards[0], None);
        }
    }
    signal_panel::render(f, cards[1], app);
    signal_panel::render_params(f, cards[2], app);

    status_bar::render(f, rows[2], app);

    if app.show_help {
        help::render(f, f.area());
    }
}

/// Bordered block with the standard title style.
pub fn panel_block(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border())
        .style(theme::panel_background())
        .title(title.into())
        .title_style(theme::panel_title())
}

fn placeholder(f: &mut Frame, area: Rect, title: &str, msg: &str) {
    let para = Paragraph::new(Line::from(Span::styled(msg.to_string(), theme::muted())))
        .wrap(Wrap { trim: true })
        .block(panel_block(title.to_string()));
    f.render_widget(para, area);
}

/// `(index, value)` pairs for a dense series.
pub fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// `(index, value)` pairs for the defined part of an indicator column.
pub fn optional_points(values: &[Option<f64>]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

/// `(index, close)` pairs at signal indices.
pub fn marker_points(indices: &[usize], close: &[f64]) -> Vec<(f64, f64)> {
    indices
        .iter()
        .filter_map(|&i| close.get(i).map(|&c| (i as f64, c)))
        .collect()
}

/// X axis bounds for `len` points.
pub fn x_bounds(len: usize) -> [f64; 2] {
    [0.0, (len.saturating_sub(1) as f64).max(1.0)]
}

/// Padded Y bounds over every series; `[0, 1]` when there is no data.
pub fn y_bounds(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let (lo, hi) = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    if lo > hi {
        return [0.0, 1.0];
    }
    let padding = ((hi - lo) * 0.05).max(hi.abs() * 0.001).max(1e-9);
    [lo - padding, hi + padding]
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
