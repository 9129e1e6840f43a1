//! Fear & Greed chart on a fixed 0–100 scale with the extreme thresholds.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

use replaylab_core::PlaybackFrame;
use replaylab_runner::StrategyParams;

use crate::theme;
use crate::ui::{panel_block, points, x_bounds};

pub fn render(f: &mut Frame, area: Rect, frame: &PlaybackFrame, params: &StrategyParams) {
    let sentiment = &frame.sentiment;
    let values = points(sentiment.values());
    let x = x_bounds(sentiment.len());
    let fear = [(x[0], f64::from(params.extreme_fear)), (x[1], f64::from(params.extreme_fear))];
    let greed = [(x[0], f64::from(params.extreme_greed)), (x[1], f64::from(params.extreme_greed))];

    let regime = sentiment.last_regime();
    let title = format!(
        " Fear & Greed  {:.0} {} ",
        sentiment.last_value(),
        regime.label()
    );

    let datasets = vec![
        Dataset::default()
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::NEGATIVE))
            .data(&fear),
        Dataset::default()
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::POSITIVE))
            .data(&greed),
        Dataset::default()
            .graph_type(GraphType::Line)
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::regime_color(regime)))
            .data(&values),
    ];

    let chart = Chart::new(datasets)
        .block(panel_block(title))
        .x_axis(Axis::default().style(theme::muted()).bounds(x))
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, 100.0])
                .labels(vec![
                    Span::styled("0", theme::muted()),
                    Span::styled("50", theme::muted()),
                    Span::styled("100", theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
