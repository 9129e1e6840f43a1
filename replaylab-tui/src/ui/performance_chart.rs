//! Strategy vs benchmark equity.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition};
use ratatui::Frame;

use replaylab_core::PlaybackFrame;

use crate::theme;
use crate::ui::{panel_block, points, x_bounds, y_bounds};

pub fn render(f: &mut Frame, area: Rect, frame: &PlaybackFrame) {
    let perf = &frame.performance;
    let strategy = points(perf.strategy_equity());
    let benchmark = points(perf.benchmark_equity());

    let datasets = vec![
        Dataset::default()
            .name("Benchmark")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::MUTED))
            .data(&benchmark),
        Dataset::default()
            .name("Strategy")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::ACCENT))
            .data(&strategy),
    ];

    let y = y_bounds(&[strategy.as_slice(), benchmark.as_slice()]);
    let chart = Chart::new(datasets)
        .block(panel_block(" Performance "))
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(Axis::default().style(theme::muted()).bounds(x_bounds(perf.len())))
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(y)
                .labels(vec![
                    Span::styled(format!("{:.2}", y[0]), theme::muted()),
                    Span::styled(format!("{:.2}", y[1]), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
