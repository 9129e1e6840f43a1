//! Price chart: close, Bollinger bands, both SMAs and trade markers.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

use replaylab_core::slicer::PriceView;
use replaylab_core::PlaybackFrame;

use crate::theme;
use crate::ui::{marker_points, optional_points, panel_block, points, x_bounds, y_bounds};

/// One plotted series, in draw order.
struct Layer {
    name: &'static str,
    color: Color,
    graph: GraphType,
    data: Vec<(f64, f64)>,
}

impl Layer {
    fn line(name: &'static str, color: Color, data: Vec<(f64, f64)>) -> Self {
        Self {
            name,
            color,
            graph: GraphType::Line,
            data,
        }
    }

    fn scatter(name: &'static str, color: Color, data: Vec<(f64, f64)>) -> Self {
        Self {
            name,
            color,
            graph: GraphType::Scatter,
            data,
        }
    }

    fn dataset(&self) -> Dataset<'_> {
        let marker = match self.graph {
            GraphType::Scatter => symbols::Marker::Dot,
            _ => symbols::Marker::Braille,
        };
        Dataset::default()
            .name(self.name)
            .marker(marker)
            .graph_type(self.graph)
            .style(Style::default().fg(self.color))
            .data(&self.data)
    }
}

fn layers(price: &PriceView) -> Vec<Layer> {
    vec![
        Layer::line("BB upper", theme::NEUTRAL, optional_points(price.bb_upper())),
        Layer::line("BB middle", theme::MUTED, optional_points(price.bb_middle())),
        Layer::line("BB lower", theme::NEUTRAL, optional_points(price.bb_lower())),
        Layer::line("SMA short", theme::SMA_SHORT, optional_points(price.sma_short())),
        Layer::line("SMA long", theme::SMA_LONG, optional_points(price.sma_long())),
        Layer::line("Close", theme::ACCENT, points(price.close())),
        Layer::scatter(
            "Buy",
            theme::POSITIVE,
            marker_points(price.buy_indices(), price.close()),
        ),
        Layer::scatter(
            "Sell",
            theme::NEGATIVE,
            marker_points(price.sell_indices(), price.close()),
        ),
    ]
}

pub fn render(f: &mut Frame, area: Rect, frame: &PlaybackFrame) {
    let price = &frame.price;
    let layers = layers(price);
    let lines: Vec<&[(f64, f64)]> = layers
        .iter()
        .filter(|l| matches!(l.graph, GraphType::Line))
        .map(|l| l.data.as_slice())
        .collect();
    let datasets: Vec<Dataset> = layers.iter().map(Layer::dataset).collect();

    let x = x_bounds(price.len());
    let y = y_bounds(&lines);
    let chart = Chart::new(datasets)
        .block(panel_block(" Price "))
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(x)
                .labels(vec![
                    Span::styled(price.dates()[0].to_string(), theme::muted()),
                    Span::styled(price.last_date().to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(y)
                .labels(vec![
                    Span::styled(format!("{:.0}", y[0]), theme::muted()),
                    Span::styled(format!("{:.0}", y[1]), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
