//! KPI card — trailing metrics over the revealed prefix.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use replaylab_core::KpiSet;

use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, kpis: Option<&KpiSet>) {
    let lines = match kpis {
        Some(k) => vec![
            row("Strategy return", pct(k.strategy_return), theme::pnl_color(k.strategy_return)),
            row("Benchmark return", pct(k.benchmark_return), theme::pnl_color(k.benchmark_return)),
            row(
                "Max drawdown",
                format!("{:.2}%", -k.max_drawdown * 100.0),
                theme::pnl_color(-k.max_drawdown),
            ),
            row(
                "Sharpe",
                format!("{:.2}", k.risk_adjusted_return),
                theme::sharpe_color(k.risk_adjusted_return),
            ),
            row(
                "Win rate",
                format!("{:.0}% ({} trades)", k.win_rate * 100.0, k.completed_trades),
                theme::win_rate_color(k.win_rate),
            ),
        ],
        None => vec![Line::from(Span::styled("-", theme::muted()))],
    };

    f.render_widget(Paragraph::new(lines).block(panel_block(" Performance so far ")), area);
}

fn pct(v: f64) -> String {
    format!("{:+.2}%", v * 100.0)
}

fn row(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<17}"), theme::secondary()),
        Span::styled(value, Style::default().fg(color)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(pct(0.1234), "+12.34%");
        assert_eq!(pct(-0.05), "-5.00%");
        assert_eq!(pct(0.0), "+0.00%");
    }
}
