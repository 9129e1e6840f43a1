//! Header — live ticker, last date, progress and playback badge.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use replaylab_core::Clock;

use crate::app::App;
use crate::theme;
use crate::ui::panel_block;

pub fn render<C: Clock + Clone>(f: &mut Frame, area: Rect, app: &App<C>) {
    let status = app.status();
    let mut spans: Vec<Span> = vec![Span::styled(" BTC-USD ", theme::accent_bold())];

    if let Some(frame) = app.frame() {
        let q = &frame.quote;
        spans.push(Span::styled(format!(" ${:.2} ", q.price), theme::text()));
        if let (Some(change), Some(pct)) = (q.change, q.change_pct) {
            let arrow = if change >= 0.0 { "▲" } else { "▼" };
            spans.push(Span::styled(
                format!(" {arrow} {change:+.2} ({pct:+.2}%) "),
                Style::default().fg(theme::pnl_color(change)),
            ));
        }
        spans.push(Span::styled(format!("  {}  ", q.date), theme::secondary()));
        if let Some(session) = app.session.as_ref() {
            spans.push(Span::styled(
                format!("{} / {}  ", frame.cursor + 1, session.dataset().len()),
                theme::muted(),
            ));
        }
    }

    spans.push(Span::styled(
        format!("[ {} ]", status.label()),
        Style::default()
            .fg(theme::status_color(status))
            .add_modifier(Modifier::BOLD),
    ));

    let para = Paragraph::new(Line::from(spans)).block(panel_block(" ReplayLab "));
    f.render_widget(para, area);
}
