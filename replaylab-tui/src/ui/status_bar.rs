//! Bottom status bar — key hints and the last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use replaylab_core::Clock;

use crate::app::{App, StatusLevel};
use crate::theme;

pub fn render<C: Clock + Clone>(f: &mut Frame, area: Rect, app: &App<C>) {
    let mut spans: Vec<Span> = vec![Span::styled(
        " space:play/pause r:reset l:rebuild ?:help q:quit",
        theme::muted(),
    )];

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
