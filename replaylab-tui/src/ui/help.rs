//! Help overlay — keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::theme;
use crate::ui::{centered_rect, panel_block};

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Playback");
    key(&mut lines, "Space", "Play / pause (restarts when done)");
    key(&mut lines, "r", "Reset to the initial window");
    lines.push(Line::from(""));

    section(&mut lines, "Strategy");
    key(&mut lines, "s / S", "Short SMA window down / up");
    key(&mut lines, "w / W", "Long SMA window down / up");
    key(&mut lines, "f / F", "Extreme fear threshold down / up");
    key(&mut lines, "g / G", "Extreme greed threshold down / up");
    key(&mut lines, "l", "Rebuild dataset with these parameters");
    lines.push(Line::from(""));

    section(&mut lines, "General");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q / Esc", "Quit");

    let popup = centered_rect(60, 60, area);
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(panel_block(" Help ")), popup);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>10}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
