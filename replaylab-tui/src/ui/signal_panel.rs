//! Signal card and parameter card.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use replaylab_core::Clock;
use replaylab_runner::InputSource;

use crate::app::App;
use crate::theme;
use crate::ui::panel_block;

/// Current signal, or the last build error.
pub fn render<C: Clock + Clone>(f: &mut Frame, area: Rect, app: &App<C>) {
    let lines = if let Some(err) = &app.error {
        vec![
            Line::from(Span::styled(
                " ERROR",
                theme::negative().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!(" {err}"), theme::secondary())),
        ]
    } else if let Some(frame) = app.frame() {
        let kind = frame.signal.kind;
        vec![
            Line::from(Span::styled(
                format!(" {}", kind.label()),
                Style::default()
                    .fg(theme::signal_color(kind))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(" {}", frame.signal.explanation),
                theme::secondary(),
            )),
        ]
    } else {
        vec![Line::from(Span::styled(" -", theme::muted()))]
    };

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel_block(" Signal "));
    f.render_widget(para, area);
}

/// Strategy parameters being edited, flagged when a rebuild is pending.
pub fn render_params<C: Clock + Clone>(f: &mut Frame, area: Rect, app: &App<C>) {
    let p = &app.pending;
    let source = match &app.source {
        InputSource::Csv => "CSV".to_string(),
        InputSource::Synthetic { seed } => format!("synthetic ({seed})"),
    };
    let mut lines = vec![
        param_line("Short SMA", p.short_window.to_string(), "s/S"),
        param_line("Long SMA", p.long_window.to_string(), "w/W"),
        param_line("Extreme fear", format!("<= {}", p.extreme_fear), "f/F"),
        param_line("Extreme greed", format!(">= {}", p.extreme_greed), "g/G"),
        Line::from(Span::styled(format!(" Data: {source}"), theme::muted())),
    ];
    if app.params_dirty() {
        lines.push(Line::from(Span::styled(" press l to rebuild", theme::warning())));
    }

    f.render_widget(Paragraph::new(lines).block(panel_block(" Strategy ")), area);
}

fn param_line(label: &str, value: String, keys: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {label:<14}"), theme::secondary()),
        Span::styled(format!("{value:<8}"), theme::text()),
        Span::styled(format!("[{keys}]"), theme::muted()),
    ])
}
