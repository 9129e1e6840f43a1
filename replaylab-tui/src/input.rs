//! Keyboard input dispatch — help overlay first, then global keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use replaylab_core::Clock;

use crate::app::{App, Param};

/// Handle a key event.
pub fn handle_key<C: Clock + Clone>(app: &mut App<C>, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // The help overlay consumes input first.
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char('r') => app.reset(),
        KeyCode::Char('l') => app.request_build(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char(c) => {
            if let Some((param, delta)) = param_key(c) {
                app.adjust(param, delta);
            }
        }
        _ => {}
    }
}

/// Lowercase decreases, uppercase increases.
fn param_key(c: char) -> Option<(Param, i64)> {
    let param = match c.to_ascii_lowercase() {
        's' => Param::ShortWindow,
        'w' => Param::LongWindow,
        'f' => Param::ExtremeFear,
        'g' => Param::ExtremeGreed,
        _ => return None,
    };
    let delta = if c.is_ascii_uppercase() { 1 } else { -1 };
    Some((param, delta))
}
