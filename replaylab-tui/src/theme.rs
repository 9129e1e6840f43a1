//! Parrot/neon theme tokens for the ReplayLab dashboard.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal
//! - **Accent**: Electric cyan (highlights, focus, close price)
//! - **Positive**: Neon green (gains, buys, LIVE)
//! - **Negative**: Hot pink (losses, sells, errors)
//! - **Warning**: Neon orange (PAUSED, greed)
//! - **Neutral**: Cool purple (bands, hold)
//! - **Muted**: Steel blue (secondary text, IDLE)

use ratatui::style::{Color, Modifier, Style};

use replaylab_core::domain::SentimentRegime;
use replaylab_core::{PlaybackStatus, SignalKind};

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Short moving average line.
pub const SMA_SHORT: Color = Color::Rgb(255, 215, 0);
/// Long moving average line.
pub const SMA_LONG: Color = Color::Rgb(255, 105, 180);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn panel_border() -> Style {
    accent()
}

pub fn panel_title() -> Style {
    accent_bold()
}

/// Fill behind every panel.
pub fn panel_background() -> Style {
    Style::default().bg(BACKGROUND)
}

/// Green for gains (and zero), pink for losses.
pub fn pnl_color(value: f64) -> Color {
    if value >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}

pub fn sharpe_color(sharpe: f64) -> Color {
    match sharpe {
        s if s >= 2.0 => POSITIVE,
        s if s >= 1.0 => ACCENT,
        s if s >= 0.5 => NEUTRAL,
        s if s >= 0.0 => MUTED,
        _ => NEGATIVE,
    }
}

pub fn win_rate_color(win_rate: f64) -> Color {
    match win_rate {
        w if w >= 0.7 => POSITIVE,
        w if w >= 0.5 => ACCENT,
        w if w >= 0.4 => NEUTRAL,
        _ => WARNING,
    }
}

pub fn signal_color(signal: SignalKind) -> Color {
    match signal {
        SignalKind::Buy => POSITIVE,
        SignalKind::Sell => NEGATIVE,
        SignalKind::Hold => NEUTRAL,
    }
}

pub fn status_color(status: PlaybackStatus) -> Color {
    match status {
        PlaybackStatus::Playing => POSITIVE,
        PlaybackStatus::Paused => WARNING,
        PlaybackStatus::Finished => ACCENT,
        PlaybackStatus::Idle => MUTED,
    }
}

pub fn regime_color(regime: SentimentRegime) -> Color {
    match regime {
        SentimentRegime::ExtremeFear => NEGATIVE,
        SentimentRegime::Fear => Color::Rgb(255, 99, 71),
        SentimentRegime::Neutral => NEUTRAL,
        SentimentRegime::Greed => Color::Rgb(154, 205, 50),
        SentimentRegime::ExtremeGreed => POSITIVE,
    }
}
