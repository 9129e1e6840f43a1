//! Frames — the immutable output of every tick, reset and dataset load.

use chrono::NaiveDate;

use crate::metrics::KpiSet;
use crate::playback::PlaybackStatus;
use crate::signal::SignalState;
use crate::slicer::{PerformanceView, PriceView, SentimentView};

/// What produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCause {
    Tick,
    Reset,
    Load,
}

/// Latest price with the move since the previous point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub date: NaiveDate,
    pub price: f64,
    /// `None` on frames that do not represent a step (reset, load).
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
}

impl Quote {
    /// Quote at the end of `price`; with `with_change`, the move from the prior close.
    pub fn from_view(price: &PriceView, with_change: bool) -> Self {
        let close = price.close();
        let current = price.last_close();
        let (change, change_pct) = if with_change {
            let previous = if close.len() >= 2 { close[close.len() - 2] } else { current };
            let change = current - previous;
            let pct = if previous != 0.0 { change / previous * 100.0 } else { 0.0 };
            (Some(change), Some(pct))
        } else {
            (None, None)
        };
        Self {
            date: price.last_date(),
            price: current,
            change,
            change_pct,
        }
    }
}

/// One emitted view tuple.
#[derive(Debug, Clone)]
pub struct PlaybackFrame {
    pub cause: FrameCause,
    pub cursor: usize,
    pub status: PlaybackStatus,
    pub price: PriceView,
    pub sentiment: SentimentView,
    pub performance: PerformanceView,
    pub signal: SignalState,
    pub kpis: KpiSet,
    pub quote: Quote,
}
