//! Signal resolution with a wall-clock display latch.
//!
//! When the cursor lands on a buy or sell point, that signal is latched for
//! a fixed real-time duration so it stays visible while playback keeps
//! moving. Once the latch expires the resolver falls back to a passive Hold
//! derived from the most recent revealed signal.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::slicer::PriceView;

/// How long a fresh Buy/Sell stays displayed.
pub const DEFAULT_LATCH_DURATION: Duration = Duration::from_millis(2000);

pub const BUY_EXPLANATION: &str = "BUY signal triggered! Market conditions favorable.";
pub const SELL_EXPLANATION: &str = "SELL signal triggered! Taking profits.";
pub const WAITING_EXPLANATION: &str = "Waiting for entry signal...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    pub fn label(self) -> &'static str {
        match self {
            SignalKind::Buy => "BUY",
            SignalKind::Sell => "SELL",
            SignalKind::Hold => "HOLD",
        }
    }
}

/// The signal shown to the user at one cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalState {
    pub kind: SignalKind,
    pub explanation: String,
}

impl SignalState {
    fn new(kind: SignalKind, explanation: impl Into<String>) -> Self {
        Self {
            kind,
            explanation: explanation.into(),
        }
    }

    pub fn buy() -> Self {
        Self::new(SignalKind::Buy, BUY_EXPLANATION)
    }

    pub fn sell() -> Self {
        Self::new(SignalKind::Sell, SELL_EXPLANATION)
    }
}

/// A Buy/Sell held on screen until `expiry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalLatch {
    pub state: SignalState,
    pub expiry: Instant,
}

impl SignalLatch {
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expiry
    }
}

/// Resolves the current signal, owning the latch.
#[derive(Debug, Clone)]
pub struct SignalResolver {
    latch: Option<SignalLatch>,
    latch_duration: Duration,
}

impl Default for SignalResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LATCH_DURATION)
    }
}

impl SignalResolver {
    pub fn new(latch_duration: Duration) -> Self {
        Self {
            latch: None,
            latch_duration,
        }
    }

    pub fn latch(&self) -> Option<&SignalLatch> {
        self.latch.as_ref()
    }

    pub fn latch_duration(&self) -> Duration {
        self.latch_duration
    }

    /// Discard any latch.
    pub fn clear(&mut self) {
        self.latch = None;
    }

    /// Resolve the signal for the cursor at the end of `price`.
    ///
    /// Priority: buy at cursor, sell at cursor, live latch, passive Hold.
    pub fn resolve(&mut self, price: &PriceView, now: Instant) -> SignalState {
        let cursor = price.end();

        let fresh = if price.buy_indices().last() == Some(&cursor) {
            Some(SignalState::buy())
        } else if price.sell_indices().last() == Some(&cursor) {
            Some(SignalState::sell())
        } else {
            None
        };

        if let Some(state) = fresh {
            debug!(cursor, kind = ?state.kind, "signal latched");
            self.latch = Some(SignalLatch {
                state: state.clone(),
                expiry: now + self.latch_duration,
            });
            return state;
        }

        if let Some(latch) = &self.latch {
            if latch.is_live(now) {
                return latch.state.clone();
            }
            debug!(cursor, kind = ?latch.state.kind, "signal latch expired");
            self.latch = None;
        }

        Self::passive(price)
    }

    /// The Hold state implied by the most recent revealed buy or sell.
    pub fn passive(price: &PriceView) -> SignalState {
        let last_buy = price.buy_indices().last().copied();
        let last_sell = price.sell_indices().last().copied();
        let dates = price.dates();

        match (last_buy, last_sell) {
            (Some(b), Some(s)) if b > s => {
                SignalState::new(SignalKind::Hold, format!("In position since {}", dates[b]))
            }
            (Some(b), None) => {
                SignalState::new(SignalKind::Hold, format!("In position since {}", dates[b]))
            }
            (_, Some(s)) => {
                SignalState::new(SignalKind::Hold, format!("Out of market since {}", dates[s]))
            }
            (None, None) => SignalState::new(SignalKind::Hold, WAITING_EXPLANATION),
        }
    }
}
