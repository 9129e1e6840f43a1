//! Playback controller — cursor, status, ticker and signal latch for one session.
//!
//! The controller is driven cooperatively: a host loop calls [`PlaybackController::pump`]
//! and the controller runs every tick whose deadline has passed. A tick is
//! synchronous: advance the cursor by one, slice all three series, compute
//! KPIs and the signal, and hand one frame to the sink.
//!
//! State machine:
//!
//! ```text
//! Idle ──start──▶ Playing ──pause──▶ Paused ──start──▶ Playing
//!                    │
//!                    └──(last index)──▶ Finished
//! any ──reset / load_dataset──▶ Idle
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, trace};

use crate::clock::Clock;
use crate::domain::{Dataset, DatasetError};
use crate::frame::{FrameCause, PlaybackFrame, Quote};
use crate::metrics::KpiSet;
use crate::signal::{SignalLatch, SignalResolver, DEFAULT_LATCH_DURATION};
use crate::sink::FrameSink;
use crate::slicer::slice_all;
use crate::ticker::Ticker;

/// Points visible before playback starts.
pub const DEFAULT_INITIAL_POINTS: usize = 50;

/// Simulated rate: one point per tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
    Finished,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Idle => "IDLE",
            PlaybackStatus::Playing => "LIVE",
            PlaybackStatus::Paused => "PAUSED",
            PlaybackStatus::Finished => "DONE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Size of the initial visible window; the cursor starts at `initial_points - 1`.
    pub initial_points: usize,
    pub tick_period: Duration,
    pub latch_duration: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_points: DEFAULT_INITIAL_POINTS,
            tick_period: DEFAULT_TICK_PERIOD,
            latch_duration: DEFAULT_LATCH_DURATION,
        }
    }
}

impl PlaybackConfig {
    fn validate(&self) -> Result<(), PlaybackError> {
        if self.initial_points == 0 {
            return Err(PlaybackError::Config("initial_points must be >= 1".into()));
        }
        if self.tick_period.is_zero() {
            return Err(PlaybackError::Config("tick_period must be non-zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot {action} while {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: PlaybackStatus,
    },

    #[error("invalid dataset: {0}")]
    Dataset(#[from] DatasetError),

    #[error("invalid playback config: {0}")]
    Config(String),
}

/// One playback session over one dataset.
pub struct PlaybackController<C: Clock, S: FrameSink> {
    dataset: Arc<Dataset>,
    config: PlaybackConfig,
    cursor: usize,
    status: PlaybackStatus,
    ticker: Ticker,
    resolver: SignalResolver,
    clock: C,
    sink: S,
}

impl<C: Clock, S: FrameSink> PlaybackController<C, S> {
    /// Create an idle session and emit the initial frame.
    pub fn new(
        dataset: impl Into<Arc<Dataset>>,
        config: PlaybackConfig,
        clock: C,
        sink: S,
    ) -> Result<Self, PlaybackError> {
        config.validate()?;
        let dataset = dataset.into();
        dataset.validate()?;

        let mut controller = Self {
            ticker: Ticker::new(config.tick_period),
            resolver: SignalResolver::new(config.latch_duration),
            cursor: 0,
            status: PlaybackStatus::Idle,
            dataset,
            config,
            clock,
            sink,
        };
        controller.rewind(FrameCause::Load);
        info!(
            points = controller.dataset.len(),
            cursor = controller.cursor,
            "playback session created"
        );
        Ok(controller)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn latch(&self) -> Option<&SignalLatch> {
        self.resolver.latch()
    }

    /// Whether a tick schedule is currently armed.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Cursor position for reset: `initial_points - 1`, clamped to the dataset.
    pub fn initial_cursor(&self) -> usize {
        (self.config.initial_points - 1).min(self.dataset.last_index())
    }

    /// Begin or resume playback. Re-arms the single ticker; never adds a second.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.status == PlaybackStatus::Finished {
            return Err(PlaybackError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }
        self.ticker.cancel();
        self.ticker.arm(self.clock.now());
        if self.status != PlaybackStatus::Playing {
            info!(cursor = self.cursor, from = ?self.status, "playback started");
        }
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    /// Stop ticking and keep the cursor where it is.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        match self.status {
            PlaybackStatus::Playing => {
                self.ticker.cancel();
                self.status = PlaybackStatus::Paused;
                info!(cursor = self.cursor, "playback paused");
                Ok(())
            }
            PlaybackStatus::Paused => Ok(()),
            status => Err(PlaybackError::InvalidTransition {
                action: "pause",
                status,
            }),
        }
    }

    /// Start when idle or paused, pause when playing.
    pub fn toggle(&mut self) -> Result<(), PlaybackError> {
        if self.status == PlaybackStatus::Playing {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Return to the initial window from any state and emit one frame.
    pub fn reset(&mut self) {
        self.rewind(FrameCause::Reset);
        info!(cursor = self.cursor, "playback reset");
    }

    /// Replace the dataset and reset onto it. Refused while playing.
    pub fn load_dataset(&mut self, dataset: impl Into<Arc<Dataset>>) -> Result<(), PlaybackError> {
        if self.status == PlaybackStatus::Playing {
            return Err(PlaybackError::InvalidTransition {
                action: "load a dataset",
                status: self.status,
            });
        }
        let dataset = dataset.into();
        dataset.validate()?;
        self.dataset = dataset;
        self.rewind(FrameCause::Load);
        info!(points = self.dataset.len(), cursor = self.cursor, "dataset loaded");
        Ok(())
    }

    /// Run every tick that is due. Returns how many ticks advanced the cursor.
    pub fn pump(&mut self) -> usize {
        let now = self.clock.now();
        let mut advanced = 0;
        while self.status == PlaybackStatus::Playing && self.ticker.fire_if_due(now) {
            if self.tick(now) {
                advanced += 1;
            }
        }
        advanced
    }

    /// Time until the next tick is due, `None` when not playing.
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.ticker.until_next(self.clock.now())
    }

    fn tick(&mut self, now: Instant) -> bool {
        if self.cursor >= self.dataset.last_index() {
            self.ticker.cancel();
            self.status = PlaybackStatus::Finished;
            info!(cursor = self.cursor, "playback finished");
            return false;
        }
        self.cursor += 1;
        trace!(cursor = self.cursor, "tick");
        self.emit(FrameCause::Tick, now);
        true
    }

    fn rewind(&mut self, cause: FrameCause) {
        self.ticker.cancel();
        self.resolver.clear();
        self.cursor = self.initial_cursor();
        self.status = PlaybackStatus::Idle;
        let now = self.clock.now();
        self.emit(cause, now);
    }

    fn emit(&mut self, cause: FrameCause, now: Instant) {
        let view = slice_all(&self.dataset, self.cursor);
        // Only a tick is an arrival; reset and load show the passive state
        // so they never leave a latch behind.
        let signal = match cause {
            FrameCause::Tick => self.resolver.resolve(&view.price, now),
            FrameCause::Reset | FrameCause::Load => SignalResolver::passive(&view.price),
        };
        let kpis = KpiSet::compute(&view.price, &view.performance);
        let quote = Quote::from_view(&view.price, cause == FrameCause::Tick);

        let frame = PlaybackFrame {
            cause,
            cursor: self.cursor,
            status: self.status,
            price: view.price,
            sentiment: view.sentiment,
            performance: view.performance,
            signal,
            kpis,
            quote,
        };
        self.sink.present(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::sink::FrameRecorder;
    use crate::test_support::dataset_with_signals;

    fn controller(n: usize) -> (PlaybackController<ManualClock, FrameRecorder>, ManualClock) {
        let clock = ManualClock::new();
        let c = PlaybackController::new(
            dataset_with_signals(n, &[], &[]),
            PlaybackConfig::default(),
            clock.clone(),
            FrameRecorder::default(),
        )
        .unwrap();
        (c, clock)
    }

    #[test]
    fn starts_idle_at_initial_window() {
        let (c, _) = controller(100);
        assert_eq!(c.status(), PlaybackStatus::Idle);
        assert_eq!(c.cursor(), 49);
        assert_eq!(c.sink().len(), 1);
        assert_eq!(c.sink().last().unwrap().cause, FrameCause::Load);
        assert!(!c.is_ticking());
    }

    #[test]
    fn short_dataset_clamps_initial_cursor() {
        let (c, _) = controller(10);
        assert_eq!(c.cursor(), 9);
    }

    #[test]
    fn rejects_zero_initial_points() {
        let cfg = PlaybackConfig {
            initial_points: 0,
            ..PlaybackConfig::default()
        };
        let r = PlaybackController::new(
            dataset_with_signals(5, &[], &[]),
            cfg,
            ManualClock::new(),
            FrameRecorder::default(),
        );
        assert!(matches!(r, Err(PlaybackError::Config(_))));
    }

    #[test]
    fn rejects_invalid_dataset() {
        let r = PlaybackController::new(
            dataset_with_signals(5, &[7], &[]),
            PlaybackConfig::default(),
            ManualClock::new(),
            FrameRecorder::default(),
        );
        assert!(matches!(r, Err(PlaybackError::Dataset(_))));
    }

    #[test]
    fn pump_without_start_does_nothing() {
        let (mut c, clock) = controller(100);
        clock.advance_millis(1000);
        assert_eq!(c.pump(), 0);
        assert_eq!(c.cursor(), 49);
    }

    #[test]
    fn pause_from_idle_is_refused() {
        let (mut c, _) = controller(100);
        assert!(matches!(
            c.pause(),
            Err(PlaybackError::InvalidTransition { action: "pause", status: PlaybackStatus::Idle })
        ));
    }

    #[test]
    fn toggle_alternates() {
        let (mut c, _) = controller(100);
        c.toggle().unwrap();
        assert_eq!(c.status(), PlaybackStatus::Playing);
        c.toggle().unwrap();
        assert_eq!(c.status(), PlaybackStatus::Paused);
        c.toggle().unwrap();
        assert_eq!(c.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn until_next_tick_reflects_schedule() {
        let (mut c, clock) = controller(100);
        assert_eq!(c.until_next_tick(), None);
        c.start().unwrap();
        clock.advance_millis(20);
        assert_eq!(c.until_next_tick(), Some(Duration::from_millis(30)));
    }
}
