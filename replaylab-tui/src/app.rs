//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here, including the playback session. The worker
//! thread communicates via channels; the event loop drives playback by
//! calling [`App::pump`] between input polls.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use replaylab_core::sink::LatestFrame;
use replaylab_core::{Clock, PlaybackController, PlaybackFrame, PlaybackStatus, SystemClock};
use replaylab_runner::{BuiltDataset, InputSource, ReplayConfig, StrategyParams};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Which strategy parameter a key adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    ShortWindow,
    LongWindow,
    ExtremeFear,
    ExtremeGreed,
}

impl Param {
    pub fn label(self) -> &'static str {
        match self {
            Param::ShortWindow => "short window",
            Param::LongWindow => "long window",
            Param::ExtremeFear => "extreme fear",
            Param::ExtremeGreed => "extreme greed",
        }
    }
}

pub type Session<C> = PlaybackController<C, LatestFrame>;

pub struct App<C: Clock + Clone = SystemClock> {
    pub config: ReplayConfig,
    pub source: InputSource,
    /// Parameters being edited; applied by the next rebuild.
    pub pending: StrategyParams,
    pub session: Option<Session<C>>,
    /// Last build failure, shown in the signal card until a build succeeds.
    pub error: Option<String>,
    pub building: bool,
    pub show_help: bool,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    clock: C,
    worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
}

impl<C: Clock + Clone> App<C> {
    pub fn new(
        config: ReplayConfig,
        source: InputSource,
        clock: C,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
    ) -> Self {
        Self {
            pending: config.strategy.clone(),
            config,
            source,
            session: None,
            error: None,
            building: false,
            show_help: false,
            running: true,
            status_message: None,
            clock,
            worker_tx,
            worker_rx,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// The most recent frame, if a session exists.
    pub fn frame(&self) -> Option<&PlaybackFrame> {
        self.session.as_ref().and_then(|s| s.sink().frame())
    }

    pub fn status(&self) -> PlaybackStatus {
        self.session
            .as_ref()
            .map(|s| s.status())
            .unwrap_or(PlaybackStatus::Idle)
    }

    /// True when edited parameters differ from the ones the dataset was built with.
    pub fn params_dirty(&self) -> bool {
        self.pending != self.config.strategy
    }

    /// Ask the worker to build a dataset with the pending parameters.
    pub fn request_build(&mut self) {
        if self.building {
            self.set_warning("Build already in progress");
            return;
        }
        if let Err(e) = self.pending.validate() {
            self.set_warning(e.to_string());
            return;
        }
        let mut config = self.config.clone();
        config.strategy = self.pending.clone();
        let cmd = WorkerCommand::Build {
            config,
            source: self.source.clone(),
        };
        if self.worker_tx.send(cmd).is_err() {
            self.fail_build("worker is not running".into());
            return;
        }
        self.building = true;
        self.set_status("Building dataset...");
    }

    /// Drain worker responses without blocking.
    pub fn poll_worker(&mut self) {
        while let Ok(resp) = self.worker_rx.try_recv() {
            self.handle_response(resp);
        }
    }

    pub fn handle_response(&mut self, resp: WorkerResponse) {
        self.building = false;
        match resp {
            WorkerResponse::Built(built) => self.install(built),
            WorkerResponse::BuildFailed(message) => self.fail_build(message),
        }
    }

    fn install(&mut self, built: Arc<BuiltDataset>) {
        self.config.strategy = built.params.clone();
        self.pending = built.params.clone();
        self.error = None;

        let loaded = if let Some(session) = self.session.as_mut() {
            let paused = if session.status() == PlaybackStatus::Playing {
                session.pause()
            } else {
                Ok(())
            };
            paused.and_then(|()| session.load_dataset(Arc::clone(&built.dataset)))
        } else {
            let created = PlaybackController::new(
                Arc::clone(&built.dataset),
                self.config.playback.to_playback_config(),
                self.clock.clone(),
                LatestFrame::default(),
            );
            created.map(|session| {
                self.session = Some(session);
            })
        };
        match loaded {
            Ok(()) => {
                info!(points = built.dataset.len(), "dataset installed");
                self.set_status(format!("Loaded {} points", built.dataset.len()));
            }
            Err(e) => self.fail_build(e.to_string()),
        }
    }

    fn fail_build(&mut self, message: String) {
        warn!(error = %message, "dataset unavailable");
        self.status_message = Some(("Dataset build failed".into(), StatusLevel::Error));
        self.error = Some(message);
    }

    /// Space: play or pause. A finished replay starts again from the top.
    pub fn toggle_playback(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.set_warning("No dataset loaded");
            return;
        };
        if session.status() == PlaybackStatus::Finished {
            session.reset();
        }
        if let Err(e) = session.toggle() {
            self.set_warning(e.to_string());
        }
    }

    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
            self.set_status("Reset");
        }
    }

    /// Nudge a pending parameter by `delta`, keeping the set valid.
    pub fn adjust(&mut self, param: Param, delta: i64) {
        let mut next = self.pending.clone();
        match param {
            Param::ShortWindow => next.short_window = step(next.short_window as i64, delta) as usize,
            Param::LongWindow => next.long_window = step(next.long_window as i64, delta) as usize,
            Param::ExtremeFear => next.extreme_fear = step(i64::from(next.extreme_fear), delta) as u32,
            Param::ExtremeGreed => {
                next.extreme_greed = step(i64::from(next.extreme_greed), delta) as u32
            }
        }
        match next.validate() {
            Ok(()) => {
                self.pending = next;
                self.set_status(format!("{} changed, press l to rebuild", param.label()));
            }
            Err(e) => self.set_warning(e.to_string()),
        }
    }

    /// Run due ticks.
    pub fn pump(&mut self) -> usize {
        self.session.as_mut().map(|s| s.pump()).unwrap_or(0)
    }

    /// How long the event loop may block before the next tick is due.
    pub fn poll_timeout(&self, max: Duration) -> Duration {
        self.session
            .as_ref()
            .and_then(|s| s.until_next_tick())
            .map(|d| d.min(max))
            .unwrap_or(max)
    }
}

fn step(value: i64, delta: i64) -> i64 {
    (value + delta).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{built_dataset, test_app};

    #[test]
    fn starts_without_session() {
        let (app, _clock, _rx, _tx) = test_app();
        assert!(app.session.is_none());
        assert!(app.frame().is_none());
        assert_eq!(app.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn built_response_creates_session() {
        let (mut app, _clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        let frame = app.frame().unwrap();
        assert_eq!(frame.cursor, 49);
        assert!(app.error.is_none());
    }

    #[test]
    fn failure_is_kept_until_next_success() {
        let (mut app, _clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::BuildFailed("boom".into()));
        assert_eq!(app.error.as_deref(), Some("boom"));
        assert!(app.session.is_none());

        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        assert!(app.error.is_none());
        assert!(app.session.is_some());
    }

    #[test]
    fn space_plays_and_pauses() {
        let (mut app, clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));

        app.toggle_playback();
        assert_eq!(app.status(), PlaybackStatus::Playing);
        clock.advance_millis(100);
        assert_eq!(app.pump(), 2);
        assert_eq!(app.frame().unwrap().cursor, 51);

        app.toggle_playback();
        assert_eq!(app.status(), PlaybackStatus::Paused);
        clock.advance_millis(100);
        assert_eq!(app.pump(), 0);
    }

    #[test]
    fn finished_replay_restarts_on_space() {
        let (mut app, clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        app.toggle_playback();
        clock.advance(Duration::from_secs(3_600));
        app.pump();
        assert_eq!(app.status(), PlaybackStatus::Finished);

        app.toggle_playback();
        assert_eq!(app.status(), PlaybackStatus::Playing);
        assert_eq!(app.frame().unwrap().cursor, 49);
    }

    #[test]
    fn rebuild_while_playing_pauses_and_reloads() {
        let (mut app, clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        app.toggle_playback();
        clock.advance_millis(500);
        app.pump();

        let mut config = app.config.clone();
        config.strategy.short_window = 10;
        app.handle_response(WorkerResponse::Built(built_dataset(&config)));
        assert_eq!(app.status(), PlaybackStatus::Idle);
        assert_eq!(app.frame().unwrap().cursor, 49);
        assert_eq!(app.config.strategy.short_window, 10);
    }

    #[test]
    fn rejected_rebuild_while_playing_stops_playback() {
        let (mut app, clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        app.toggle_playback();
        clock.advance_millis(100);
        app.pump();
        let cursor = app.frame().unwrap().cursor;

        let mut broken = (*built_dataset(&app.config)).clone();
        let mut dataset = (*broken.dataset).clone();
        dataset.price.bb_upper.pop();
        broken.dataset = Arc::new(dataset);
        app.handle_response(WorkerResponse::Built(Arc::new(broken)));

        assert!(app.error.as_deref().unwrap().contains("bb_upper"));
        assert_eq!(app.status(), PlaybackStatus::Paused);
        clock.advance_millis(500);
        assert_eq!(app.pump(), 0);
        assert_eq!(app.frame().unwrap().cursor, cursor);
    }

    #[test]
    fn rebuild_while_paused_reloads() {
        let (mut app, clock, _rx, _tx) = test_app();
        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        app.toggle_playback();
        clock.advance_millis(100);
        app.pump();
        app.toggle_playback();

        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        assert!(app.error.is_none());
        assert_eq!(app.status(), PlaybackStatus::Idle);
        assert_eq!(app.frame().unwrap().cursor, 49);
    }

    #[test]
    fn request_build_sends_pending_params() {
        let (mut app, _clock, rx, _tx) = test_app();
        app.adjust(Param::ShortWindow, 2);
        assert!(app.params_dirty());
        app.request_build();
        assert!(app.building);
        match rx.try_recv().unwrap() {
            WorkerCommand::Build { config, .. } => assert_eq!(config.strategy.short_window, 7),
            WorkerCommand::Shutdown => panic!("unexpected shutdown"),
        }

        // A second request while building is ignored.
        app.request_build();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn invalid_adjustment_is_rejected() {
        let (mut app, _clock, _rx, _tx) = test_app();
        app.adjust(Param::ShortWindow, 100);
        assert_eq!(app.pending.short_window, 5);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));

        app.adjust(Param::ExtremeGreed, -60);
        assert_eq!(app.pending.extreme_greed, 75);
        app.adjust(Param::ExtremeFear, -5);
        assert_eq!(app.pending.extreme_fear, 20);
    }

    #[test]
    fn poll_timeout_tracks_next_tick() {
        let (mut app, clock, _rx, _tx) = test_app();
        let max = Duration::from_millis(250);
        assert_eq!(app.poll_timeout(max), max);

        app.handle_response(WorkerResponse::Built(built_dataset(&app.config)));
        app.toggle_playback();
        clock.advance_millis(20);
        assert_eq!(app.poll_timeout(max), Duration::from_millis(30));
    }
}
