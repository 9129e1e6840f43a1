//! Test helpers for building an app without a worker thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDate;
use replaylab_core::ManualClock;
use replaylab_runner::{load_and_build, BuiltDataset, InputSource, ReplayConfig};

use crate::app::App;
use crate::worker::{WorkerCommand, WorkerResponse};

/// Six months of synthetic data: 180 points.
pub fn test_config() -> ReplayConfig {
    let mut config = ReplayConfig::default();
    config.data.start_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    config.data.end_date = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
    config
}

pub fn built_dataset(config: &ReplayConfig) -> Arc<BuiltDataset> {
    Arc::new(load_and_build(config, &InputSource::synthetic()).unwrap())
}

/// App on a manual clock. The returned receiver sees every command the
/// app sends; the sender keeps the response channel open.
pub fn test_app() -> (
    App<ManualClock>,
    ManualClock,
    Receiver<WorkerCommand>,
    Sender<WorkerResponse>,
) {
    let clock = ManualClock::new();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let app = App::new(
        test_config(),
        InputSource::synthetic(),
        clock.clone(),
        cmd_tx,
        resp_rx,
    );
    (app, clock, cmd_rx, resp_tx)
}
