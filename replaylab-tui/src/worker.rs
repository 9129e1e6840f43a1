//! Background worker thread — dataset builds run here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! worker owns the dataset cache and the most recently loaded input, so a
//! rebuild with only strategy changes skips the CSV read.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use replaylab_runner::{
    load_input, BuiltDataset, DataConfig, DatasetCache, InputSource, LoadedData, PipelineError,
    ReplayConfig,
};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Build {
        config: ReplayConfig,
        source: InputSource,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Built(Arc<BuiltDataset>),
    BuildFailed(String),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("replaylab-worker".into())
        .spawn(move || worker_loop(rx, tx))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    let mut state = WorkerState::default();
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Build { config, source }) => {
                let response = match state.build(&config, &source) {
                    Ok(built) => WorkerResponse::Built(built),
                    Err(e) => {
                        warn!(error = %e, "dataset build failed");
                        WorkerResponse::BuildFailed(e.to_string())
                    }
                };
                if tx.send(response).is_err() {
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

/// Cache and last input, owned by the worker thread.
#[derive(Default)]
pub struct WorkerState {
    cache: DatasetCache,
    input: Option<(InputSource, DataConfig, LoadedData)>,
}

impl WorkerState {
    pub fn build(
        &mut self,
        config: &ReplayConfig,
        source: &InputSource,
    ) -> Result<Arc<BuiltDataset>, PipelineError> {
        config.validate()?;
        let reusable = matches!(
            &self.input,
            Some((s, d, _)) if s == source && *d == config.data
        );
        if !reusable {
            let data = load_input(config, source)?;
            self.input = Some((source.clone(), config.data.clone(), data));
        }
        match &self.input {
            Some((_, _, data)) => self.cache.get_or_build(data, &config.strategy),
            None => Err(PipelineError::Empty),
        }
    }

    /// `(hits, misses)` of the dataset cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }
}
