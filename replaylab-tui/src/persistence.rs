//! Dashboard state persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use replaylab_core::Clock;
use replaylab_runner::StrategyParams;

use crate::app::App;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Last parameters a dataset was built with.
    pub strategy: Option<StrategyParams>,
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract<C: Clock + Clone>(app: &App<C>) -> PersistedState {
    PersistedState {
        strategy: Some(app.config.strategy.clone()),
    }
}

/// Apply persisted parameters unless they no longer validate.
pub fn apply<C: Clock + Clone>(app: &mut App<C>, state: PersistedState) {
    if let Some(strategy) = state.strategy.filter(|s| s.validate().is_ok()) {
        app.config.strategy = strategy.clone();
        app.pending = strategy;
    }
}
