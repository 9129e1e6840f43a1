//! ReplayLab Runner — dataset production for playback.
//!
//! This crate builds on `replaylab-core` to provide:
//! - TOML configuration with defaults for every field
//! - CSV loading (price + Fear & Greed) and deterministic synthetic data
//! - The strategy pipeline: indicators, positions, signals, backtest
//! - Full-run summary metrics
//! - An in-memory dataset cache keyed by input fingerprint
//! - Versioned JSON export/import of built datasets

pub mod backtest;
pub mod cache;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod pipeline;
pub mod synthetic;

pub use backtest::{run_backtest, BacktestCurves, BacktestSummary};
pub use cache::{fingerprint, DatasetCache};
pub use config::{ConfigError, DataConfig, PlaybackSettings, ReplayConfig, StrategyParams};
pub use data_loader::{load_csv_data, DataSource, LoadError, LoadedData, MergedRow};
pub use export::{
    export_json, import_json, read_dataset_file, write_dataset_file, DatasetFile, ExportError,
    SCHEMA_VERSION,
};
pub use pipeline::{build_dataset, load_and_build, load_input, BuiltDataset, InputSource, PipelineError};
pub use synthetic::{synthetic_data, DEFAULT_SEED};
