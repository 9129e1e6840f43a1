//! Dataset export — JSON round trip with schema versioning.
//!
//! A dataset file carries the replayable [`Dataset`] together with the
//! parameters and full-run figures it was built with, so a replay can run
//! without the original CSVs. Every file has a `schema_version`; versions
//! newer than [`SCHEMA_VERSION`] are rejected on load.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use replaylab_core::domain::{Dataset, DatasetError};
use replaylab_core::strategy::Recommendation;

use crate::backtest::BacktestSummary;
use crate::config::StrategyParams;
use crate::data_loader::DataSource;
use crate::pipeline::BuiltDataset;

/// Current dataset file schema version.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported schema version {found} (max supported: {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("dataset in file is invalid: {0}")]
    Invalid(#[from] DatasetError),
}

/// On-disk form of a built dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub source: DataSource,
    pub params: StrategyParams,
    pub summary: BacktestSummary,
    pub recommendation: Recommendation,
    pub data_hash: String,
    pub dataset: Dataset,
}

impl DatasetFile {
    pub fn from_built(built: &BuiltDataset) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            source: built.source,
            params: built.params.clone(),
            summary: built.summary,
            recommendation: built.recommendation.clone(),
            data_hash: built.data_hash.clone(),
            dataset: (*built.dataset).clone(),
        }
    }

    pub fn into_built(self) -> BuiltDataset {
        BuiltDataset {
            dataset: Arc::new(self.dataset),
            summary: self.summary,
            recommendation: self.recommendation,
            params: self.params,
            source: self.source,
            data_hash: self.data_hash,
        }
    }
}

/// Serialize a built dataset to pretty JSON.
pub fn export_json(built: &BuiltDataset) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&DatasetFile::from_built(built))?)
}

/// Deserialize a dataset file, rejecting unknown schema versions and
/// datasets whose series disagree.
pub fn import_json(json: &str) -> Result<DatasetFile, ExportError> {
    let file: DatasetFile = serde_json::from_str(json)?;
    if file.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchema {
            found: file.schema_version,
            supported: SCHEMA_VERSION,
        });
    }
    file.dataset.validate()?;
    Ok(file)
}

pub fn write_dataset_file(built: &BuiltDataset, path: &Path) -> Result<(), ExportError> {
    let json = export_json(built)?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), points = built.dataset.len(), "dataset exported");
    Ok(())
}

pub fn read_dataset_file(path: &Path) -> Result<DatasetFile, ExportError> {
    let json = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = import_json(&json)?;
    info!(path = %path.display(), points = file.dataset.len(), "dataset imported");
    Ok(file)
}
