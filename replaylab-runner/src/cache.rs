//! In-memory dataset cache keyed by input fingerprint.
//!
//! A built dataset depends only on the merged input rows and the strategy
//! parameters, so rebuilding with unchanged inputs returns the cached
//! `Arc` instead of rerunning the pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::StrategyParams;
use crate::data_loader::LoadedData;
use crate::pipeline::{build_dataset, BuiltDataset, PipelineError};

/// Fingerprint of a (data, parameters) pair: BLAKE3 hex digest.
pub fn fingerprint(data_hash: &str, params: &StrategyParams) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(data_hash.as_bytes());
    hasher.update(&(params.short_window as u64).to_le_bytes());
    hasher.update(&(params.long_window as u64).to_le_bytes());
    hasher.update(&params.extreme_fear.to_le_bytes());
    hasher.update(&params.extreme_greed.to_le_bytes());
    hasher.update(&(params.bollinger_window as u64).to_le_bytes());
    hasher.update(&params.bollinger_std.to_bits().to_le_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Built datasets memoized by [`fingerprint`].
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<String, Arc<BuiltDataset>>,
    hits: u64,
    misses: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Arc<BuiltDataset>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Stores `built` under its own fingerprint and returns the key.
    pub fn insert(&mut self, built: BuiltDataset) -> String {
        let key = fingerprint(&built.data_hash, &built.params);
        self.entries.insert(key.clone(), Arc::new(built));
        key
    }

    /// Returns the cached dataset for `(data, params)` or builds and stores it.
    pub fn get_or_build(
        &mut self,
        data: &LoadedData,
        params: &StrategyParams,
    ) -> Result<Arc<BuiltDataset>, PipelineError> {
        let key = fingerprint(&data.data_hash, params);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!(key = %&key[..12], "dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        self.misses += 1;
        debug!(key = %&key[..12], "dataset cache miss");
        let built = Arc::new(build_dataset(data, params)?);
        self.entries.insert(key, Arc::clone(&built));
        Ok(built)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
