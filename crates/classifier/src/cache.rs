//! Content-addressed cache of trained classifiers
//!
//! Entries are keyed by the Blake3 digest of the training set plus the tree
//! parameters, so a changed dataset can never be served a stale model.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::cart::TreeConfig;
use crate::dataset::Dataset;
use crate::errors::Result;
use crate::trainer::{ClassifierTrainer, TrainedClassifier};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    dataset_hash: String,
    config: TreeConfig,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Thread-safe cache of trained models
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<CacheKey, Arc<TrainedClassifier>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached model for `dataset`, training it on a miss
    pub fn get_or_train(
        &self,
        trainer: &ClassifierTrainer,
        dataset: &Dataset,
    ) -> Result<Arc<TrainedClassifier>> {
        let key = CacheKey {
            dataset_hash: dataset.content_hash(),
            config: trainer.config(),
        };

        if let Some(model) = self.entries.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(dataset_hash = %key.dataset_hash, "model cache hit");
            return Ok(Arc::clone(model));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(dataset_hash = %key.dataset_hash, "model cache miss");

        let model = Arc::new(trainer.train(dataset)?);
        let mut entries = self.entries.write();
        // Another caller may have trained the same key meanwhile; keep theirs.
        let stored = entries.entry(key).or_insert(model);
        Ok(Arc::clone(stored))
    }

    /// Drop every model trained on the dataset with this digest
    pub fn invalidate(&self, dataset_hash: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| key.dataset_hash != dataset_hash);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
