//! Classvent Classifier - deterministic decision-tree ventilation classifier
//!
//! Provides the labeled dataset, the schema-driven feature encoder and an
//! integer-only CART trainer whose trees are identical across runs and
//! platforms for identical input.

pub mod cache;
pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod encoder;
pub mod errors;
pub mod tree;
pub mod trainer;

use std::path::Path;

pub use cache::{CacheStats, ModelCache};
pub use cart::TreeConfig;
pub use dataset::{Dataset, FieldRange, LabelCounts, CSV_HEADER};
pub use deterministic::SplitScore;
pub use encoder::{encode, encode_row, Column, FeatureMatrix, FeatureSchema, Field};
pub use errors::ClassifierError;
pub use tree::{ClassCounts, DecisionTree, Node, THRESHOLD_SCALE};
pub use trainer::{train_and_predict, ClassifierTrainer, TrainedClassifier};

/// Load a labeled dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset, ClassifierError> {
    Dataset::from_csv(path).map_err(|err| ClassifierError::Dataset(format!("{:#}", err)))
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
