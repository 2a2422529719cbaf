//! Decision-tree ventilation classifier
//!
//! Encodes the training set, fits one deterministic CART tree and predicts a
//! single query against the learned column schema.

use classvent_types::{ClassifierVerdict, Observation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{CartBuilder, TreeConfig};
use crate::dataset::Dataset;
use crate::encoder::{encode, encode_row};
use crate::errors::{ClassifierError, Result};
use crate::tree::DecisionTree;

/// A fitted tree together with the columns it was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainedClassifier {
    pub columns: Vec<String>,
    pub tree: DecisionTree,
}

impl TrainedClassifier {
    /// Predict the ventilation label for one observation
    ///
    /// The query is aligned to the training columns before routing.
    pub fn predict(&self, query: &Observation) -> Result<ClassifierVerdict> {
        let row = encode_row(query, &self.columns)?;
        let leaf = self.tree.leaf_for(&row)?;

        debug!(
            leaf = leaf.id,
            no = leaf.counts.no,
            yes = leaf.counts.yes,
            "classifier reached leaf"
        );

        Ok(ClassifierVerdict {
            predicted_label: leaf.counts.majority(),
            probability_yes: leaf.counts.probability_yes(),
        })
    }
}

/// Decision-tree trainer
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierTrainer {
    config: TreeConfig,
}

impl ClassifierTrainer {
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Train a tree on the given dataset
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedClassifier> {
        if dataset.is_empty() {
            return Err(ClassifierError::InsufficientData(
                "training set is empty".to_string(),
            ));
        }

        let counts = dataset.label_counts();
        if counts.no == 0 || counts.yes == 0 {
            return Err(ClassifierError::InsufficientData(format!(
                "training set holds a single class ({} NO, {} YES)",
                counts.no, counts.yes
            )));
        }

        let (features, columns) = encode(&dataset.observations(), None)?;
        let tree = CartBuilder::new(&features, &dataset.labels(), self.config).build();

        debug!(
            samples = dataset.len(),
            columns = columns.len(),
            nodes = tree.nodes.len(),
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "trained decision tree"
        );

        Ok(TrainedClassifier { columns, tree })
    }
}

/// Fit a fresh tree on `training_set` and classify `query`
pub fn train_and_predict(training_set: &Dataset, query: &Observation) -> Result<ClassifierVerdict> {
    ClassifierTrainer::default().train(training_set)?.predict(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classvent_types::{ClimateMode, VentilationLabel, WindowState};

    fn two_rows() -> Dataset {
        Dataset::new(vec![
            Observation::new(30, 60, WindowState::Closed, ClimateMode::Cooling, 32)
                .with_label(VentilationLabel::No),
            Observation::new(20, 30, WindowState::Open, ClimateMode::Heating, 12)
                .with_label(VentilationLabel::Yes),
        ])
    }

    #[test]
    fn empty_training_set_is_insufficient() {
        let query = Observation::new(25, 40, WindowState::Open, ClimateMode::None, 20);
        let err = train_and_predict(&Dataset::default(), &query).unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData(_)));
    }

    #[test]
    fn single_class_training_set_is_insufficient() {
        let rows = two_rows()
            .rows()
            .iter()
            .map(|r| r.observation.with_label(VentilationLabel::Yes))
            .collect();
        let err = ClassifierTrainer::default()
            .train(&Dataset::new(rows))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InsufficientData(_)));
    }

    #[test]
    fn test_train_simple_model() -> Result<()> {
        let model = ClassifierTrainer::default().train(&two_rows())?;

        assert_eq!(model.columns.len(), 7);
        assert_eq!(model.tree.feature_count, 7);
        assert_eq!(model.tree.leaf_count(), 2);

        let verdict = model.predict(&Observation::new(
            20,
            30,
            WindowState::Open,
            ClimateMode::Heating,
            12,
        ))?;
        assert_eq!(verdict.predicted_label, VentilationLabel::Yes);
        assert_eq!(verdict.probability_yes, 1.0);
        Ok(())
    }

    #[test]
    fn degenerate_tree_predicts_root_majority() -> Result<()> {
        let same = Observation::new(25, 40, WindowState::Open, ClimateMode::Heating, 18);
        let dataset = Dataset::new(vec![
            same.with_label(VentilationLabel::Yes),
            same.with_label(VentilationLabel::No),
            same.with_label(VentilationLabel::Yes),
        ]);

        let model = ClassifierTrainer::default().train(&dataset)?;
        assert_eq!(model.tree.nodes.len(), 1);

        let unseen = Observation::new(35, 60, WindowState::Closed, ClimateMode::None, -5);
        let verdict = model.predict(&unseen)?;
        assert_eq!(verdict.predicted_label, VentilationLabel::Yes);
        assert!((verdict.probability_yes - 2.0 / 3.0).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_determinism() -> Result<()> {
        let dataset = Dataset::builtin();
        let trainer = ClassifierTrainer::default();

        let model1 = trainer.train(&dataset)?;
        let model2 = trainer.train(&dataset)?;

        assert_eq!(model1, model2);
        Ok(())
    }
}
