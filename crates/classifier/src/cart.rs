//! CART (Classification and Regression Tree) builder
//!
//! Implements deterministic exact-greedy classification tree construction
//! using Gini impurity and integer arithmetic only.

use classvent_types::VentilationLabel;
use std::collections::BTreeSet;

use crate::deterministic::SplitScore;
use crate::tree::{ClassCounts, DecisionTree, Node, THRESHOLD_SCALE};

/// Training parameters for a single tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// `None` grows the tree until every leaf is pure or unsplittable
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Sample with encoded features and its label
#[derive(Clone, Debug)]
struct Sample {
    features: Vec<i64>,
    label: VentilationLabel,
}

/// Best split found so far
#[derive(Debug, Clone)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: i64,
    score: SplitScore,
}

/// Build a classification tree using exact-greedy CART algorithm
pub struct CartBuilder {
    config: TreeConfig,
    samples: Vec<Sample>,
    feature_count: usize,
}

impl CartBuilder {
    pub fn new(features: &[Vec<i64>], labels: &[VentilationLabel], config: TreeConfig) -> Self {
        assert_eq!(features.len(), labels.len());

        let samples: Vec<Sample> = features
            .iter()
            .zip(labels.iter())
            .map(|(f, &label)| Sample {
                features: f.clone(),
                label,
            })
            .collect();

        let feature_count = samples.first().map_or(0, |s| s.features.len());

        Self {
            config,
            samples,
            feature_count,
        }
    }

    /// Build tree and return it
    pub fn build(&self) -> DecisionTree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.samples.len()).collect();

        self.build_node(&indices, 0, &mut nodes);

        DecisionTree {
            nodes,
            feature_count: self.feature_count,
        }
    }

    /// Recursively build tree nodes, returning the index of the new node
    fn build_node(
        &self,
        indices: &[usize],
        depth: usize,
        nodes: &mut Vec<Node>,
    ) -> i32 {
        let current_idx = nodes.len() as i32;
        let counts = self.class_counts(indices);

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if counts.is_pure() || depth_reached || indices.len() < self.config.min_samples_split {
            nodes.push(Node::leaf(current_idx, counts));
            return current_idx;
        }

        let split = match self.find_best_split(indices) {
            Some(s) => s,
            None => {
                // Identical feature rows with mixed labels
                nodes.push(Node::leaf(current_idx, counts));
                return current_idx;
            }
        };

        let (left_indices, right_indices) =
            self.split_samples(indices, split.feature_idx, split.threshold);

        // Reserve space for current node
        nodes.push(Node::internal(
            current_idx,
            split.feature_idx as i32,
            split.threshold,
            -1,
            -1,
            counts,
        ));

        let left_idx = self.build_node(&left_indices, depth + 1, nodes);
        let right_idx = self.build_node(&right_indices, depth + 1, nodes);

        nodes[current_idx as usize].left = left_idx;
        nodes[current_idx as usize].right = right_idx;

        current_idx
    }

    /// Find best split using exact-greedy algorithm
    ///
    /// Features are scanned in column order and thresholds in ascending
    /// order. Only a strictly higher score replaces the incumbent, so on
    /// equal scores the earlier (feature, threshold) wins.
    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let mut best_split: Option<SplitCandidate> = None;

        for feature_idx in 0..self.feature_count {
            for threshold in self.midpoint_thresholds(indices, feature_idx) {
                let (left, right) = self.split_samples(indices, feature_idx, threshold);
                if left.is_empty() || right.is_empty() {
                    continue;
                }

                let score = SplitScore::new(self.gini_terms(&left), self.gini_terms(&right));
                if best_split.as_ref().is_some_and(|best| score <= best.score) {
                    continue;
                }
                best_split = Some(SplitCandidate {
                    feature_idx,
                    threshold,
                    score,
                });
            }
        }

        best_split
    }

    /// Fixed-point midpoints between consecutive distinct feature values
    fn midpoint_thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<i64> {
        let values: BTreeSet<i64> = indices
            .iter()
            .map(|&idx| self.samples[idx].features[feature_idx])
            .collect();

        values
            .iter()
            .zip(values.iter().skip(1))
            .map(|(&lo, &hi)| (lo.saturating_add(hi)).saturating_mul(THRESHOLD_SCALE) / 2)
            .collect()
    }

    /// Split samples based on threshold
    fn split_samples(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: i64,
    ) -> (Vec<usize>, Vec<usize>) {
        indices.iter().copied().partition(|&idx| {
            self.samples[idx].features[feature_idx].saturating_mul(THRESHOLD_SCALE) <= threshold
        })
    }

    fn gini_terms(&self, indices: &[usize]) -> (i128, i128) {
        let counts = self.class_counts(indices);
        (counts.sum_of_squares(), indices.len() as i128)
    }

    fn class_counts(&self, indices: &[usize]) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for &idx in indices {
            counts.add(self.samples[idx].label);
        }
        counts
    }
}
