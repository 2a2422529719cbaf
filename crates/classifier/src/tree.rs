//! Decision tree structures for ventilation classification
//!
//! Nodes carry the class counts of the training rows that reached them, so a
//! leaf yields both the majority label and the probability of YES.
//! Thresholds are fixed-point integers at [`THRESHOLD_SCALE`] precision.

use classvent_types::VentilationLabel;
use serde::{Deserialize, Serialize};

use crate::errors::{ClassifierError, Result};

/// Fixed-point scale for split thresholds. Midpoints between integer feature
/// values are exact at this scale.
pub const THRESHOLD_SCALE: i64 = 1000;

/// Per-class example counts at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassCounts {
    pub no: u32,
    pub yes: u32,
}

impl ClassCounts {
    pub fn add(&mut self, label: VentilationLabel) {
        match label {
            VentilationLabel::No => self.no += 1,
            VentilationLabel::Yes => self.yes += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.no + self.yes
    }

    pub fn is_pure(&self) -> bool {
        self.no == 0 || self.yes == 0
    }

    /// Majority class; a tie resolves to NO
    pub fn majority(&self) -> VentilationLabel {
        if self.yes > self.no {
            VentilationLabel::Yes
        } else {
            VentilationLabel::No
        }
    }

    pub fn probability_yes(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.yes as f64 / total as f64,
        }
    }

    /// Sum of squared class counts (numerator of 1 - Gini, times n)
    pub(crate) fn sum_of_squares(&self) -> i128 {
        let no = self.no as i128;
        let yes = self.yes as i128;
        no * no + yes * yes
    }
}

/// A decision tree node (internal or leaf)
///
/// Leaves have `feature_idx == -1` and `left == right == -1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Node {
    pub id: i32,
    pub left: i32,
    pub right: i32,
    pub feature_idx: i32,
    /// Rows with `value * THRESHOLD_SCALE <= threshold` go left
    pub threshold: i64,
    pub counts: ClassCounts,
}

impl Node {
    pub fn internal(
        id: i32,
        feature_idx: i32,
        threshold: i64,
        left: i32,
        right: i32,
        counts: ClassCounts,
    ) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            counts,
        }
    }

    pub fn leaf(id: i32, counts: ClassCounts) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0,
            counts,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx < 0
    }
}

/// A trained classification tree (node 0 is the root)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
    pub feature_count: usize,
}

impl DecisionTree {
    /// Route a feature row to its leaf
    pub fn leaf_for(&self, features: &[i64]) -> Result<&Node> {
        if features.len() != self.feature_count {
            return Err(ClassifierError::EncodingMismatch(format!(
                "row has {} features, tree expects {}",
                features.len(),
                self.feature_count
            )));
        }

        let mut idx = 0usize;
        loop {
            let node = self.nodes.get(idx).ok_or_else(|| {
                ClassifierError::EncodingMismatch(format!("node index {} out of bounds", idx))
            })?;

            if node.is_leaf() {
                return Ok(node);
            }

            let value = features[node.feature_idx as usize];
            idx = if value.saturating_mul(THRESHOLD_SCALE) <= node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of edges on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(node) if !node.is_leaf() => {
                    1 + walk(nodes, node.left as usize).max(walk(nodes, node.right as usize))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}
