//! Deterministic utilities for reproducible training
//!
//! Exact rational split scoring, so identical data always produces an
//! identical tree with no floating-point drift.

use std::cmp::Ordering;

/// Gini split quality as an exact fraction
///
/// For children L and R the score is `S_L/n_L + S_R/n_R`, where `S` is the sum
/// of squared class counts. Maximizing it minimizes the weighted Gini
/// impurity of the children.
#[derive(Debug, Clone, Copy)]
pub struct SplitScore {
    numerator: i128,
    denominator: i128,
}

impl SplitScore {
    /// `left` and `right` are `(sum_of_squares, sample_count)`; both counts
    /// must be non-zero.
    pub fn new(left: (i128, i128), right: (i128, i128)) -> Self {
        let (s_left, n_left) = left;
        let (s_right, n_right) = right;
        debug_assert!(n_left > 0 && n_right > 0);
        Self {
            numerator: s_left * n_right + s_right * n_left,
            denominator: n_left * n_right,
        }
    }
}

impl PartialEq for SplitScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SplitScore {}

impl PartialOrd for SplitScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SplitScore {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.numerator * other.denominator).cmp(&(other.numerator * self.denominator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_compares_fractions_exactly() {
        // 4/2 + 1/1 = 3 versus 9/3 + 1/1 = 4
        let a = SplitScore::new((4, 2), (1, 1));
        let b = SplitScore::new((9, 3), (1, 1));
        assert!(a < b);

        // 2/2 + 2/2 == 1/1 + 1/1 even though the fractions differ.
        assert_eq!(SplitScore::new((2, 2), (2, 2)), SplitScore::new((1, 1), (1, 1)));
    }

    #[test]
    fn pure_children_beat_mixed_children() {
        // Parent (2 no, 2 yes): a perfect split versus a useless one.
        let perfect = SplitScore::new((4, 2), (4, 2));
        let useless = SplitScore::new((2, 2), (2, 2));
        assert!(perfect > useless);
    }
}
