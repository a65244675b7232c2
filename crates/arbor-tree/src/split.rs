use std::collections::HashSet;

use crate::node::Entropy;

/// Label frequencies in first-occurrence order.
///
/// Only `PartialEq` is required of labels, so counting is a linear scan over
/// the distinct labels seen so far. Label sets in classification are small.
#[derive(Debug, Clone)]
pub(crate) struct LabelCounts<'a, L> {
    counts: Vec<(&'a L, usize)>,
    total: usize,
}

impl<'a, L: PartialEq> LabelCounts<'a, L> {
    pub(crate) fn new() -> Self {
        Self {
            counts: Vec::new(),
            total: 0,
        }
    }

    /// Count the labels at `sample_indices`.
    pub(crate) fn from_indices(labels: &'a [L], sample_indices: &[usize]) -> Self {
        let mut counts = Self::new();
        for &si in sample_indices {
            counts.add(&labels[si]);
        }
        counts
    }

    pub(crate) fn add(&mut self, label: &'a L) {
        self.total += 1;
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, c)) => *c += 1,
            None => self.counts.push((label, 1)),
        }
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn n_distinct(&self) -> usize {
        self.counts.len()
    }

    /// Most frequent label; ties go to the label seen first.
    pub(crate) fn majority(&self) -> Option<&'a L> {
        let mut best: Option<(&'a L, usize)> = None;
        for &(label, count) in &self.counts {
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    /// `-Σ p·log2(p)` over the observed labels; zero for an empty set.
    pub(crate) fn entropy(&self) -> Entropy {
        if self.total == 0 {
            return Entropy::new(0.0);
        }
        let n = self.total as f64;
        let value = -self
            .counts
            .iter()
            .map(|&(_, c)| {
                let p = c as f64 / n;
                p * p.log2()
            })
            .sum::<f64>();
        Entropy::new(value.max(0.0))
    }
}

/// Shannon entropy of a label sequence, in bits.
///
/// Zero exactly when every label is identical (or the sequence is empty).
#[must_use]
pub fn entropy<L: PartialEq>(labels: &[L]) -> Entropy {
    let mut counts = LabelCounts::new();
    for label in labels {
        counts.add(label);
    }
    counts.entropy()
}

/// Information gain of splitting `labels` on `column <= threshold`.
///
/// Returns 0 when either side of the partition would be empty.
///
/// # Panics
///
/// Panics if `column` is shorter than `labels`; debug builds also reject a
/// longer `column`.
#[must_use]
pub fn information_gain<L: PartialEq>(labels: &[L], column: &[f64], threshold: f64) -> f64 {
    debug_assert_eq!(labels.len(), column.len(), "column not aligned with labels");
    let all: Vec<usize> = (0..labels.len()).collect();
    let parent = LabelCounts::from_indices(labels, &all).entropy();
    score_threshold(labels, column, &all, threshold, parent).gain
}

/// Best split found among the sampled candidate features.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitCandidate {
    /// Column index of the split feature.
    pub(crate) feature: usize,
    /// Threshold value: rows with value <= threshold go left.
    pub(crate) threshold: f64,
    /// Information gain in bits, never negative.
    pub(crate) gain: f64,
    /// Number of rows going left.
    pub(crate) n_left: usize,
    /// Number of rows going right.
    pub(crate) n_right: usize,
}

impl SplitCandidate {
    /// `true` when one side of the partition is empty.
    pub(crate) fn is_degenerate(&self) -> bool {
        self.n_left == 0 || self.n_right == 0
    }

    /// Whether `self` replaces `incumbent` as the best split so far.
    ///
    /// Strictly greater gain wins, so ties keep the earlier candidate.
    fn beats(&self, incumbent: &SplitCandidate) -> bool {
        self.gain > incumbent.gain
    }
}

struct ThresholdScore {
    gain: f64,
    n_left: usize,
    n_right: usize,
}

fn score_threshold<L: PartialEq>(
    labels: &[L],
    column: &[f64],
    sample_indices: &[usize],
    threshold: f64,
    parent: Entropy,
) -> ThresholdScore {
    let mut left = LabelCounts::new();
    let mut right = LabelCounts::new();
    for &si in sample_indices {
        if column[si] <= threshold {
            left.add(&labels[si]);
        } else {
            right.add(&labels[si]);
        }
    }
    let n_left = left.total();
    let n_right = right.total();
    if n_left == 0 || n_right == 0 {
        return ThresholdScore {
            gain: 0.0,
            n_left,
            n_right,
        };
    }
    let n = (n_left + n_right) as f64;
    let child = (n_left as f64 / n) * left.entropy().value()
        + (n_right as f64 / n) * right.entropy().value();
    ThresholdScore {
        gain: (parent.value() - child).max(0.0),
        n_left,
        n_right,
    }
}

/// Distinct values of `column` over `sample_indices`, in first-occurrence order.
fn distinct_values(column: &[f64], sample_indices: &[usize]) -> Vec<f64> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for &si in sample_indices {
        let v = column[si];
        // fold -0.0 into 0.0 so they count as one threshold
        let key = if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        if seen.insert(key) {
            values.push(v);
        }
    }
    values
}

/// Find the feature/threshold pair with the greatest information gain.
///
/// Features are scanned in `candidates` order and thresholds in
/// first-occurrence order. The first maximizer is kept, so when no split
/// has positive gain the first candidate evaluated is returned even if it is
/// degenerate (one side empty); callers treat that as "no informative split".
/// Returns `None` when there are no rows or no candidate features.
///
/// `columns` is column-major: `columns[feature_idx][sample_idx]`, and
/// `sample_indices` index into the inner vectors.
pub(crate) fn best_split<L: PartialEq>(
    columns: &[Vec<f64>],
    labels: &[L],
    sample_indices: &[usize],
    candidates: &[usize],
) -> Option<SplitCandidate> {
    if sample_indices.is_empty() {
        return None;
    }
    let parent = LabelCounts::from_indices(labels, sample_indices).entropy();

    let mut best: Option<SplitCandidate> = None;
    for &feature in candidates {
        let column = &columns[feature];
        for threshold in distinct_values(column, sample_indices) {
            let score = score_threshold(labels, column, sample_indices, threshold, parent);
            let candidate = SplitCandidate {
                feature,
                threshold,
                gain: score.gain,
                n_left: score.n_left,
                n_right: score.n_right,
            };
            if best.as_ref().is_none_or(|b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }
    }
    best
}

/// Partition `sample_indices` on `column <= threshold`, preserving order.
pub(crate) fn partition(
    column: &[f64],
    sample_indices: &[usize],
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    sample_indices
        .iter()
        .partition(|&&si| column[si] <= threshold)
}

#[cfg(test)]
mod tests {
    use super::{LabelCounts, best_split, distinct_values, entropy, information_gain, partition};

    // --- Entropy ---

    #[test]
    fn entropy_pure_is_zero() {
        assert_eq!(entropy(&[1, 1, 1, 1]).value(), 0.0);
    }

    #[test]
    fn entropy_binary_balanced_is_one() {
        assert!((entropy(&["a", "b", "a", "b"]).value() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_four_way_uniform_is_two() {
        assert!((entropy(&[0, 1, 2, 3]).value() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_empty_is_zero() {
        let empty: [u8; 0] = [];
        assert_eq!(entropy(&empty).value(), 0.0);
    }

    #[test]
    fn entropy_positive_when_mixed() {
        assert!(entropy(&[0, 0, 0, 1]).value() > 0.0);
    }

    // --- LabelCounts ---

    #[test]
    fn majority_ties_go_to_first_seen() {
        let labels = ["b", "a", "a", "b"];
        let counts = LabelCounts::from_indices(&labels, &[0, 1, 2, 3]);
        assert_eq!(counts.majority(), Some(&"b"));
        assert_eq!(counts.n_distinct(), 2);
    }

    #[test]
    fn majority_picks_most_frequent() {
        let labels = [0, 1, 1, 2, 1];
        let counts = LabelCounts::from_indices(&labels, &[0, 1, 2, 3, 4]);
        assert_eq!(counts.majority(), Some(&1));
        assert_eq!(counts.total(), 5);
    }

    // --- Gain ---

    #[test]
    fn perfect_split_gains_full_entropy() {
        let gain = information_gain(&[0, 0, 1, 1], &[0.0, 0.0, 1.0, 1.0], 0.0);
        assert!((gain - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn misaligned_column_is_rejected() {
        let _ = information_gain(&[0, 0, 1, 1], &[0.0, 1.0], 0.0);
    }

    #[test]
    fn empty_side_gains_nothing() {
        let gain = information_gain(&[0, 0, 1, 1], &[0.0, 0.0, 1.0, 1.0], 1.0);
        assert_eq!(gain, 0.0);
    }

    // --- Thresholds ---

    #[test]
    fn thresholds_in_first_occurrence_order() {
        let column = [3.0, 1.0, 3.0, 2.0, -0.0, 0.0];
        assert_eq!(
            distinct_values(&column, &[0, 1, 2, 3, 4, 5]),
            vec![3.0, 1.0, 2.0, -0.0]
        );
    }

    #[test]
    fn partition_preserves_order() {
        let column = [5.0, 1.0, 7.0, 2.0];
        let (left, right) = partition(&column, &[3, 2, 1, 0], 2.0);
        assert_eq!(left, vec![3, 1]);
        assert_eq!(right, vec![2, 0]);
    }

    // --- best_split ---

    #[test]
    fn picks_informative_feature() {
        let columns = vec![vec![1.0, 1.0, 1.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]];
        let labels = [0, 0, 1, 1];
        let split = best_split(&columns, &labels, &[0, 1, 2, 3], &[0, 1]).unwrap();
        assert_eq!(split.feature, 1);
        assert_eq!(split.threshold, 0.0);
        assert!((split.gain - 1.0).abs() < 1e-12);
        assert_eq!((split.n_left, split.n_right), (2, 2));
    }

    #[test]
    fn ties_keep_first_candidate() {
        // Both features separate the labels perfectly.
        let columns = vec![vec![0.0, 0.0, 1.0, 1.0], vec![5.0, 5.0, 9.0, 9.0]];
        let labels = [0, 0, 1, 1];
        let split = best_split(&columns, &labels, &[0, 1, 2, 3], &[1, 0]).unwrap();
        assert_eq!(split.feature, 1);
        assert_eq!(split.threshold, 5.0);
    }

    #[test]
    fn constant_features_yield_degenerate_split() {
        let columns = vec![vec![2.0, 2.0, 2.0], vec![4.0, 4.0, 4.0]];
        let labels = [0, 1, 0];
        let split = best_split(&columns, &labels, &[0, 1, 2], &[0, 1]).unwrap();
        assert!(split.is_degenerate());
        assert_eq!(split.feature, 0);
        assert_eq!(split.gain, 0.0);
    }

    #[test]
    fn zero_gain_tie_keeps_first_threshold_even_if_degenerate() {
        // XOR: the first threshold (1.0) sends everything left, the second
        // partitions the rows without reducing entropy. Neither beats the other.
        let columns = vec![vec![1.0, 0.0, 1.0, 0.0]];
        let labels = [0, 1, 1, 0];
        let split = best_split(&columns, &labels, &[0, 1, 2, 3], &[0]).unwrap();
        assert!(split.is_degenerate());
        assert_eq!(split.threshold, 1.0);
        assert_eq!(split.gain, 0.0);
    }

    #[test]
    fn zero_gain_tie_keeps_first_partitioning_threshold() {
        let columns = vec![vec![0.0, 1.0, 0.0, 1.0]];
        let labels = [0, 1, 1, 0];
        let split = best_split(&columns, &labels, &[0, 1, 2, 3], &[0]).unwrap();
        assert!(!split.is_degenerate());
        assert_eq!(split.threshold, 0.0);
    }

    #[test]
    fn positive_gain_beats_degenerate_first_threshold() {
        let columns = vec![vec![9.0, 1.0, 9.0, 1.0]];
        let labels = [1, 0, 1, 0];
        let split = best_split(&columns, &labels, &[0, 1, 2, 3], &[0]).unwrap();
        assert_eq!(split.threshold, 1.0);
        assert!((split.gain - 1.0).abs() < 1e-12);
    }

    #[test]
    fn no_candidates_or_rows_is_none() {
        let columns = vec![vec![1.0, 2.0]];
        let labels = [0, 1];
        assert!(best_split(&columns, &labels, &[0, 1], &[]).is_none());
        assert!(best_split(&columns, &labels, &[], &[0]).is_none());
    }
}
