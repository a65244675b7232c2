//! Ordered train/test partitioning and accuracy scoring.

use tracing::debug;

use crate::IoError;
use crate::domain::LabelledDataset;

/// A dataset split into a training prefix and a test remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    /// The first `floor(n * fraction)` samples.
    pub train: LabelledDataset,
    /// Every remaining sample, in file order.
    pub test: LabelledDataset,
}

/// Split `dataset` at `floor(n_samples * train_fraction)` without shuffling.
///
/// A fraction of `1.0` yields an empty test set.
///
/// # Errors
///
/// Returns [`IoError::InvalidFraction`] when `train_fraction` is not in
/// `(0.0, 1.0]` (NaN included).
pub fn train_test_split(
    dataset: LabelledDataset,
    train_fraction: f64,
) -> Result<TrainTestSplit, IoError> {
    if !(train_fraction > 0.0 && train_fraction <= 1.0) {
        return Err(IoError::InvalidFraction {
            fraction: train_fraction,
        });
    }
    let n = dataset.n_samples();
    let pivot = (n as f64 * train_fraction).floor() as usize;
    let (train, test) = dataset.split_at(pivot);
    debug!(
        n_train = train.n_samples(),
        n_test = test.n_samples(),
        "train/test split"
    );
    Ok(TrainTestSplit { train, test })
}

/// Percentage of positions where `predicted` equals `actual`.
///
/// Returns `None` when the slices are empty or differ in length.
#[must_use]
pub fn accuracy<L: PartialEq>(predicted: &[L], actual: &[L]) -> Option<f64> {
    let n = actual.len();
    if n == 0 || predicted.len() != n {
        return None;
    }
    let correct = predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| p == a)
        .count();
    Some(correct as f64 / n as f64 * 100.0)
}
