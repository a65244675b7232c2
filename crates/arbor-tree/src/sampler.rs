//! Per-node random feature subsampling.

use rand::Rng;

use crate::error::TreeError;

/// Draw `k` distinct positions from `0..n` uniformly without replacement.
///
/// Positions come back in draw order. Partial Fisher-Yates: only the first
/// `k` slots of the index vector are shuffled.
///
/// # Errors
///
/// Returns [`TreeError::InvalidFeatureSubsetSize`] when `k == 0` or `k > n`.
pub(crate) fn draw_indices<R: Rng + ?Sized>(
    n: usize,
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>, TreeError> {
    if k == 0 || k > n {
        return Err(TreeError::InvalidFeatureSubsetSize {
            requested: k,
            n_features: n,
        });
    }
    let mut order: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.gen_range(i..n);
        order.swap(i, j);
    }
    order.truncate(k);
    Ok(order)
}

/// Choose `k` distinct feature names uniformly at random.
///
/// `names` is left untouched; the returned names borrow from it and appear
/// in draw order.
///
/// # Errors
///
/// Returns [`TreeError::InvalidFeatureSubsetSize`] when `k == 0` or
/// `k > names.len()`.
pub fn sample_features<'a, R: Rng + ?Sized>(
    names: &'a [String],
    k: usize,
    rng: &mut R,
) -> Result<Vec<&'a str>, TreeError> {
    Ok(draw_indices(names.len(), k, rng)?
        .into_iter()
        .map(|i| names[i].as_str())
        .collect())
}
