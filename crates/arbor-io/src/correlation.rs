//! Pairwise Pearson correlation between the feature columns of a dataset.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::LabelledDataset;

/// Sample correlation coefficient of one ordered feature pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    /// Row feature name.
    pub a: String,
    /// Column feature name.
    pub b: String,
    /// Pearson `r` in `[-1, 1]`; `None` when either column has zero variance
    /// or the dataset is empty.
    pub r: Option<f64>,
}

/// Pearson correlation for every ordered pair of feature columns.
///
/// Pairs are listed row-major over [`LabelledDataset::feature_names`]: all
/// partners of the first feature, then of the second, and so on, diagonal
/// included. Labels are not part of the matrix.
#[must_use]
#[instrument(skip_all, fields(n_samples = dataset.n_samples(), n_features = dataset.n_features()))]
pub fn correlation_matrix(dataset: &LabelledDataset) -> Vec<Correlation> {
    let columns: Vec<Vec<f64>> = dataset
        .feature_names()
        .iter()
        .map(|name| dataset.rows().iter().map(|row| row[name.as_str()]).collect())
        .collect();

    let names = dataset.feature_names();
    let mut matrix = Vec::with_capacity(names.len() * names.len());
    for (a, x) in names.iter().zip(&columns) {
        for (b, y) in names.iter().zip(&columns) {
            matrix.push(Correlation {
                a: a.clone(),
                b: b.clone(),
                r: pearson(x, y),
            });
        }
    }

    debug!(
        n_pairs = matrix.len(),
        n_undefined = matrix.iter().filter(|c| c.r.is_none()).count(),
        "correlation matrix computed"
    );
    matrix
}

/// `Σ(x-x̄)(y-ȳ) / sqrt(Σ(x-x̄)² · Σ(y-ȳ)²)` over two aligned columns.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    debug_assert_eq!(x.len(), y.len());
    if x.is_empty() {
        return None;
    }
    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (mut xy, mut xx, mut yy) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        xy += dx * dy;
        xx += dx * dx;
        yy += dy * dy;
    }

    let denom = (xx * yy).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some((xy / denom).clamp(-1.0, 1.0))
}
