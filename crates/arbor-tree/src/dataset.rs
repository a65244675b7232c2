//! Row representation and validated column-major training data.

use std::collections::BTreeMap;

use crate::error::TreeError;

/// One observation: feature name to numeric value.
///
/// A sorted map, so the feature order derived from a row is stable across
/// runs and a seeded fit is reproducible.
pub type Row = BTreeMap<String, f64>;

/// Training rows transposed to `columns[feature_idx][sample_idx]`.
#[derive(Debug)]
pub(crate) struct Columns {
    pub(crate) feature_names: Vec<String>,
    pub(crate) columns: Vec<Vec<f64>>,
}

impl Columns {
    /// Validate `rows` against `n_labels` and transpose them.
    ///
    /// Every row must carry exactly the feature names of the first row, with
    /// finite values.
    pub(crate) fn from_rows(rows: &[Row], n_labels: usize) -> Result<Self, TreeError> {
        if rows.len() != n_labels {
            return Err(TreeError::LengthMismatch {
                n_rows: rows.len(),
                n_labels,
            });
        }
        let Some(first) = rows.first() else {
            return Err(TreeError::EmptyDataset);
        };
        if first.is_empty() {
            return Err(TreeError::ZeroFeatures { sample_index: 0 });
        }

        let feature_names: Vec<String> = first.keys().cloned().collect();
        let mut columns = vec![Vec::with_capacity(rows.len()); feature_names.len()];

        for (sample_index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                return Err(TreeError::ZeroFeatures { sample_index });
            }
            if row.len() != feature_names.len() || !row.keys().eq(feature_names.iter()) {
                return Err(TreeError::FeatureSetMismatch {
                    sample_index,
                    expected: feature_names.clone(),
                    got: row.keys().cloned().collect(),
                });
            }
            for ((feature, &value), column) in row.iter().zip(columns.iter_mut()) {
                if !value.is_finite() {
                    return Err(TreeError::NonFiniteValue {
                        sample_index,
                        feature: feature.clone(),
                    });
                }
                column.push(value);
            }
        }

        Ok(Self {
            feature_names,
            columns,
        })
    }

    pub(crate) fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub(crate) fn n_samples(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::{Columns, Row};
    use crate::TreeError;

    fn row(pairs: &[(&str, f64)]) -> Row {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn transposes_rows() {
        let rows = vec![
            row(&[("b", 2.0), ("a", 1.0)]),
            row(&[("a", 3.0), ("b", 4.0)]),
        ];
        let cols = Columns::from_rows(&rows, 2).unwrap();
        assert_eq!(cols.feature_names, vec!["a", "b"]);
        assert_eq!(cols.columns, vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
        assert_eq!(cols.n_features(), 2);
        assert_eq!(cols.n_samples(), 2);
    }

    #[test]
    fn empty_rows_rejected() {
        let err = Columns::from_rows(&[], 0).unwrap_err();
        assert!(matches!(err, TreeError::EmptyDataset));
    }

    #[test]
    fn label_count_mismatch_rejected() {
        let rows = vec![row(&[("a", 1.0)])];
        let err = Columns::from_rows(&rows, 2).unwrap_err();
        assert!(matches!(
            err,
            TreeError::LengthMismatch {
                n_rows: 1,
                n_labels: 2
            }
        ));
    }

    #[test]
    fn featureless_row_rejected() {
        let rows = vec![Row::new()];
        let err = Columns::from_rows(&rows, 1).unwrap_err();
        assert!(matches!(err, TreeError::ZeroFeatures { sample_index: 0 }));
    }

    #[test]
    fn differing_feature_set_rejected() {
        let rows = vec![row(&[("a", 1.0), ("b", 1.0)]), row(&[("a", 1.0), ("c", 1.0)])];
        let err = Columns::from_rows(&rows, 2).unwrap_err();
        assert!(matches!(
            err,
            TreeError::FeatureSetMismatch {
                sample_index: 1,
                ..
            }
        ));
    }

    #[test]
    fn non_finite_value_rejected() {
        let rows = vec![row(&[("a", 1.0)]), row(&[("a", f64::INFINITY)])];
        let err = Columns::from_rows(&rows, 2).unwrap_err();
        assert!(matches!(err, TreeError::NonFiniteValue { sample_index: 1, .. }));
    }
}
