//! CSV reader for labelled feature tables with full input validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use arbor_tree::Row;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::LabelledDataset;

/// Reads a labelled feature table from a CSV file.
///
/// Expected CSV format:
/// - Header row required
/// - One column holds the class label (any string)
/// - Every selected feature column holds finite floats
/// - All rows have the same number of columns as the header
///
/// Without [`with_features`](Self::with_features), every column except the
/// label column is a feature, in header order.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | Label or requested feature column not in header |
/// | [`IoError::NoFeatureColumns`] | No feature column remains after selection |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Feature cell is NaN, Inf, or unparseable float |
pub struct LabelledCsvReader {
    path: PathBuf,
    label_column: String,
    features: Option<Vec<String>>,
}

impl LabelledCsvReader {
    /// Create a new reader for the given CSV file and label column.
    pub fn new(path: &Path, label_column: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            label_column: label_column.into(),
            features: None,
        }
    }

    /// Restrict the feature columns to `features`, in the given order.
    ///
    /// The label column is never used as a feature even if listed, and a
    /// repeated name keeps only its first position.
    #[must_use]
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = Some(features);
        self
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    fn column_index(&self, header: &csv::StringRecord, column: &str) -> Result<usize, IoError> {
        header
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column: column.to_string(),
            })
    }

    /// Read and validate the CSV file, returning a [`LabelledDataset`].
    #[instrument(skip(self), fields(path = %self.path.display(), label = %self.label_column))]
    pub fn read(&self) -> Result<LabelledDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so ragged rows surface as InconsistentRowLength.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let expected_cols = header.len();
        let label_index = self.column_index(&header, &self.label_column)?;

        let selected: Vec<(usize, String)> = match &self.features {
            Some(names) => {
                let mut seen = HashSet::new();
                names
                    .iter()
                    .filter(|name| **name != self.label_column)
                    .filter(|name| seen.insert(name.as_str()))
                    .map(|name| self.column_index(&header, name).map(|i| (i, name.clone())))
                    .collect::<Result<_, IoError>>()?
            }
            None => header
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != label_index)
                .map(|(i, h)| (i, h.trim().to_string()))
                .collect(),
        };
        if selected.is_empty() {
            return Err(IoError::NoFeatureColumns {
                path: self.path.clone(),
            });
        }
        debug!(expected_cols, n_features = selected.len(), "read CSV header");

        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Row::new();
            for (col_index, name) in &selected {
                let raw = record.get(*col_index).unwrap_or("").trim();
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        column: name.clone(),
                        raw: raw.to_string(),
                    })?;
                row.insert(name.clone(), value);
            }

            labels.push(record.get(label_index).unwrap_or("").trim().to_string());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_samples = rows.len(),
            n_features = selected.len(),
            "dataset loaded"
        );

        let feature_names = selected.into_iter().map(|(_, name)| name).collect();
        Ok(LabelledDataset::new(
            self.label_column.clone(),
            feature_names,
            rows,
            labels,
        ))
    }
}
