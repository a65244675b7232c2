//! Domain types for arbor-io.

use arbor_tree::Row;

use crate::IoError;

/// A validated report name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportName(String);

impl ReportName {
    /// Parse and validate a report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidReportName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidReportName { name });
        }
        Ok(Self(name))
    }

    /// Return the report name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReportName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feature rows paired with their class labels.
///
/// Produced by [`LabelledCsvReader`](crate::LabelledCsvReader). `rows[i]`
/// is labelled `labels[i]`; row order matches the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledDataset {
    /// Name of the column the labels were read from.
    label_column: String,
    /// Feature column names in selection order.
    feature_names: Vec<String>,
    /// One feature map per sample.
    rows: Vec<Row>,
    /// One label per sample.
    labels: Vec<String>,
}

impl LabelledDataset {
    pub(crate) fn new(
        label_column: String,
        feature_names: Vec<String>,
        rows: Vec<Row>,
        labels: Vec<String>,
    ) -> Self {
        debug_assert_eq!(rows.len(), labels.len());
        Self {
            label_column,
            feature_names,
            rows,
            labels,
        }
    }

    /// Return the label column name.
    #[must_use]
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Return the feature column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the feature rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Return the labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Return the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Keep at most the first `n` samples.
    #[must_use]
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self.labels.truncate(n);
        self
    }

    /// Split into a contiguous prefix of `at` samples and the remainder.
    pub(crate) fn split_at(mut self, at: usize) -> (Self, Self) {
        let at = at.min(self.rows.len());
        let rows = self.rows.split_off(at);
        let labels = self.labels.split_off(at);
        let tail = Self::new(
            self.label_column.clone(),
            self.feature_names.clone(),
            rows,
            labels,
        );
        (self, tail)
    }
}
