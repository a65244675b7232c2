/// Broad category of a [`TreeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The rows or labels handed to `fit`/`predict` are malformed.
    InvalidInput,
    /// The classifier configuration cannot be applied to the dataset.
    InvalidConfiguration,
    /// The classifier has not been fitted yet.
    NotFitted,
}

/// Errors from decision tree training and inference.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Returned when the dataset has zero rows.
    #[error("dataset has zero rows")]
    EmptyDataset,

    /// Returned when the number of rows and labels differ.
    #[error("dataset has {n_rows} rows but {n_labels} labels")]
    LengthMismatch {
        /// Number of rows supplied.
        n_rows: usize,
        /// Number of labels supplied.
        n_labels: usize,
    },

    /// Returned when a row has no features at all.
    #[error("row {sample_index} has zero features")]
    ZeroFeatures {
        /// The zero-based index of the offending row.
        sample_index: usize,
    },

    /// Returned when a training row's feature names differ from the first row's.
    #[error("row {sample_index} has features {got:?}, expected {expected:?}")]
    FeatureSetMismatch {
        /// The zero-based index of the offending row.
        sample_index: usize,
        /// Feature names of the first row.
        expected: Vec<String>,
        /// Feature names of the offending row.
        got: Vec<String>,
    },

    /// Returned when a value is NaN or infinite.
    #[error("non-finite value at row {sample_index}, feature \"{feature}\"")]
    NonFiniteValue {
        /// The zero-based index of the offending row.
        sample_index: usize,
        /// Name of the feature holding the value.
        feature: String,
    },

    /// Returned when a prediction row lacks a feature the tree splits on.
    #[error("row {sample_index} is missing feature \"{feature}\"")]
    MissingFeature {
        /// The zero-based index of the offending row.
        sample_index: usize,
        /// Name of the missing feature.
        feature: String,
    },

    /// Returned when min_samples_split is zero.
    #[error("min_samples_split must be at least 1, got {min_samples_split}")]
    InvalidMinSamplesSplit {
        /// The invalid min_samples_split value provided.
        min_samples_split: usize,
    },

    /// Returned when the feature subset size is zero or exceeds the feature count.
    #[error("feature subset size must be in [1, {n_features}], got {requested}")]
    InvalidFeatureSubsetSize {
        /// The requested subset size.
        requested: usize,
        /// The number of available features.
        n_features: usize,
    },

    /// Returned when `predict` or `layers` is called before `fit`.
    #[error("classifier has not been fitted")]
    NotFitted,
}

impl TreeError {
    /// Return the category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TreeError::EmptyDataset
            | TreeError::LengthMismatch { .. }
            | TreeError::ZeroFeatures { .. }
            | TreeError::FeatureSetMismatch { .. }
            | TreeError::NonFiniteValue { .. }
            | TreeError::MissingFeature { .. } => ErrorKind::InvalidInput,
            TreeError::InvalidMinSamplesSplit { .. }
            | TreeError::InvalidFeatureSubsetSize { .. } => ErrorKind::InvalidConfiguration,
            TreeError::NotFitted => ErrorKind::NotFitted,
        }
    }
}
