//! The fit/predict/layers façade over a single decision tree.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::config::ClassifierConfig;
use crate::dataset::Row;
use crate::error::TreeError;
use crate::node::Node;
use crate::tree::{DecisionTree, fit_tree};

/// A binary decision tree classifier grown by information gain.
///
/// Holds an immutable [`ClassifierConfig`] and, after a successful
/// [`fit`](Self::fit), the fitted tree. Refitting replaces the tree wholesale;
/// a failed fit leaves the previous tree in place.
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier<L> {
    config: ClassifierConfig,
    tree: Option<DecisionTree<L>>,
}

impl<L> DecisionTreeClassifier<L> {
    /// Create an unfitted classifier.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config, tree: None }
    }

    /// Return the configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Return `true` once a fit has succeeded.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    /// Borrow the fitted tree.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] before the first successful fit.
    pub fn tree(&self) -> Result<&DecisionTree<L>, TreeError> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)
    }

    /// Return the fitted nodes grouped by depth, root first.
    ///
    /// Each level lists nodes left to right. See [`DecisionTree::layers`].
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] before the first successful fit.
    pub fn layers(&self) -> Result<Vec<Vec<&Node<L>>>, TreeError> {
        Ok(self.tree()?.layers())
    }
}

impl<L: Clone + PartialEq> DecisionTreeClassifier<L> {
    /// Fit a tree to `rows` and `labels`, seeding the feature sampler from
    /// the configured seed.
    ///
    /// Feature names are taken from the first row; every row must carry the
    /// same names.
    ///
    /// # Errors
    ///
    /// | Variant                                | When                                   |
    /// |----------------------------------------|----------------------------------------|
    /// | [`TreeError::LengthMismatch`]          | `rows.len() != labels.len()`           |
    /// | [`TreeError::EmptyDataset`]            | `rows` is empty                        |
    /// | [`TreeError::ZeroFeatures`]            | a row has no features                  |
    /// | [`TreeError::FeatureSetMismatch`]      | a row's names differ from the first's  |
    /// | [`TreeError::NonFiniteValue`]          | any value is NaN or infinite           |
    /// | [`TreeError::InvalidMinSamplesSplit`]  | `min_samples_split` is zero            |
    /// | [`TreeError::InvalidFeatureSubsetSize`]| the feature subset is `Fixed(0)`       |
    pub fn fit(&mut self, rows: &[Row], labels: &[L]) -> Result<(), TreeError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.fit_with_rng(rows, labels, &mut rng)
    }

    /// Fit using a caller-supplied random number generator.
    ///
    /// The generator only drives per-node feature sampling.
    ///
    /// # Errors
    ///
    /// Same as [`fit`](Self::fit).
    pub fn fit_with_rng<R: Rng + ?Sized>(
        &mut self,
        rows: &[Row],
        labels: &[L],
        rng: &mut R,
    ) -> Result<(), TreeError> {
        let tree = fit_tree(&self.config, rows, labels, rng)?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Predict one label per row, in input order.
    ///
    /// # Errors
    ///
    /// | Variant                         | When                                        |
    /// |---------------------------------|---------------------------------------------|
    /// | [`TreeError::NotFitted`]        | called before a successful fit              |
    /// | [`TreeError::EmptyDataset`]     | `rows` is empty                             |
    /// | [`TreeError::ZeroFeatures`]     | a row has no features                       |
    /// | [`TreeError::MissingFeature`]   | a row lacks a feature on its decision path  |
    #[instrument(skip_all, fields(n_rows = rows.len()))]
    pub fn predict(&self, rows: &[Row]) -> Result<Vec<L>, TreeError> {
        let tree = self.tree()?;
        if rows.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let predictions = rows
            .iter()
            .enumerate()
            .map(|(sample_index, row)| {
                if row.is_empty() {
                    return Err(TreeError::ZeroFeatures { sample_index });
                }
                tree.predict_row(row, sample_index).cloned()
            })
            .collect::<Result<Vec<L>, TreeError>>()?;
        debug!(n_predictions = predictions.len(), "prediction complete");
        Ok(predictions)
    }

    /// Predict the label of a single row.
    ///
    /// # Errors
    ///
    /// Same as [`predict`](Self::predict) for a one-row input.
    pub fn predict_row(&self, row: &Row) -> Result<L, TreeError> {
        let tree = self.tree()?;
        if row.is_empty() {
            return Err(TreeError::ZeroFeatures { sample_index: 0 });
        }
        tree.predict_row(row, 0).cloned()
    }
}

impl<L> Default for DecisionTreeClassifier<L> {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
