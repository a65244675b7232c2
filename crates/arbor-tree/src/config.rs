//! Configuration builder for decision tree training.

use crate::classifier::DecisionTreeClassifier;
use crate::error::TreeError;

/// Number of features considered at each split decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FeatureSubset {
    /// Every feature is evaluated at every node.
    All,
    /// A fixed count, clamped to the number of features at fit time.
    Fixed(usize),
}

impl FeatureSubset {
    /// Resolve the subset to a concrete count for `n_features` features.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidFeatureSubsetSize`] for `Fixed(0)`.
    pub fn resolve(self, n_features: usize) -> Result<usize, TreeError> {
        match self {
            FeatureSubset::All => Ok(n_features),
            FeatureSubset::Fixed(0) => Err(TreeError::InvalidFeatureSubsetSize {
                requested: 0,
                n_features,
            }),
            FeatureSubset::Fixed(k) => Ok(k.min(n_features)),
        }
    }
}

/// Configuration for a [`DecisionTreeClassifier`].
///
/// Construct via [`ClassifierConfig::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter           | Default |
/// |---------------------|---------|
/// | `min_samples_split` | 2       |
/// | `max_depth`         | 100     |
/// | `feature_subset`    | `All`   |
/// | `seed`              | 42      |
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub(crate) min_samples_split: usize,
    pub(crate) max_depth: usize,
    pub(crate) feature_subset: FeatureSubset,
    pub(crate) seed: u64,
}

impl ClassifierConfig {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_samples_split: 2,
            max_depth: 100,
            feature_subset: FeatureSubset::All,
            seed: 42,
        }
    }

    // --- Setters ---

    /// Set the minimum number of samples required to attempt a split.
    #[must_use]
    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    /// Set the maximum tree depth. The root sits at depth 0, so `0` yields a
    /// single leaf.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set how many features are sampled at each split decision.
    #[must_use]
    pub fn with_feature_subset(mut self, feature_subset: FeatureSubset) -> Self {
        self.feature_subset = feature_subset;
        self
    }

    /// Set the random seed used by [`DecisionTreeClassifier::fit`].
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // --- Getters ---

    /// Return the minimum samples required to split a node.
    #[must_use]
    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }

    /// Return the maximum depth.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Return the feature subset strategy.
    #[must_use]
    pub fn feature_subset(&self) -> FeatureSubset {
        self.feature_subset
    }

    /// Return the random seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Check the parameters that do not depend on the dataset.
    pub(crate) fn validate(&self) -> Result<(), TreeError> {
        if self.min_samples_split == 0 {
            return Err(TreeError::InvalidMinSamplesSplit {
                min_samples_split: self.min_samples_split,
            });
        }
        Ok(())
    }

    /// Build an unfitted classifier from this configuration.
    #[must_use]
    pub fn build<L>(self) -> DecisionTreeClassifier<L> {
        DecisionTreeClassifier::new(self)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new()
    }
}
