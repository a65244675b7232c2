//! Feature importance ranking for a fitted tree.

use crate::tree::DecisionTree;

/// A ranked feature with name, importance score, and rank.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Normalized importance score (sums to 1.0 across all features, or 0.0
    /// everywhere for a single-leaf tree).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

impl<L> DecisionTree<L> {
    /// Rank features by their share of the tree's total information gain.
    ///
    /// Sorted descending by importance; equal scores keep feature-name order.
    #[must_use]
    pub fn feature_importances(&self) -> Vec<RankedFeature> {
        let mut features: Vec<RankedFeature> = self
            .feature_names
            .iter()
            .zip(self.raw_importances())
            .map(|(name, importance)| RankedFeature {
                name: name.clone(),
                importance,
                rank: 0, // will be set after sorting
            })
            .collect();

        features.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        for (i, feat) in features.iter_mut().enumerate() {
            feat.rank = i + 1;
        }

        features
    }
}
