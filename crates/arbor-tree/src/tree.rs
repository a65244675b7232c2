use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, instrument};

use crate::{
    TreeError,
    config::ClassifierConfig,
    dataset::{Columns, Row},
    node::{Node, NodeIndex},
    sampler::draw_indices,
    split::{LabelCounts, best_split, partition},
};

/// Validate the inputs and grow a tree from them.
#[instrument(skip_all, fields(n_samples = rows.len()))]
pub(crate) fn fit_tree<L, R>(
    config: &ClassifierConfig,
    rows: &[Row],
    labels: &[L],
    rng: &mut R,
) -> Result<DecisionTree<L>, TreeError>
where
    L: Clone + PartialEq,
    R: Rng + ?Sized,
{
    config.validate()?;
    let data = Columns::from_rows(rows, labels.len())?;
    let subset_size = config.feature_subset.resolve(data.n_features())?;

    debug!(
        n_samples = data.n_samples(),
        n_features = data.n_features(),
        subset_size,
        max_depth = config.max_depth,
        min_samples_split = config.min_samples_split,
        "fitting decision tree"
    );

    let sample_indices: Vec<usize> = (0..data.n_samples()).collect();
    let mut builder = TreeBuilder {
        data: &data,
        labels,
        config,
        subset_size,
        rng,
        arena: Vec::new(),
    };
    let root = builder.grow(&sample_indices, 0)?;
    let nodes = builder.arena;

    debug!(
        root_index = root.index(),
        n_nodes = nodes.len(),
        "decision tree built"
    );

    Ok(DecisionTree {
        nodes,
        feature_names: data.feature_names,
    })
}

/// Recursive growth state shared across one fit.
struct TreeBuilder<'a, L, R: ?Sized> {
    data: &'a Columns,
    labels: &'a [L],
    config: &'a ClassifierConfig,
    subset_size: usize,
    rng: &'a mut R,
    arena: Vec<Node<L>>,
}

impl<L, R> TreeBuilder<'_, L, R>
where
    L: Clone + PartialEq,
    R: Rng + ?Sized,
{
    /// Grow the subtree for `sample_indices` and return its arena index.
    ///
    /// The left subtree is fully built before the right one, so the random
    /// draws follow a pre-order walk. Recursion depth is bounded by both
    /// `max_depth` and the row count, since every split sends at least one
    /// row to each side.
    fn grow(&mut self, sample_indices: &[usize], depth: usize) -> Result<NodeIndex, TreeError> {
        let n_samples = sample_indices.len();
        let counts = LabelCounts::from_indices(self.labels, sample_indices);
        let entropy = counts.entropy();
        let value = counts.majority().cloned().ok_or(TreeError::EmptyDataset)?;

        let depth_exceeded = depth >= self.config.max_depth;
        let pure = counts.n_distinct() == 1;
        let too_few = n_samples < self.config.min_samples_split;

        if depth_exceeded || pure || too_few {
            return Ok(self.push(Node::Leaf {
                value,
                entropy,
                n_samples,
            }));
        }

        let candidates = draw_indices(self.data.n_features(), self.subset_size, &mut *self.rng)?;
        let best = best_split(&self.data.columns, self.labels, sample_indices, &candidates);
        let split = match best {
            Some(s) if !s.is_degenerate() => s,
            _ => {
                debug!(depth, n_samples, "no partitioning split, emitting leaf");
                return Ok(self.push(Node::Leaf {
                    value,
                    entropy,
                    n_samples,
                }));
            }
        };

        let (left_indices, right_indices) =
            partition(&self.data.columns[split.feature], sample_indices, split.threshold);

        // Reserve this node's slot so it precedes its children, then overwrite.
        let node_idx = self.push(Node::Leaf {
            value,
            entropy,
            n_samples,
        });
        let left = self.grow(&left_indices, depth + 1)?;
        let right = self.grow(&right_indices, depth + 1)?;

        self.arena[node_idx.index()] = Node::Internal {
            feature: self.data.feature_names[split.feature].clone(),
            threshold: split.threshold,
            left,
            right,
            gain: split.gain,
            entropy,
            n_samples,
        };
        Ok(node_idx)
    }

    fn push(&mut self, node: Node<L>) -> NodeIndex {
        self.arena.push(node);
        NodeIndex::new(self.arena.len() - 1)
    }
}

/// A fitted decision tree.
///
/// Stored as an arena-based `Vec<Node>`; the root is always index 0 and the
/// tree is never mutated after construction.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DecisionTree<L> {
    pub(crate) nodes: Vec<Node<L>>,
    pub(crate) feature_names: Vec<String>,
}

impl<L> DecisionTree<L> {
    /// Return the root node.
    #[must_use]
    pub fn root(&self) -> &Node<L> {
        &self.nodes[0]
    }

    /// Return the node at `index`, if it exists.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&Node<L>> {
        self.nodes.get(index.index())
    }

    /// Return the children of an internal node, left first.
    #[must_use]
    pub fn children(&self, node: &Node<L>) -> Option<(&Node<L>, &Node<L>)> {
        let (left, right) = node.child_indices()?;
        Some((self.node(left)?, self.node(right)?))
    }

    /// Return every node in arena (pre-order) order.
    #[must_use]
    pub fn nodes(&self) -> &[Node<L>] {
        &self.nodes
    }

    /// Return the feature names seen at fit time, in sorted order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Return the total number of nodes in the tree (both internal and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers().len().saturating_sub(1)
    }

    /// Group the nodes by depth.
    ///
    /// Level 0 is `[root]` and level `i + 1` holds the children of level `i`,
    /// each parent contributing its left child before its right one. Built
    /// with a FIFO queue, so every level reads left to right.
    #[must_use]
    pub fn layers(&self) -> Vec<Vec<&Node<L>>> {
        let mut layers: Vec<Vec<&Node<L>>> = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            let node = &self.nodes[node_idx];
            if layers.len() == d {
                layers.push(Vec::new());
            }
            layers[d].push(node);
            if let Some((left, right)) = node.child_indices() {
                queue.push_back((left.index(), d + 1));
                queue.push_back((right.index(), d + 1));
            }
        }

        layers
    }

    /// Predict the label for one row.
    ///
    /// Traverses from the root: at each `Internal` node, goes left when
    /// `row[feature] <= threshold`, right otherwise. `sample_index` only
    /// labels errors.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::MissingFeature`] when the row lacks a feature on
    /// the traversed path.
    pub fn predict_row(&self, row: &Row, sample_index: usize) -> Result<&L, TreeError> {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value, .. } => return Ok(value),
                Node::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    let x = row.get(feature).ok_or_else(|| TreeError::MissingFeature {
                        sample_index,
                        feature: feature.clone(),
                    })?;
                    idx = if *x <= *threshold {
                        left.index()
                    } else {
                        right.index()
                    };
                }
            }
        }
    }

    /// Gain-weighted split totals per feature, aligned with [`feature_names`](Self::feature_names).
    ///
    /// Each `Internal` node contributes `gain * n_samples`. Totals are
    /// normalized to sum to 1.0, and are all zero for a single-leaf tree.
    #[must_use]
    pub fn raw_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0f64; self.feature_names.len()];
        for node in &self.nodes {
            if let Node::Internal {
                feature,
                gain,
                n_samples,
                ..
            } = node
                && let Some(pos) = self.feature_names.iter().position(|f| f == feature)
            {
                totals[pos] += gain * *n_samples as f64;
            }
        }
        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            totals.iter_mut().for_each(|v| *v /= sum);
        }
        totals
    }
}
