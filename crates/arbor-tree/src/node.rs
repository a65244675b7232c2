use std::fmt;

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shannon entropy of a label distribution, in bits.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
pub struct Entropy(f64);

impl Entropy {
    /// Create a new entropy value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw entropy value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node in a decision tree arena.
///
/// Trees are stored as `Vec<Node>` where children are referenced by
/// [`NodeIndex`]. Every node except the root is referenced by exactly one
/// `Internal` parent.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node<L> {
    /// A split on `feature <= threshold`.
    Internal {
        /// Name of the feature the node splits on.
        feature: String,
        /// Rows with `row[feature] <= threshold` go left.
        threshold: f64,
        /// Index of the left child node.
        left: NodeIndex,
        /// Index of the right child node.
        right: NodeIndex,
        /// Information gain of the split, in bits.
        gain: f64,
        /// Entropy of the rows that reached this node.
        entropy: Entropy,
        /// Number of training rows that reached this node.
        n_samples: usize,
    },
    /// A terminal node predicting `value`.
    Leaf {
        /// Majority label of the rows that reached this leaf.
        value: L,
        /// Entropy of the rows that reached this leaf.
        entropy: Entropy,
        /// Number of training rows that reached this leaf.
        n_samples: usize,
    },
}

impl<L> Node<L> {
    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the predicted label of a leaf.
    #[must_use]
    pub fn value(&self) -> Option<&L> {
        match self {
            Node::Leaf { value, .. } => Some(value),
            Node::Internal { .. } => None,
        }
    }

    /// Return the split feature name of an internal node.
    #[must_use]
    pub fn feature(&self) -> Option<&str> {
        match self {
            Node::Internal { feature, .. } => Some(feature),
            Node::Leaf { .. } => None,
        }
    }

    /// Return the split threshold of an internal node.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        match self {
            Node::Internal { threshold, .. } => Some(*threshold),
            Node::Leaf { .. } => None,
        }
    }

    /// Return the child indices of an internal node, left first.
    #[must_use]
    pub fn child_indices(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self {
            Node::Internal { left, right, .. } => Some((*left, *right)),
            Node::Leaf { .. } => None,
        }
    }

    /// Return the entropy of the rows that reached this node.
    #[must_use]
    pub fn entropy(&self) -> Entropy {
        match self {
            Node::Internal { entropy, .. } | Node::Leaf { entropy, .. } => *entropy,
        }
    }

    /// Return the number of training rows that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Internal { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }
}
