//! Decision tree classification: fit, predict, inspect.
//!
//! Provides a single CART-style binary tree grown by information gain
//! (entropy in bits), with a fresh random feature subset drawn at every
//! internal node, root-to-leaf inference, and level-by-level extraction of
//! the fitted nodes for visualization.

mod classifier;
mod config;
mod dataset;
mod error;
mod importance;
mod node;
mod sampler;
mod split;
mod tree;

pub use classifier::DecisionTreeClassifier;
pub use config::{ClassifierConfig, FeatureSubset};
pub use dataset::Row;
pub use error::{ErrorKind, TreeError};
pub use importance::RankedFeature;
pub use node::{Entropy, Node, NodeIndex};
pub use sampler::sample_features;
pub use split::{entropy, information_gain};
pub use tree::DecisionTree;
