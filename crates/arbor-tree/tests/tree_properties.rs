//! Structural properties every fitted tree must satisfy.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arbor_tree::{
    ClassifierConfig, DecisionTree, DecisionTreeClassifier, FeatureSubset, Node, NodeIndex, Row,
    entropy,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row(pairs: &[(&str, f64)]) -> Row {
    pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

/// 120 rows over 4 small-integer features with noisy 3-class labels.
fn make_noisy(seed: u64) -> (Vec<Row>, Vec<u32>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..120 {
        let r = row(&[
            ("f0", f64::from(rng.gen_range(0..4u32))),
            ("f1", f64::from(rng.gen_range(0..3u32))),
            ("f2", f64::from(rng.gen_range(0..2u32))),
            ("f3", rng.r#gen::<f64>().round()),
        ]);
        let label = if rng.gen_bool(0.2) {
            rng.gen_range(0..3)
        } else {
            (r["f0"] as u32 + r["f2"] as u32) % 3
        };
        rows.push(r);
        labels.push(label);
    }
    (rows, labels)
}

/// Arena index of the leaf `row` lands in. The root must be internal.
fn leaf_of<L>(tree: &DecisionTree<L>, row: &Row) -> NodeIndex {
    let mut node = tree.root();
    let mut at = None;
    loop {
        match node {
            Node::Leaf { .. } => return at.expect("root must not be a leaf"),
            Node::Internal {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                let next = if row[feature.as_str()] <= *threshold {
                    *left
                } else {
                    *right
                };
                at = Some(next);
                node = tree.node(next).unwrap();
            }
        }
    }
}

fn first_seen_majority(labels: &[u32]) -> u32 {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for &l in labels {
        match counts.iter_mut().find(|(x, _)| *x == l) {
            Some((_, c)) => *c += 1,
            None => counts.push((l, 1)),
        }
    }
    let mut best = counts[0];
    for &(l, c) in &counts[1..] {
        if c > best.1 {
            best = (l, c);
        }
    }
    best.0
}

// ---------------------------------------------------------------------------
// Entropy
// ---------------------------------------------------------------------------

#[test]
fn entropy_zero_iff_uniform_labels() {
    assert_eq!(entropy(&[3, 3, 3]).value(), 0.0);
    assert!(entropy(&[3, 3, 4]).value() > 0.0);
    assert!((entropy(&[0, 1, 1, 0, 1, 0]).value() - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Depth bound
// ---------------------------------------------------------------------------

#[test]
fn depth_never_exceeds_max_depth() {
    let (rows, labels) = make_noisy(42);
    for max_depth in [0, 1, 2, 3, 5, 100] {
        let mut clf = ClassifierConfig::new().with_max_depth(max_depth).build();
        clf.fit(&rows, &labels).unwrap();
        let depth = clf.tree().unwrap().depth();
        assert!(depth <= max_depth, "depth {depth} > max_depth {max_depth}");
    }
}

// ---------------------------------------------------------------------------
// Leaf values
// ---------------------------------------------------------------------------

#[test]
fn every_leaf_holds_majority_of_its_rows() {
    let (rows, labels) = make_noisy(7);
    let mut clf = ClassifierConfig::new()
        .with_max_depth(3)
        .with_feature_subset(FeatureSubset::Fixed(2))
        .build();
    clf.fit(&rows, &labels).unwrap();
    let tree = clf.tree().unwrap();
    assert!(!tree.root().is_leaf());

    let mut reached: Vec<Vec<u32>> = vec![Vec::new(); tree.n_nodes()];
    for (r, &l) in rows.iter().zip(&labels) {
        reached[leaf_of(tree, r).index()].push(l);
    }

    let mut total = 0;
    for (i, node) in tree.nodes().iter().enumerate() {
        if let Node::Leaf {
            value, n_samples, ..
        } = node
        {
            assert_eq!(*n_samples, reached[i].len());
            assert_eq!(*value, first_seen_majority(&reached[i]));
            total += n_samples;
        }
    }
    assert_eq!(total, rows.len());
}

#[test]
fn children_partition_parent_samples() {
    let (rows, labels) = make_noisy(3);
    let mut clf = DecisionTreeClassifier::default();
    clf.fit(&rows, &labels).unwrap();
    let tree = clf.tree().unwrap();
    for node in tree.nodes() {
        if let Some((l, r)) = tree.children(node) {
            assert!(l.n_samples() > 0 && r.n_samples() > 0);
            assert_eq!(l.n_samples() + r.n_samples(), node.n_samples());
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[test]
fn predict_preserves_length_and_order() {
    let (rows, labels) = make_noisy(11);
    let mut clf = DecisionTreeClassifier::default();
    clf.fit(&rows, &labels).unwrap();

    let batch = clf.predict(&rows).unwrap();
    assert_eq!(batch.len(), rows.len());
    for (r, p) in rows.iter().zip(&batch) {
        assert_eq!(clf.predict_row(r).unwrap(), *p);
    }

    let reversed: Vec<Row> = rows.iter().rev().cloned().collect();
    let mut back = clf.predict(&reversed).unwrap();
    back.reverse();
    assert_eq!(back, batch);
}

#[test]
fn predict_is_idempotent() {
    let (rows, labels) = make_noisy(5);
    let mut clf = DecisionTreeClassifier::default();
    clf.fit(&rows, &labels).unwrap();
    let before = clf.tree().unwrap().clone();
    let first = clf.predict(&rows).unwrap();
    let second = clf.predict(&rows).unwrap();
    assert_eq!(first, second);
    assert_eq!(clf.tree().unwrap().nodes(), before.nodes());
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn has_pool_example() {
    let rows = vec![
        row(&[("hasPool", 0.0)]),
        row(&[("hasPool", 0.0)]),
        row(&[("hasPool", 1.0)]),
        row(&[("hasPool", 1.0)]),
    ];
    let mut clf = ClassifierConfig::new()
        .with_min_samples_split(2)
        .with_max_depth(10)
        .with_feature_subset(FeatureSubset::Fixed(1))
        .build();
    clf.fit(&rows, &[0, 0, 1, 1]).unwrap();

    let tree = clf.tree().unwrap();
    let root = tree.root();
    assert_eq!(root.feature(), Some("hasPool"));
    assert_eq!(root.threshold(), Some(0.0));
    let (left, right) = tree.children(root).unwrap();
    assert_eq!(left.value(), Some(&0));
    assert_eq!(right.value(), Some(&1));

    let preds = clf
        .predict(&[row(&[("hasPool", 0.0)]), row(&[("hasPool", 1.0)])])
        .unwrap();
    assert_eq!(preds, vec![0, 1]);

    let layers = clf.layers().unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0], vec![root]);
    assert_eq!(layers[1], vec![left, right]);
}

#[test]
fn identical_rows_terminate_in_single_leaf() {
    let rows = vec![row(&[("a", 2.0), ("b", 5.0), ("c", -1.0)]); 9];
    let labels = ["x", "y", "y", "x", "y", "z", "y", "x", "z"];
    let mut clf = DecisionTreeClassifier::default();
    clf.fit(&rows, &labels).unwrap();
    let tree = clf.tree().unwrap();
    assert_eq!(tree.n_nodes(), 1);
    assert_eq!(tree.root().value(), Some(&"y"));
    assert_eq!(clf.layers().unwrap(), vec![vec![tree.root()]]);
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

#[test]
fn layers_match_recursive_level_order() {
    fn collect<'a, L>(tree: &'a DecisionTree<L>, node: &'a Node<L>, d: usize, out: &mut Vec<Vec<&'a Node<L>>>) {
        if out.len() == d {
            out.push(Vec::new());
        }
        out[d].push(node);
        if let Some((l, r)) = tree.children(node) {
            collect(tree, l, d + 1, out);
            collect(tree, r, d + 1, out);
        }
    }

    for seed in [1, 2, 3, 4] {
        let (rows, labels) = make_noisy(seed);
        let mut clf = ClassifierConfig::new()
            .with_feature_subset(FeatureSubset::Fixed(2))
            .with_seed(seed)
            .build();
        clf.fit(&rows, &labels).unwrap();
        let tree = clf.tree().unwrap();

        let mut expected = Vec::new();
        collect(tree, tree.root(), 0, &mut expected);
        let layers = clf.layers().unwrap();
        assert_eq!(layers, expected);
        assert_eq!(layers.iter().map(Vec::len).sum::<usize>(), tree.n_nodes());
        assert_eq!(layers.len(), tree.depth() + 1);
    }
}
