use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use arbor_io::{
    Correlation, LabelledCsvReader, LabelledDataset, ReportName, ReportWriter, accuracy,
    correlation_matrix, train_test_split,
};
use arbor_tree::{ClassifierConfig, FeatureSubset, Node, RankedFeature};

#[derive(Parser)]
#[command(name = "arbor")]
#[command(about = "Fit and inspect an entropy-driven decision tree classifier")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for per-node feature sampling
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Tree growth parameters.
#[derive(Args, Debug, Clone)]
struct TreeArgs {
    /// Minimum rows a node needs before it may split
    #[arg(long, default_value_t = 2)]
    min_samples_split: usize,

    /// Maximum tree depth (root is depth 0)
    #[arg(long, default_value_t = 100)]
    max_depth: usize,

    /// Features drawn per node: a positive count or "all"
    #[arg(long, default_value = "all", value_parser = parse_feature_subset)]
    feature_subset: FeatureSubset,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a tree on the head of a CSV file and score it on a held-out tail
    Fit {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Name of the class label column
        #[arg(long)]
        label: String,

        /// Comma-separated feature columns (every non-label column if omitted)
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Number of leading rows to use
        #[arg(long, default_value_t = 100)]
        sample_size: usize,

        /// Fraction of the sample used for training, in (0, 1]
        #[arg(long, default_value_t = 0.8)]
        train_fraction: f64,

        /// Output directory for the JSON report (no file written if omitted)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Report name (must match [a-zA-Z0-9_-]+)
        #[arg(long, default_value = "arbor")]
        name: String,

        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Compute pairwise Pearson correlations between feature columns
    Correlate {
        /// Path to the input CSV file
        #[arg(long)]
        data: PathBuf,

        /// Name of the class label column (excluded from the matrix)
        #[arg(long)]
        label: String,

        /// Comma-separated feature columns (every non-label column if omitted)
        #[arg(long, value_delimiter = ',')]
        features: Option<Vec<String>>,

        /// Output directory for the JSON report (no file written if omitted)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Report name (must match [a-zA-Z0-9_-]+)
        #[arg(long, default_value = "arbor")]
        name: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct FitOutput<'a> {
    label: String,
    features: Vec<String>,
    n_rows: usize,
    n_train: usize,
    n_test: usize,
    accuracy: Option<f64>,
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    importances: Vec<RankedFeature>,
    layers: Vec<Vec<&'a Node<String>>>,
}

#[derive(Serialize)]
struct CorrelateOutput {
    label: String,
    features: Vec<String>,
    n_rows: usize,
    correlations: Vec<Correlation>,
}

fn read_dataset(
    data: &Path,
    label: &str,
    features: Option<Vec<String>>,
) -> Result<LabelledDataset> {
    let mut reader = LabelledCsvReader::new(data, label);
    if let Some(features) = features {
        reader = reader.with_features(features);
    }
    reader.read().context("failed to read input CSV")
}

fn parse_feature_subset(s: &str) -> Result<FeatureSubset, String> {
    if s.eq_ignore_ascii_case("all") {
        return Ok(FeatureSubset::All);
    }
    s.parse::<usize>()
        .map(FeatureSubset::Fixed)
        .map_err(|_| format!("expected a feature count or \"all\", got \"{s}\""))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Fit {
            data,
            label,
            features,
            sample_size,
            train_fraction,
            output_dir,
            name,
            tree: tree_args,
        } => {
            let report_name = ReportName::new(name)?;

            let dataset = read_dataset(&data, &label, features)?;
            let feature_names = dataset.feature_names().to_vec();
            let dataset = dataset.head(sample_size);
            let n_rows = dataset.n_samples();

            let split = train_test_split(dataset, train_fraction)
                .context("failed to split dataset")?;

            let config = ClassifierConfig::new()
                .with_min_samples_split(tree_args.min_samples_split)
                .with_max_depth(tree_args.max_depth)
                .with_feature_subset(tree_args.feature_subset)
                .with_seed(cli.seed);
            let mut clf = config.build();
            clf.fit(split.train.rows(), split.train.labels())
                .context("failed to fit decision tree")?;

            let test_accuracy = if split.test.n_samples() == 0 {
                None
            } else {
                let predicted = clf
                    .predict(split.test.rows())
                    .context("failed to predict held-out rows")?;
                accuracy(&predicted, split.test.labels())
            };

            let tree = clf.tree()?;
            info!(
                n_nodes = tree.n_nodes(),
                depth = tree.depth(),
                accuracy = test_accuracy.unwrap_or(f64::NAN),
                "tree fitted"
            );

            let output = FitOutput {
                label,
                features: feature_names,
                n_rows,
                n_train: split.train.n_samples(),
                n_test: split.test.n_samples(),
                accuracy: test_accuracy,
                n_nodes: tree.n_nodes(),
                n_leaves: tree.n_leaves(),
                depth: tree.depth(),
                importances: tree.feature_importances(),
                layers: tree.layers(),
            };

            if let Some(dir) = output_dir {
                let writer = ReportWriter::new(&dir, report_name)?;
                writer.write(&output).context("failed to write report")?;
            }

            if !cli.quiet {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }

        Command::Correlate {
            data,
            label,
            features,
            output_dir,
            name,
        } => {
            let report_name = ReportName::new(name)?;
            let dataset = read_dataset(&data, &label, features)?;

            let correlations = correlation_matrix(&dataset);
            info!(n_pairs = correlations.len(), "correlations computed");

            let output = CorrelateOutput {
                label,
                features: dataset.feature_names().to_vec(),
                n_rows: dataset.n_samples(),
                correlations,
            };

            if let Some(dir) = output_dir {
                let writer = ReportWriter::new(&dir, report_name)?;
                writer.write(&output).context("failed to write report")?;
            }

            if !cli.quiet {
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
    }

    Ok(())
}
