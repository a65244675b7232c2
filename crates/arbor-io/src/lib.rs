//! Data loading, partitioning, correlation, and report writing around the
//! arbor classifier.

mod correlation;
mod domain;
mod error;
mod reader;
mod split;
mod writer;

pub use correlation::{Correlation, correlation_matrix};
pub use domain::{LabelledDataset, ReportName};
pub use error::IoError;
pub use reader::LabelledCsvReader;
pub use split::{TrainTestSplit, accuracy, train_test_split};
pub use writer::ReportWriter;
