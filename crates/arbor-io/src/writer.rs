//! JSON report writer for fitted-model summaries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ReportName;

/// Writes a report to `{dir}/{name}_report.json`.
///
/// Creates the output directory on construction if it does not exist.
pub struct ReportWriter {
    output_dir: PathBuf,
    name: ReportName,
}

/// On-disk layout: the report name followed by the report's own fields.
#[derive(Serialize)]
struct ReportArtifact<'a, T> {
    name: &'a str,
    #[serde(flatten)]
    report: &'a T,
}

impl ReportWriter {
    /// Create a new writer targeting the given directory and report name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), name = %name))]
    pub fn new(output_dir: &Path, name: ReportName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            name,
        })
    }

    /// Path the report is written to.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_report.json", self.name.as_str()))
    }

    /// Serialize `report` as pretty JSON and write it, returning the path.
    ///
    /// `report` must serialize as a JSON object (a struct or map).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | `report` is not an object or fails to encode |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(name = %self.name))]
    pub fn write<T: Serialize>(&self, report: &T) -> Result<PathBuf, IoError> {
        let path = self.path();
        let artifact = ReportArtifact {
            name: self.name.as_str(),
            report,
        };
        let json = serde_json::to_string_pretty(&artifact).map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), bytes = json.len(), "report written");
        Ok(path)
    }
}
