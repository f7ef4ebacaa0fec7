//! JSON and SVG artifact writer for alignment results.

use std::fs;
use std::path::{Path, PathBuf};

use ddtw_core::{Alignment, DistanceMatrix, WarpingPath};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::{ExperimentName, SignalId};
use crate::plot::Figure;

/// Writes alignment results and figures into an output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Files are named `{experiment}_{kind}.{ext}`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path an artifact of the given kind and extension would be written to.
    #[must_use]
    pub fn artifact_path(&self, kind: &str, ext: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.{ext}", self.experiment.as_str()))
    }

    /// Write a single alignment to `{experiment}_alignment.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(first = %first, second = %second))]
    pub fn write_alignment(
        &self,
        first: &SignalId,
        second: &SignalId,
        alignment: &Alignment,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("alignment", "json");

        let artifact = AlignmentArtifact {
            experiment: self.experiment.as_str(),
            first: first.as_str(),
            second: second.as_str(),
            distance: alignment.distance.value(),
            path_len: alignment.path.len(),
            path: &alignment.path,
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "alignment written");
        Ok(path)
    }

    /// Write a pairwise distance matrix to `{experiment}_pairwise.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(n = ids.len()))]
    pub fn write_pairwise(
        &self,
        ids: &[SignalId],
        matrix: &DistanceMatrix,
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("pairwise", "json");

        let artifact = PairwiseArtifact {
            experiment: self.experiment.as_str(),
            ids: ids.iter().map(SignalId::as_str).collect(),
            distances: matrix.to_rows(),
        };

        self.write_json(&path, &artifact)?;
        info!(path = %path.display(), "pairwise matrix written");
        Ok(path)
    }

    /// Render a figure to `{experiment}_{name}.svg`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(name = %name))]
    pub fn write_figure(&self, name: &str, figure: &Figure) -> Result<PathBuf, IoError> {
        let path = self.artifact_path(name, "svg");
        fs::write(&path, figure.to_svg()).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "figure written");
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).map_err(|e| IoError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    experiment: &'a str,
    first: &'a str,
    second: &'a str,
    distance: f64,
    path_len: usize,
    path: &'a WarpingPath,
}

#[derive(Serialize)]
struct PairwiseArtifact<'a> {
    experiment: &'a str,
    ids: Vec<&'a str>,
    distances: Vec<Vec<f64>>,
}
