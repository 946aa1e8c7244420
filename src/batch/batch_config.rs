use std::path::{Path, PathBuf};

use crate::resample::ResampleOptions;

/// Locations and parameters of a batch run
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchConfig {
    /// Directory holding one coordinate file per shape
    pub data_dir: PathBuf,
    /// Extension of the shape files, any extension when `None`
    pub extension: Option<String>,
    /// Directory receiving one svg plot per shape
    pub plot_dir: PathBuf,
    /// Directory receiving the aggregate json files
    pub output_dir: PathBuf,
    pub resample: ResampleOptions<f64>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extension: None,
            plot_dir: PathBuf::from("plots_interp"),
            output_dir: PathBuf::from("."),
            resample: ResampleOptions::default(),
        }
    }
}

impl BatchConfig {
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_plot_dir(mut self, plot_dir: impl Into<PathBuf>) -> Self {
        self.plot_dir = plot_dir.into();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_resample(mut self, resample: ResampleOptions<f64>) -> Self {
        self.resample = resample;
        self
    }

    /// `(shapes, N, 2)` array of the resampled points
    pub fn points_path(&self) -> PathBuf {
        self.output_dir.join("airfoil_interp.json")
    }

    /// Mapping from shape name to fit residual
    pub fn residuals_path(&self) -> PathBuf {
        self.output_dir.join("fps.json")
    }

    /// Mapping from shape name to fit status code
    pub fn statuses_path(&self) -> PathBuf {
        self.output_dir.join("iers.json")
    }

    /// Mapping from shape name to the error that stopped its processing
    pub fn failures_path(&self) -> PathBuf {
        self.output_dir.join("failures.json")
    }

    pub fn plot_path(&self, name: &str) -> PathBuf {
        self.plot_dir.join(format!("{}.svg", name))
    }

    /// Whether `path` names a shape file: a file name with an extension
    /// matching `extension` (case-insensitive) when one is set
    pub fn is_shape_file(&self, path: &Path) -> bool {
        match (path.extension(), &self.extension) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(ext), Some(expected)) => ext.eq_ignore_ascii_case(expected),
        }
    }
}
