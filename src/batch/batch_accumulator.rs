use std::collections::BTreeMap;

use log::warn;

use crate::fitting::FitStatus;
use crate::io::{point_row, write_json, PointRow};
use crate::resample::ResampledCurve;

use super::BatchConfig;

/// Results of a batch run, collected shape by shape
///
/// Shapes are keyed by name: recording a name again replaces whatever
/// was recorded for it before, success or failure.
#[derive(Clone, Debug)]
pub struct BatchAccumulator {
    point_count: usize,
    /// one slot per discovered shape, filled when the shape succeeds
    rows: Vec<Option<PointRow>>,
    /// slot in `rows` of each successful shape
    row_index: BTreeMap<String, usize>,
    residuals: BTreeMap<String, f64>,
    statuses: BTreeMap<String, FitStatus>,
    failures: BTreeMap<String, String>,
}

impl BatchAccumulator {
    pub fn new(shape_count: usize, point_count: usize) -> Self {
        Self {
            point_count,
            rows: vec![None; shape_count],
            row_index: BTreeMap::new(),
            residuals: BTreeMap::new(),
            statuses: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }

    /// Store the resampled curve of the shape discovered at `index`
    pub fn record(
        &mut self,
        index: usize,
        name: &str,
        resampled: &ResampledCurve<f64>,
    ) -> anyhow::Result<()> {
        anyhow::ensure!(
            index < self.rows.len(),
            "Shape index {} out of range for {} shapes",
            index,
            self.rows.len()
        );
        anyhow::ensure!(
            resampled.len() == self.point_count,
            "Expected {} resampled points for {}, got {}",
            self.point_count,
            name,
            resampled.len()
        );
        self.forget(name);
        self.rows[index] = Some(point_row(resampled.points()));
        self.row_index.insert(name.to_string(), index);
        self.residuals.insert(name.to_string(), resampled.residual());
        self.statuses.insert(name.to_string(), resampled.status());
        Ok(())
    }

    pub fn record_failure(&mut self, name: &str, error: &anyhow::Error) {
        self.forget(name);
        self.failures.insert(name.to_string(), format!("{:#}", error));
    }

    /// Drop every result previously recorded under `name`
    fn forget(&mut self, name: &str) {
        let row = self.row_index.remove(name);
        if let Some(index) = row {
            self.rows[index] = None;
        }
        let failed = self.failures.remove(name).is_some();
        if row.is_some() || failed {
            warn!("{}: duplicated shape name, previous results are replaced", name);
            self.residuals.remove(name);
            self.statuses.remove(name);
        }
    }

    /// Rows of the successful shapes in discovery order
    pub fn point_array(&self) -> Vec<&PointRow> {
        self.rows.iter().flatten().collect()
    }

    pub fn residuals(&self) -> &BTreeMap<String, f64> {
        &self.residuals
    }

    pub fn statuses(&self) -> &BTreeMap<String, FitStatus> {
        &self.statuses
    }

    pub fn failures(&self) -> &BTreeMap<String, String> {
        &self.failures
    }

    /// Write the aggregate files named by `config`
    pub fn persist(&self, config: &BatchConfig) -> anyhow::Result<()> {
        write_json(config.points_path(), &self.point_array())?;
        write_json(config.residuals_path(), &self.residuals)?;
        write_json(config.statuses_path(), &self.statuses)?;
        write_json(config.failures_path(), &self.failures)?;
        Ok(())
    }

    pub fn into_report(self) -> BatchReport {
        let warnings = self
            .statuses
            .iter()
            .filter(|(_, status)| status.is_warning())
            .map(|(name, status)| (name.clone(), *status))
            .collect();
        BatchReport {
            discovered: self.rows.len(),
            succeeded: self.rows.iter().flatten().count(),
            failures: self.failures,
            warnings,
        }
    }
}

/// Summary of a batch run
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    discovered: usize,
    succeeded: usize,
    failures: BTreeMap<String, String>,
    warnings: BTreeMap<String, FitStatus>,
}

impl BatchReport {
    /// Number of shape files found
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Number of shapes stored in the point array
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Error message of each failed shape
    pub fn failures(&self) -> &BTreeMap<String, String> {
        &self.failures
    }

    /// Shapes whose fit ended with a warning status
    pub fn warnings(&self) -> &BTreeMap<String, FitStatus> {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.warnings.is_empty()
    }
}
