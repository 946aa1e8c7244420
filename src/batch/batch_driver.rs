use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info, warn};

use crate::io::{read_coordinates, SvgPlot};
use crate::resample::{try_resample, ResampledCurve};

use super::{BatchAccumulator, BatchConfig, BatchReport};

/// Resample every shape file of the configured data directory and persist the results
///
/// A shape that cannot be loaded, resampled or plotted is logged, listed in `failures.json`
/// and left out of the other outputs. Failing to list the data directory or to write
/// an aggregate file aborts the run.
pub fn run_batch(config: &BatchConfig) -> anyhow::Result<BatchReport> {
    let paths = discover(config)?;
    info!(
        "found {} shape files in {}",
        paths.len(),
        config.data_dir.display()
    );

    std::fs::create_dir_all(&config.plot_dir)
        .with_context(|| format!("Failed to create {}", config.plot_dir.display()))?;
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let mut accumulator = BatchAccumulator::new(paths.len(), config.resample.count);
    for (index, path) in paths.iter().enumerate() {
        let name = shape_name(path);
        info!("{} {}", index, name);
        match process_shape(path, &name, config) {
            Ok(resampled) => {
                if resampled.status().is_warning() {
                    warn!("{}: {}", name, resampled.status());
                }
                accumulator.record(index, &name, &resampled)?;
            }
            Err(error) => {
                warn!("{}: {:#}", name, error);
                accumulator.record_failure(&name, &error);
            }
        }
    }

    accumulator.persist(config)?;
    let report = accumulator.into_report();
    info!(
        "resampled {} of {} shapes, {} failed, {} with fit warnings",
        report.succeeded(),
        report.discovered(),
        report.failed(),
        report.warnings().len()
    );
    Ok(report)
}

/// Shape files of the data directory, sorted by path
fn discover(config: &BatchConfig) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(&config.data_dir)
        .with_context(|| format!("Failed to list {}", config.data_dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", config.data_dir.display()))?
            .path();
        if path.is_file() && config.is_shape_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn shape_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn process_shape(
    path: &Path,
    name: &str,
    config: &BatchConfig,
) -> anyhow::Result<ResampledCurve<f64>> {
    let points = read_coordinates::<f64>(path)?;
    debug!("{}: {} points", name, points.len());

    let resampled = try_resample(&points, &config.resample)?;

    SvgPlot::resampling(
        name,
        &points,
        resampled.points(),
        resampled.residual(),
        resampled.status(),
    )
    .write(config.plot_path(name))?;

    Ok(resampled)
}
