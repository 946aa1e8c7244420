//! Resample every airfoil outline of `data/` with curvature-weighted spacing.
//!
//! Writes one plot per shape to `plots_interp/` and the aggregate
//! `airfoil_interp.json`, `fps.json`, `iers.json` and `failures.json`
//! to the working directory. Log verbosity follows `RUST_LOG`.

use foilsample::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("foilsample v{}", env!("CARGO_PKG_VERSION"));

    let report = run_batch(&BatchConfig::default())?;
    for (name, message) in report.failures() {
        log::warn!("{} was skipped: {}", name, message);
    }
    Ok(())
}
