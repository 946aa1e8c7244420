use anyhow::Context;
use log::debug;
use nalgebra::Point2;

use crate::curve::BSplineCurve2D;
use crate::fitting::FitStatus;
use crate::integration::cumulative_trapezoid;
use crate::interpolation::{Interpolant, LinearInterpolant};
use crate::misc::{linspace, FloatingPoint};

use super::ResampleOptions;

/// Points resampled along a fitted curve, with the diagnostics of the fit
#[derive(Clone, Debug, PartialEq)]
pub struct ResampledCurve<T: FloatingPoint> {
    points: Vec<Point2<T>>,
    parameters: Vec<T>,
    residual: T,
    status: FitStatus,
}

impl<T: FloatingPoint> ResampledCurve<T> {
    pub fn points(&self) -> &[Point2<T>] {
        &self.points
    }

    pub fn xs(&self) -> Vec<T> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<T> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Curve parameter of each resampled point
    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    /// Sum of squared residuals `fp` of the spline fit
    pub fn residual(&self) -> T {
        self.residual
    }

    /// Status `ier` of the spline fit
    pub fn status(&self) -> FitStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resample `options.count` points along a smoothing spline through `points`,
/// concentrating them where the curve bends most.
///
/// The sampling density along the curve parameter is proportional to `kappa(u) + D`:
/// the offset-curvature is integrated over a dense grid of parameters and the
/// resulting profile is inverted at evenly spaced values.
///
/// # Failures
/// - if `count` is zero or `resolution` is below two
/// - if the spline fit fails (too few points, coincident consecutive points, ...)
/// - if the curvature profile is not finite or not strictly increasing
///
/// # Example
/// ```
/// use foilsample::prelude::*;
/// use nalgebra::Point2;
///
/// let points: Vec<_> = (0..50)
///     .map(|i| {
///         let t = std::f64::consts::PI * i as f64 / 49.;
///         Point2::new(t.cos(), 0.2 * t.sin())
///     })
///     .collect();
/// let resampled = try_resample(&points, &ResampleOptions::default().with_count(16)).unwrap();
/// assert_eq!(resampled.len(), 16);
/// assert_eq!(resampled.xs().len(), resampled.ys().len());
/// ```
pub fn try_resample<T: FloatingPoint>(
    points: &[Point2<T>],
    options: &ResampleOptions<T>,
) -> anyhow::Result<ResampledCurve<T>> {
    anyhow::ensure!(options.count > 0, "The number of resampled points must be positive");
    anyhow::ensure!(
        options.resolution >= 2,
        "The curvature profile needs at least two samples, got {}",
        options.resolution
    );
    anyhow::ensure!(
        options.curvature_offset.is_finite() && options.curvature_offset > T::zero(),
        "The curvature offset must be finite and positive, got {}",
        options.curvature_offset
    );

    let fit = BSplineCurve2D::try_smoothing_fit(points, options.degree, &options.fit)
        .context("Failed to fit a smoothing spline")?;
    if fit.status().is_warning() {
        debug!("spline fit reported: {}", fit.status());
    }

    let curve = fit.curve();
    let (start, end) = fit.parameter_range();
    let dense = linspace(start, end, options.resolution);

    let profile: Vec<T> = dense
        .iter()
        .map(|u| curve.curvature_at(*u).kappa() + options.curvature_offset)
        .collect();
    anyhow::ensure!(
        profile.iter().all(|v| v.is_finite()),
        "Curvature profile is not finite"
    );

    let accumulated = cumulative_trapezoid(&profile, &dense)?;
    let total = accumulated[accumulated.len() - 1];
    let inverse = LinearInterpolant::try_new(accumulated, dense)
        .context("Curvature profile is not strictly increasing")?;

    let targets = linspace(T::zero(), total, options.count);
    let parameters = inverse.evaluate_all(&targets)?;
    let points = curve.points_at(&parameters);
    debug!(
        "resampled {} points, curvature profile total {}",
        points.len(),
        total
    );

    Ok(ResampledCurve {
        points,
        parameters,
        residual: fit.residual(),
        status: fit.status(),
    })
}
