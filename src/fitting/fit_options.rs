use crate::curve::KnotStyle;
use crate::misc::FloatingPoint;

/// Hyperparameters for the smoothing spline fit
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitOptions<T: FloatingPoint> {
    /// Upper bound `s` for the sum of squared residuals of the fit.
    /// Zero requests an interpolating spline.
    pub smoothing: T,
    /// Parameterization of the data points
    pub knot_style: KnotStyle,
    /// Relative tolerance on `|fp - s| / s` for the smoothing iteration
    pub tolerance: T,
    /// Maximum number of iterations when searching the smoothing parameter
    pub max_iters: usize,
}

impl<T: FloatingPoint> Default for FitOptions<T> {
    fn default() -> Self {
        Self {
            smoothing: T::lit(1e-6),
            knot_style: KnotStyle::Chordal,
            tolerance: T::lit(1e-3),
            max_iters: 20,
        }
    }
}

impl<T: FloatingPoint> FitOptions<T> {
    pub fn with_smoothing(mut self, smoothing: T) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_knot_style(mut self, knot_style: KnotStyle) -> Self {
        self.knot_style = knot_style;
        self
    }

    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }
}
