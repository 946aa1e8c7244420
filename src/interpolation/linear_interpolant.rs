use crate::misc::FloatingPoint;

use super::Interpolant;

/// Piecewise linear interpolant over strictly increasing abscissae
///
/// # Example
/// ```
/// use foilsample::prelude::*;
/// use approx::assert_relative_eq;
///
/// let f = LinearInterpolant::try_new(vec![0., 1., 3.], vec![0., 10., 20.]).unwrap();
/// assert_relative_eq!(f.evaluate(0.5).unwrap(), 5.);
/// assert_relative_eq!(f.evaluate(2.).unwrap(), 15.);
/// assert!(f.evaluate(3.5).is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LinearInterpolant<T: FloatingPoint> {
    xs: Vec<T>,
    ys: Vec<T>,
}

impl<T: FloatingPoint> LinearInterpolant<T> {
    /// Create an interpolant
    /// # Failures
    /// - if the lengths of `xs` and `ys` differ
    /// - if fewer than two samples are given
    /// - if `xs` is not strictly increasing
    pub fn try_new(xs: Vec<T>, ys: Vec<T>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            xs.len() == ys.len(),
            "Abscissae and ordinates differ in length, got {} and {}",
            xs.len(),
            ys.len()
        );
        anyhow::ensure!(
            xs.len() >= 2,
            "At least two samples are required, got {}",
            xs.len()
        );
        if let Some(i) = xs.windows(2).position(|w| !(w[0] < w[1])) {
            anyhow::bail!("Abscissae must be strictly increasing (index {})", i + 1);
        }
        Ok(Self { xs, ys })
    }

    /// Domain covered by the interpolant
    pub fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Index `i` of the interval with `xs[i] <= x <= xs[i + 1]`
    fn interval(&self, x: T) -> usize {
        let upper = self.xs.partition_point(|v| *v <= x);
        upper.clamp(1, self.xs.len() - 1) - 1
    }
}

impl<T: FloatingPoint> Interpolant<T> for LinearInterpolant<T> {
    /// Values slightly beyond the upper bound (relative 1e-12) are clamped,
    /// anything further outside the domain is an error
    fn evaluate(&self, x: T) -> anyhow::Result<T> {
        let (min, max) = self.domain();
        let slack = (max - min) * T::lit(1e-12);
        anyhow::ensure!(
            x >= min && x <= max + slack,
            "Value {} is outside the interpolation domain [{}, {}]",
            x,
            min,
            max
        );
        let x = x.min(max);

        let i = self.interval(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        Ok(y0 + (y1 - y0) * t)
    }
}
