use itertools::Itertools;
use nalgebra::Point2;

use crate::misc::FloatingPoint;

/// Parameterization of the data points of an open curve
/// https://en.wikipedia.org/wiki/Centripetal_Catmull%E2%80%93Rom_spline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum KnotStyle {
    Uniform,
    /// Cumulative chord length
    #[default]
    Chordal,
    Centripetal,
}

impl KnotStyle {
    /// Assign a parameter in [0, 1] to every point, in order
    /// Fails when fewer than two points are given or when consecutive points coincide
    ///
    /// # Example
    /// ```
    /// use foilsample::prelude::*;
    /// use nalgebra::Point2;
    /// let points = vec![Point2::new(0., 0.), Point2::new(1., 0.), Point2::new(1., 3.)];
    /// let u = KnotStyle::Chordal.parameterize(&points).unwrap();
    /// assert_eq!(u, vec![0., 0.25, 1.]);
    /// ```
    pub fn parameterize<T: FloatingPoint>(&self, points: &[Point2<T>]) -> anyhow::Result<Vec<T>> {
        anyhow::ensure!(
            points.len() >= 2,
            "At least two points are required, got {}",
            points.len()
        );

        let steps: Vec<T> = match self {
            KnotStyle::Uniform => vec![T::one(); points.len() - 1],
            KnotStyle::Chordal | KnotStyle::Centripetal => {
                let alpha = self.alpha();
                points
                    .iter()
                    .tuple_windows()
                    .map(|(a, b)| (b - a).norm().powf(alpha))
                    .collect()
            }
        };

        if let Some(i) = steps.iter().position(|d| *d <= T::zero()) {
            anyhow::bail!(
                "Consecutive points {} and {} coincide, cannot parameterize the curve",
                i,
                i + 1
            );
        }

        let mut parameters = Vec::with_capacity(points.len());
        parameters.push(T::zero());
        for step in steps {
            let last = parameters[parameters.len() - 1];
            parameters.push(last + step);
        }

        let total = parameters[parameters.len() - 1];
        anyhow::ensure!(
            total.is_finite(),
            "Non-finite coordinates in the point sequence"
        );
        parameters.iter_mut().for_each(|u| *u /= total);
        Ok(parameters)
    }

    pub fn alpha<T: FloatingPoint>(&self) -> T {
        match self {
            KnotStyle::Uniform => T::zero(),
            KnotStyle::Chordal => T::one(),
            KnotStyle::Centripetal => T::lit(0.5),
        }
    }
}
