use nalgebra::{Point2, Vector2};

use crate::knot::KnotVector;
use crate::misc::{linspace, Curvature, FloatingPoint};

/// Non-rational planar B-spline curve
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound(serialize = "T: serde::Serialize", deserialize = "T: serde::Deserialize<'de>"))]
pub struct BSplineCurve2D<T: FloatingPoint> {
    control_points: Vec<Point2<T>>,
    degree: usize,
    /// the length of the knot vector is equal to the `# of control points + degree + 1`
    knots: KnotVector<T>,
}

impl<T: FloatingPoint> BSplineCurve2D<T> {
    /// Create a new B-spline curve
    /// # Failures
    /// - if the number of control points is not greater than the degree
    /// - the number of knots is not equal to the number of control points + the degree + 1
    /// - the knots are not sorted
    ///
    /// # Example
    /// ```
    /// use foilsample::prelude::*;
    /// use nalgebra::Point2;
    ///
    /// let control_points = vec![
    ///     Point2::new(0., 0.),
    ///     Point2::new(1., 2.),
    ///     Point2::new(3., 2.),
    ///     Point2::new(4., 0.),
    /// ];
    /// let curve = BSplineCurve2D::try_new(3, control_points, vec![0., 0., 0., 0., 1., 1., 1., 1.]);
    /// assert!(curve.is_ok());
    /// let curve = curve.unwrap();
    /// assert_eq!(curve.point_at(0.), Point2::new(0., 0.));
    /// assert_eq!(curve.point_at(1.), Point2::new(4., 0.));
    /// ```
    pub fn try_new(
        degree: usize,
        control_points: Vec<Point2<T>>,
        knots: Vec<T>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(degree > 0, "Degree must be at least 1");
        anyhow::ensure!(
            control_points.len() > degree,
            "Too few control points for curve"
        );
        anyhow::ensure!(
            knots.len() == control_points.len() + degree + 1,
            "Invalid number of knots, got {}, expected {}",
            knots.len(),
            control_points.len() + degree + 1
        );
        anyhow::ensure!(
            knots.windows(2).all(|w| w[0] <= w[1]),
            "Knots must be in non-decreasing order"
        );

        Ok(Self {
            control_points,
            degree,
            knots: KnotVector::new(knots),
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector<T> {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point2<T>] {
        &self.control_points
    }

    pub fn knots_domain(&self) -> (T, T) {
        self.knots.domain(self.degree)
    }

    /// Evaluate the curve at a given parameter
    pub fn point_at(&self, u: T) -> Point2<T> {
        let span = self.knots.find_knot_span_index(self.degree, u);
        let basis = self.knots.basis_functions(span, u, self.degree);
        let offset = span - self.degree;
        let coords = basis
            .iter()
            .enumerate()
            .fold(Vector2::zeros(), |acc, (i, b)| {
                acc + self.control_points[offset + i].coords * *b
            });
        Point2::from(coords)
    }

    /// Evaluate the curve and its derivatives up to `derivs` at a given parameter
    /// The first element is the position vector, the k-th one the k-th derivative
    pub fn derivatives_at(&self, u: T, derivs: usize) -> Vec<Vector2<T>> {
        let span = self.knots.find_knot_span_index(self.degree, u);
        let nders = self
            .knots
            .derivative_basis_functions(span, u, self.degree, derivs);
        let offset = span - self.degree;
        nders
            .iter()
            .map(|row| {
                row.iter().enumerate().fold(Vector2::zeros(), |acc, (j, b)| {
                    acc + self.control_points[offset + j].coords * *b
                })
            })
            .collect()
    }

    /// Curvature at a given parameter, zero where the curve is stationary
    pub fn curvature_at(&self, u: T) -> Curvature<T> {
        let ders = self.derivatives_at(u, 2);
        Curvature::derivatives(&ders[1], &ders[2]).unwrap_or_else(|zero| zero)
    }

    /// Evaluate the curve at each of the given parameters
    pub fn points_at(&self, parameters: &[T]) -> Vec<Point2<T>> {
        parameters.iter().map(|u| self.point_at(*u)).collect()
    }

    #[allow(clippy::type_complexity)]
    /// Sample the curve at a given number of points between the start and end
    /// Return the vector of tuples of parameter and point
    pub fn sample_regular_range_with_parameter(
        &self,
        start: T,
        end: T,
        samples: usize,
    ) -> Vec<(T, Point2<T>)> {
        linspace(start, end, samples)
            .into_iter()
            .map(|u| (u, self.point_at(u)))
            .collect()
    }
}
