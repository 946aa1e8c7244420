use log::debug;
use nalgebra::{Point2, Vector2};

use crate::curve::BSplineCurve2D;
use crate::knot::KnotVector;
use crate::misc::FloatingPoint;

use super::banded_qr::BandedQr;
use super::rational::RootBracket;
use super::{FitOptions, FitStatus};

/// Smoothing spline fitted to a sequence of points
#[derive(Clone, Debug)]
pub struct FittedSpline<T: FloatingPoint> {
    curve: BSplineCurve2D<T>,
    /// parameter of each data point on the curve
    parameters: Vec<T>,
    /// sum of squared residuals `fp`
    residual: T,
    status: FitStatus,
}

impl<T: FloatingPoint> FittedSpline<T> {
    pub fn curve(&self) -> &BSplineCurve2D<T> {
        &self.curve
    }

    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    /// Smallest and largest data parameter
    pub fn parameter_range(&self) -> (T, T) {
        self.parameters
            .iter()
            .fold((self.parameters[0], self.parameters[0]), |(lo, hi), u| {
                (lo.min(*u), hi.max(*u))
            })
    }

    pub fn residual(&self) -> T {
        self.residual
    }

    pub fn status(&self) -> FitStatus {
        self.status
    }
}

impl<T: FloatingPoint> BSplineCurve2D<T> {
    /// Fit a smoothing B-spline through an ordered sequence of points
    ///
    /// The spline is open (non-periodic), clamped at the first and last data parameters,
    /// and uses as few knots as possible for the sum of squared residuals `fp`
    /// to stay below `options.smoothing`.
    ///
    /// # Failures
    /// - if the degree is not between 1 and 5
    /// - if there are not more points than the degree
    /// - if a coordinate is not finite or consecutive points coincide
    /// - if a least-squares system turns out singular
    ///
    /// # Example
    /// ```
    /// use foilsample::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let points: Vec<_> = (0..20)
    ///     .map(|i| {
    ///         let x = i as f64 / 19.;
    ///         Point2::new(x, x * x)
    ///     })
    ///     .collect();
    /// let fit = BSplineCurve2D::try_smoothing_fit(&points, 3, &FitOptions::default()).unwrap();
    /// assert!(fit.status().is_success());
    /// assert!(fit.residual() <= 1.001e-6);
    /// assert_relative_eq!(fit.curve().point_at(0.), points[0], epsilon = 1e-3);
    /// ```
    pub fn try_smoothing_fit(
        points: &[Point2<T>],
        degree: usize,
        options: &FitOptions<T>,
    ) -> anyhow::Result<FittedSpline<T>> {
        anyhow::ensure!(
            (1..=5).contains(&degree),
            "Degree must be between 1 and 5, got {}",
            degree
        );
        anyhow::ensure!(
            points.len() > degree,
            "Too few points for a degree {} fit, got {}",
            degree,
            points.len()
        );
        anyhow::ensure!(
            points.iter().all(|p| p.x.is_finite() && p.y.is_finite()),
            "Non-finite coordinates in the point sequence"
        );
        anyhow::ensure!(
            options.smoothing >= T::zero(),
            "Smoothing bound must not be negative"
        );

        let parameters = options.knot_style.parameterize(points)?;
        Observations {
            points,
            parameters,
            degree,
        }
        .fit(options)
    }
}

/// Least-squares solution on a fixed knot vector
struct Solution<T: FloatingPoint> {
    knots: KnotVector<T>,
    coefficients: Vec<Vector2<T>>,
    /// squared residual of each data point
    residuals: Vec<T>,
    fp: T,
    /// sum of the diagonal of the triangular factor of the unpenalized system
    diagonal_sum: T,
}

/// Data points with their parameters
struct Observations<'a, T: FloatingPoint> {
    points: &'a [Point2<T>],
    parameters: Vec<T>,
    degree: usize,
}

impl<T: FloatingPoint> Observations<'_, T> {
    fn fit(self, options: &FitOptions<T>) -> anyhow::Result<FittedSpline<T>> {
        let k = self.degree;
        let nmin = 2 * (k + 1);
        let nmax = self.points.len() + k + 1;
        let s = options.smoothing;

        if s == T::zero() {
            let solution = self.solve(&self.interpolation_knots(), None)?;
            return self.finish(solution, FitStatus::Interpolating);
        }

        let acc = options.tolerance * s;
        let mut knots = self.clamped(&[]);
        let mut fp0 = T::zero();
        let mut fpold = T::zero();
        let mut nplus = 0;

        let least_squares = loop {
            let solution = self.solve(&knots, None)?;
            let n = knots.len();
            let fpms = solution.fp - s;
            debug!("least-squares fit with {} knots, fp = {}", n, solution.fp);

            if n == nmin {
                fp0 = solution.fp;
            }
            if fpms.abs() < acc {
                let status = if n == nmin {
                    FitStatus::Polynomial
                } else {
                    FitStatus::Converged
                };
                return self.finish(solution, status);
            }
            if fpms < T::zero() {
                if n == nmin {
                    return self.finish(solution, FitStatus::Polynomial);
                }
                break solution;
            }
            if n == nmax {
                return self.finish(solution, FitStatus::Interpolating);
            }

            nplus = if n == nmin {
                1
            } else {
                let decrease = fpold - solution.fp;
                let npl1 = if decrease > acc {
                    (T::from_count(nplus) * fpms / decrease)
                        .to_usize()
                        .unwrap_or(nplus * 2)
                } else {
                    nplus * 2
                };
                (nplus * 2).min(npl1.max(nplus / 2).max(1))
            };
            fpold = solution.fp;
            knots = self.refine_knots(&solution, nplus, nmax);
        };

        self.smooth(least_squares, fp0, options)
    }

    /// Find the smoothing parameter `p` for which the penalized fit has `fp = s`
    fn smooth(
        &self,
        least_squares: Solution<T>,
        fp0: T,
        options: &FitOptions<T>,
    ) -> anyhow::Result<FittedSpline<T>> {
        let s = options.smoothing;
        let acc = options.tolerance * s;
        let (con1, con4, con9) = (T::lit(0.1), T::lit(0.04), T::lit(0.9));

        let knots = least_squares.knots.clone();
        let mut bracket = RootBracket {
            p1: T::zero(),
            f1: fp0 - s,
            p3: None,
            f3: least_squares.fp - s,
        };
        let mut p = T::from_count(knots.basis_count(self.degree)) / least_squares.diagonal_sum;
        let (mut ich1, mut ich3) = (false, false);
        let mut widths = vec![];

        let mut iter = 0;
        loop {
            iter += 1;
            let solution = self.solve(&knots, Some(T::one() / p))?;
            let fpms = solution.fp - s;
            debug!("smoothing iteration {}, p = {}, fp = {}", iter, p, solution.fp);

            if fpms.abs() < acc {
                return self.finish(solution, FitStatus::Converged);
            }
            if iter >= options.max_iters {
                return self.finish(solution, FitStatus::IterationLimit);
            }

            let (p2, f2) = (p, fpms);
            if !ich3 {
                if f2 - bracket.f3 <= acc {
                    // p is too large, the penalty has no effect yet
                    bracket.p3 = Some(p2);
                    bracket.f3 = f2;
                    p *= con4;
                    if p <= bracket.p1 {
                        p = bracket.p1 * con9 + p2 * con1;
                    }
                    continue;
                }
                if f2 < T::zero() {
                    ich3 = true;
                }
            }
            if !ich1 {
                if bracket.f1 - f2 <= acc {
                    // p is too small, the fit is still the polynomial
                    bracket.p1 = p2;
                    bracket.f1 = f2;
                    p /= con4;
                    if let Some(p3) = bracket.p3 {
                        if p >= p3 {
                            p = p2 * con1 + p3 * con9;
                        }
                    }
                    continue;
                }
                if f2 > T::zero() {
                    ich1 = true;
                }
            }

            if f2 >= bracket.f1 || f2 <= bracket.f3 {
                return self.finish(solution, FitStatus::NotMonotone);
            }
            p = bracket.interpolate(p2, f2);
            p = bracket.safeguard(p, &mut widths);
        }
    }

    /// Solve the (optionally penalized) least-squares problem on the given knots
    /// `penalty` weights the jumps of the k-th derivative at the interior knots
    fn solve(&self, knots: &KnotVector<T>, penalty: Option<T>) -> anyhow::Result<Solution<T>> {
        let k = self.degree;
        let mut qr = BandedQr::new(knots.basis_count(k), k + 2);

        let rows: Vec<(usize, Vec<T>)> = self
            .parameters
            .iter()
            .map(|u| {
                let span = knots.find_knot_span_index(k, *u);
                (span - k, knots.basis_functions(span, *u, k))
            })
            .collect();
        for ((start, basis), point) in rows.iter().zip(self.points.iter()) {
            qr.add_row(*start, basis, point.coords);
        }
        let diagonal_sum = qr.diagonal_sum();

        if let Some(weight) = penalty {
            for (start, jumps) in self.jump_rows(knots) {
                let scaled: Vec<T> = jumps.iter().map(|j| *j * weight).collect();
                qr.add_row(start, &scaled, Vector2::zeros());
            }
        }

        let coefficients = qr.solve()?;
        let residuals: Vec<T> = rows
            .iter()
            .zip(self.points.iter())
            .map(|((start, basis), point)| {
                let fitted = basis
                    .iter()
                    .enumerate()
                    .fold(Vector2::zeros(), |acc, (j, b)| {
                        acc + coefficients[start + j] * *b
                    });
                (fitted - point.coords).norm_squared()
            })
            .collect();
        let fp = residuals.iter().fold(T::zero(), |acc, r| acc + *r);

        Ok(Solution {
            knots: knots.clone(),
            coefficients,
            residuals,
            fp,
            diagonal_sum,
        })
    }

    /// Jumps of the k-th derivative of the basis functions at each interior knot,
    /// normalized by `h^k / k!` with `h` the mean knot interval
    fn jump_rows(&self, knots: &KnotVector<T>) -> Vec<(usize, Vec<T>)> {
        let k = self.degree;
        let (start, end) = knots.domain(k);
        let intervals = knots.interior(k).len() + 1;
        let h = (end - start) / T::from_count(intervals);
        let factorial = (1..=k).fold(T::one(), |acc, i| acc * T::from_count(i));
        let scale = h.powi(k as i32) / factorial;

        ((k + 1)..(knots.len() - k - 1))
            .map(|j| {
                let t = knots[j];
                let left = knots.derivative_basis_functions(j - 1, t, k, k).swap_remove(k);
                let right = knots.derivative_basis_functions(j, t, k, k).swap_remove(k);
                let mut row = vec![T::zero(); k + 2];
                for r in 0..=k {
                    row[r] -= left[r] * scale;
                    row[r + 1] += right[r] * scale;
                }
                (j - 1 - k, row)
            })
            .collect()
    }

    /// Insert up to `count` knots, each in the middle of the data points of the knot interval
    /// carrying the largest residual. Falls back to the interpolation knots once the
    /// number of knots reaches `nmax` or no interval can be split any further.
    fn refine_knots(&self, solution: &Solution<T>, count: usize, nmax: usize) -> KnotVector<T> {
        let mut knots = solution.knots.clone();
        let mut inserted = 0;
        while inserted < count && knots.len() < nmax {
            match self.split_worst_interval(&knots, &solution.residuals) {
                Some(knot) => {
                    knots.insert(knot);
                    inserted += 1;
                }
                None => break,
            }
        }

        if inserted == 0 || knots.len() >= nmax {
            self.interpolation_knots()
        } else {
            knots
        }
    }

    fn split_worst_interval(&self, knots: &KnotVector<T>, residuals: &[T]) -> Option<T> {
        let k = self.degree;
        let intervals = knots.len() - 2 * k - 1;
        let half = T::lit(0.5);
        let mut weights = vec![T::zero(); intervals];
        // first data index and number of data points strictly inside each interval
        let mut inside: Vec<(usize, usize)> = vec![(0, 0); intervals];

        for (i, (u, r)) in self.parameters.iter().zip(residuals.iter()).enumerate() {
            let span = knots.find_knot_span_index(k, *u);
            let index = span - k;
            if *u == knots[span] && index > 0 {
                weights[index - 1] += *r * half;
                weights[index] += *r * half;
            } else {
                weights[index] += *r;
            }
            if *u > knots[span] && *u < knots[span + 1] {
                let entry = &mut inside[index];
                if entry.1 == 0 {
                    entry.0 = i;
                }
                entry.1 += 1;
            }
        }

        (0..intervals)
            .filter(|i| inside[*i].1 > 0)
            .fold(None, |best: Option<usize>, i| match best {
                Some(b) if weights[b] >= weights[i] => Some(b),
                _ => Some(i),
            })
            .map(|i| {
                let (first, count) = inside[i];
                self.parameters[first + count / 2]
            })
    }

    /// Knots of the interpolating spline: data parameters for odd degrees,
    /// midpoints between data parameters for even degrees
    fn interpolation_knots(&self) -> KnotVector<T> {
        let k = self.degree;
        let u = &self.parameters;
        let count = u.len() - k - 1;
        let interior: Vec<T> = if k % 2 == 1 {
            let first = (k + 1) / 2;
            u[first..(first + count)].to_vec()
        } else {
            let first = k / 2 + 1;
            (first..(first + count))
                .map(|j| (u[j] + u[j - 1]) * T::lit(0.5))
                .collect()
        };
        self.clamped(&interior)
    }

    fn clamped(&self, interior: &[T]) -> KnotVector<T> {
        let u = &self.parameters;
        KnotVector::clamped(self.degree, interior, u[0], u[u.len() - 1])
    }

    fn finish(&self, solution: Solution<T>, status: FitStatus) -> anyhow::Result<FittedSpline<T>> {
        debug!(
            "fit finished with {} knots, fp = {}, status {}",
            solution.knots.len(),
            solution.fp,
            status.code()
        );
        let residual = match status {
            FitStatus::Interpolating => T::zero(),
            _ => solution.fp,
        };
        let control_points = solution.coefficients.into_iter().map(Point2::from).collect();
        let curve = BSplineCurve2D::try_new(self.degree, control_points, solution.knots.to_vec())?;
        Ok(FittedSpline {
            curve,
            parameters: self.parameters.clone(),
            residual,
            status,
        })
    }
}
