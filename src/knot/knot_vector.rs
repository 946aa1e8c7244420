use std::ops::Index;

use crate::misc::FloatingPoint;

/// Knot vector representation
/// Knots are kept in non-decreasing order
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KnotVector<T>(Vec<T>);

impl<T: FloatingPoint> KnotVector<T> {
    pub fn new(knots: Vec<T>) -> Self {
        Self(knots)
    }

    /// Create a clamped knot vector over [start, end]
    /// the boundary knots are repeated `degree + 1` times around the given interior knots
    /// # Example
    /// ```
    /// use foilsample::prelude::KnotVector;
    /// let knots: KnotVector<f64> = KnotVector::clamped(2, &[0.25, 0.5], 0., 1.);
    /// assert_eq!(knots.to_vec(), vec![0., 0., 0., 0.25, 0.5, 1., 1., 1.]);
    /// ```
    pub fn clamped(degree: usize, interior: &[T], start: T, end: T) -> Self {
        let mut knots = Vec::with_capacity(interior.len() + 2 * (degree + 1));
        knots.extend(std::iter::repeat(start).take(degree + 1));
        knots.extend_from_slice(interior);
        knots.extend(std::iter::repeat(end).take(degree + 1));
        Self(knots)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.0.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Get the domain of the knot vector by degree
    pub fn domain(&self, degree: usize) -> (T, T) {
        (self.0[degree], self.0[self.0.len() - 1 - degree])
    }

    /// Number of basis functions (= control points) spanned by the knots for a degree
    pub fn basis_count(&self, degree: usize) -> usize {
        self.0.len() - degree - 1
    }

    /// Knots strictly between the clamped ends
    pub fn interior(&self, degree: usize) -> &[T] {
        &self.0[(degree + 1)..(self.0.len() - degree - 1)]
    }

    /// Insert a knot keeping the order and return its index
    pub fn insert(&mut self, knot: T) -> usize {
        let index = self.0.partition_point(|t| *t <= knot);
        self.0.insert(index, knot);
        index
    }

    /// Find the knot span index `i` with `knots[i] <= u < knots[i + 1]`
    /// Parameters outside the domain are attached to the first or last span
    ///
    /// # Example
    /// ```
    /// use foilsample::prelude::KnotVector;
    /// let knots = KnotVector::new(vec![0., 0., 0., 1., 2., 3., 3., 3.]);
    /// assert_eq!(knots.find_knot_span_index(2, 2.5), 4);
    /// assert_eq!(knots.find_knot_span_index(2, 3.), 4);
    /// assert_eq!(knots.find_knot_span_index(2, 0.), 2);
    /// ```
    pub fn find_knot_span_index(&self, degree: usize, u: T) -> usize {
        let last = self.basis_count(degree) - 1;
        if u >= self[last + 1] {
            return last;
        }
        if u <= self[degree] {
            return degree;
        }

        let mut low = degree;
        let mut high = last + 1;
        let mut mid = (low + high) / 2;
        while u < self[mid] || u >= self[mid + 1] {
            if u < self[mid] {
                high = mid;
            } else {
                low = mid;
            }
            mid = (low + high) / 2;
        }
        mid
    }

    /// Compute the `degree + 1` non-vanishing basis functions on a knot span
    pub fn basis_functions(&self, span: usize, u: T, degree: usize) -> Vec<T> {
        let mut basis = vec![T::zero(); degree + 1];
        let mut left = vec![T::zero(); degree + 1];
        let mut right = vec![T::zero(); degree + 1];
        basis[0] = T::one();

        for j in 1..=degree {
            left[j] = u - self[span + 1 - j];
            right[j] = self[span + j] - u;
            let mut saved = T::zero();
            for r in 0..j {
                let temp = basis[r] / (right[r + 1] + left[j - r]);
                basis[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            basis[j] = saved;
        }

        basis
    }

    /// Compute the non-vanishing basis functions and their derivatives up to `derivs`
    /// Row `k` holds the k-th derivative of the `degree + 1` basis functions of the span.
    /// Rows above the degree are zero.
    pub fn derivative_basis_functions(
        &self,
        span: usize,
        u: T,
        degree: usize,
        derivs: usize,
    ) -> Vec<Vec<T>> {
        let p = degree;
        // ndu: basis functions in the upper triangle, knot differences in the lower one
        let mut ndu = vec![vec![T::zero(); p + 1]; p + 1];
        let mut left = vec![T::zero(); p + 1];
        let mut right = vec![T::zero(); p + 1];
        ndu[0][0] = T::one();

        for j in 1..=p {
            left[j] = u - self[span + 1 - j];
            right[j] = self[span + j] - u;
            let mut saved = T::zero();
            for r in 0..j {
                ndu[j][r] = right[r + 1] + left[j - r];
                let temp = ndu[r][j - 1] / ndu[j][r];
                ndu[r][j] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            ndu[j][j] = saved;
        }

        let mut ders = vec![vec![T::zero(); p + 1]; derivs + 1];
        for j in 0..=p {
            ders[0][j] = ndu[j][p];
        }

        let top = derivs.min(p) as isize;
        let pi = p as isize;
        let mut a = vec![vec![T::zero(); p + 1]; 2];

        for r in 0..=pi {
            let (mut s1, mut s2) = (0, 1);
            a[0][0] = T::one();

            for k in 1..=top {
                let mut d = T::zero();
                let rk = r - k;
                let pk = (pi - k) as usize;

                if r >= k {
                    a[s2][0] = a[s1][0] / ndu[pk + 1][rk as usize];
                    d = a[s2][0] * ndu[rk as usize][pk];
                }

                let j1 = if rk >= -1 { 1 } else { -rk };
                let j2 = if r - 1 <= pk as isize { k - 1 } else { pi - r };
                for j in j1..=j2 {
                    let (j, col) = (j as usize, (rk + j) as usize);
                    a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][col];
                    d += a[s2][j] * ndu[col][pk];
                }

                if r <= pk as isize {
                    let (k, r) = (k as usize, r as usize);
                    a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                    d += a[s2][k] * ndu[r][pk];
                }

                ders[k as usize][r as usize] = d;
                std::mem::swap(&mut s1, &mut s2);
            }
        }

        // multiply through by p! / (p - k)!
        let mut factor = T::from_count(p);
        for k in 1..=(top as usize) {
            for value in ders[k].iter_mut() {
                *value *= factor;
            }
            factor *= T::from_count(p - k);
        }

        ders
    }
}

impl<T> Index<usize> for KnotVector<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> FromIterator<T> for KnotVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
