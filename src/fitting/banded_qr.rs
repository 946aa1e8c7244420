use nalgebra::Vector2;

use crate::misc::FloatingPoint;

/// Least-squares solver for systems whose rows have at most `width` consecutive non-zeros
///
/// Rows are folded one at a time into an upper triangular band matrix by Givens rotations,
/// so the observation matrix itself is never stored.
#[derive(Clone, Debug)]
pub(crate) struct BandedQr<T: FloatingPoint> {
    width: usize,
    /// row `i` holds the entries of columns `i..i + width` of the triangular factor
    band: Vec<Vec<T>>,
    /// rotated right-hand side, one column per coordinate
    rhs: Vec<Vector2<T>>,
}

impl<T: FloatingPoint> BandedQr<T> {
    pub fn new(unknowns: usize, width: usize) -> Self {
        Self {
            width,
            band: vec![vec![T::zero(); width]; unknowns],
            rhs: vec![Vector2::zeros(); unknowns],
        }
    }

    pub fn unknowns(&self) -> usize {
        self.band.len()
    }

    /// Add the equation `sum_j coefficients[j] * c[start + j] = target`
    pub fn add_row(&mut self, start: usize, coefficients: &[T], target: Vector2<T>) {
        debug_assert!(coefficients.len() <= self.width);
        let mut row = vec![T::zero(); self.width];
        row[..coefficients.len()].copy_from_slice(coefficients);
        let mut target = target;

        for i in 0..self.width {
            let column = start + i;
            if column >= self.unknowns() {
                break;
            }
            let pivot = row[i];
            if pivot == T::zero() {
                continue;
            }

            let diagonal = self.band[column][0];
            let (cos, sin, norm) = givens(pivot, diagonal);
            self.band[column][0] = norm;
            for j in (i + 1)..self.width {
                let stored = self.band[column][j - i];
                self.band[column][j - i] = cos * stored + sin * row[j];
                row[j] = cos * row[j] - sin * stored;
            }

            let stored = self.rhs[column];
            self.rhs[column] = stored * cos + target * sin;
            target = target * cos - stored * sin;
        }
    }

    /// Sum of the absolute diagonal entries of the triangular factor
    pub fn diagonal_sum(&self) -> T {
        self.band
            .iter()
            .fold(T::zero(), |acc, row| acc + row[0].abs())
    }

    /// Solve the triangular system by back substitution
    pub fn solve(&self) -> anyhow::Result<Vec<Vector2<T>>> {
        let n = self.unknowns();
        let largest = self
            .band
            .iter()
            .fold(T::zero(), |acc, row| acc.max(row[0].abs()));
        let threshold = largest * T::lit(1e-14);

        let mut solution = vec![Vector2::zeros(); n];
        for i in (0..n).rev() {
            let diagonal = self.band[i][0];
            anyhow::ensure!(
                diagonal.abs() > threshold && diagonal.is_finite(),
                "Singular least-squares system (coefficient {} of {} is undetermined)",
                i,
                n
            );
            let mut value = self.rhs[i];
            for j in 1..self.width.min(n - i) {
                value -= solution[i + j] * self.band[i][j];
            }
            solution[i] = value / diagonal;
        }
        Ok(solution)
    }
}

/// Rotation `(cos, sin, norm)` eliminating `pivot` against `diagonal`
fn givens<T: FloatingPoint>(pivot: T, diagonal: T) -> (T, T, T) {
    let (a, b) = (pivot.abs(), diagonal.abs());
    let norm = if b >= a {
        b * (T::one() + (a / b).powi(2)).sqrt()
    } else {
        a * (T::one() + (b / a).powi(2)).sqrt()
    };
    (diagonal / norm, pivot / norm, norm)
}
