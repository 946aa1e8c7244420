use itertools::Itertools;

use crate::misc::FloatingPoint;

/// Cumulative integral of the samples `ys` over `xs` by the trapezoidal rule
/// The result has the same length as the input and starts at zero
///
/// # Example
/// ```
/// use foilsample::prelude::cumulative_trapezoid;
/// let integral = cumulative_trapezoid(&[1., 3., 5.], &[0., 1., 2.]).unwrap();
/// assert_eq!(integral, vec![0., 2., 6.]);
/// ```
pub fn cumulative_trapezoid<T: FloatingPoint>(ys: &[T], xs: &[T]) -> anyhow::Result<Vec<T>> {
    anyhow::ensure!(
        ys.len() == xs.len(),
        "Samples and abscissae differ in length, got {} and {}",
        ys.len(),
        xs.len()
    );
    anyhow::ensure!(
        ys.len() >= 2,
        "At least two samples are required, got {}",
        ys.len()
    );

    let half = T::lit(0.5);
    let mut integral = Vec::with_capacity(ys.len());
    integral.push(T::zero());
    for ((x0, y0), (x1, y1)) in xs.iter().zip(ys.iter()).tuple_windows() {
        let last = integral[integral.len() - 1];
        integral.push(last + (*x1 - *x0) * (*y0 + *y1) * half);
    }
    Ok(integral)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::cumulative_trapezoid;

    #[test]
    fn exact_for_linear_functions() {
        let xs: Vec<f64> = vec![0., 0.1, 0.5, 0.7, 2.];
        let ys: Vec<f64> = xs.iter().map(|x| 3. * x + 1.).collect();
        let integral = cumulative_trapezoid(&ys, &xs).unwrap();
        for (x, v) in xs.iter().zip(integral.iter()) {
            assert_relative_eq!(*v, 1.5 * x * x + x, epsilon = 1e-12);
        }
    }

    #[test]
    fn monotone_for_positive_samples() {
        let xs: Vec<f64> = (0..100).map(|i| i as f64 * 0.01).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 20. + (x * 10.).sin().abs()).collect();
        let integral = cumulative_trapezoid(&ys, &xs).unwrap();
        assert!(integral.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert!(cumulative_trapezoid(&[1., 2.], &[0.]).is_err());
        assert!(cumulative_trapezoid::<f64>(&[1.], &[0.]).is_err());
    }
}
