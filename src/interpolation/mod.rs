pub mod linear_interpolant;
pub use linear_interpolant::*;

/// Evaluation of a one-dimensional interpolant
pub trait Interpolant<T> {
    /// Evaluate the interpolant at `x`
    fn evaluate(&self, x: T) -> anyhow::Result<T>;

    /// Evaluate the interpolant at each of `xs`, failing on the first invalid abscissa
    fn evaluate_all(&self, xs: &[T]) -> anyhow::Result<Vec<T>>
    where
        T: Copy,
    {
        xs.iter().map(|x| self.evaluate(*x)).collect()
    }
}
