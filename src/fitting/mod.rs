mod banded_qr;
pub mod fit_options;
pub mod fit_status;
mod rational;
pub mod smoothing_spline;

pub use fit_options::*;
pub use fit_status::*;
pub use smoothing_spline::*;

#[cfg(test)]
mod tests;
