pub mod trapezoid;
pub use trapezoid::*;
