pub mod bspline_curve;
pub mod knot_style;
pub use bspline_curve::*;
pub use knot_style::*;
