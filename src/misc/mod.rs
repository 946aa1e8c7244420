pub mod curvature;
pub mod floating_point;
pub mod linspace;

pub use curvature::*;
pub use floating_point::*;
pub use linspace::*;
