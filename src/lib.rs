#![allow(clippy::needless_range_loop)]

mod batch;
mod curve;
mod fitting;
mod integration;
mod interpolation;
mod io;
mod knot;
mod misc;
mod resample;

pub mod prelude {
    pub use crate::batch::*;
    pub use crate::curve::*;
    pub use crate::fitting::*;
    pub use crate::integration::*;
    pub use crate::interpolation::*;
    pub use crate::io::*;
    pub use crate::knot::*;
    pub use crate::misc::*;
    pub use crate::resample::*;
}
