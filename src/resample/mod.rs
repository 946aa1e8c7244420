pub mod curvature_resampler;
pub mod resample_options;
pub use curvature_resampler::*;
pub use resample_options::*;

#[cfg(test)]
mod tests;
