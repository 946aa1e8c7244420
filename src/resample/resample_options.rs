use crate::fitting::FitOptions;
use crate::misc::FloatingPoint;

/// Parameters of the curvature-weighted resampling
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResampleOptions<T: FloatingPoint> {
    /// Number of points `N` of the resampled curve
    pub count: usize,
    /// Degree `k` of the fitted B-spline
    pub degree: usize,
    /// Constant `D > 0` added to the curvature, sets the minimum sampling density on flat parts
    /// and keeps the cumulative profile strictly increasing
    pub curvature_offset: T,
    /// Number of parameters used to build the curvature profile
    pub resolution: usize,
    /// Options of the underlying smoothing spline fit
    pub fit: FitOptions<T>,
}

impl<T: FloatingPoint> Default for ResampleOptions<T> {
    fn default() -> Self {
        Self {
            count: 64,
            degree: 3,
            curvature_offset: T::lit(20.),
            resolution: 1000,
            fit: FitOptions::default(),
        }
    }
}

impl<T: FloatingPoint> ResampleOptions<T> {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_curvature_offset(mut self, curvature_offset: T) -> Self {
        self.curvature_offset = curvature_offset;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fit(mut self, fit: FitOptions<T>) -> Self {
        self.fit = fit;
        self
    }
}
