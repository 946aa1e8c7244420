use nalgebra::RealField;
use num_traits::ToPrimitive;
use simba::scalar::SupersetOf;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    /// Convert a literal constant into the field
    fn lit(value: f64) -> Self {
        <Self as SupersetOf<f64>>::from_subset(&value)
    }

    /// Convert a count (number of samples, index, ...) into the field
    fn from_count(count: usize) -> Self {
        Self::lit(count as f64)
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
