use nalgebra::Vector2;

use crate::misc::FloatingPoint;

/// Curvature of a planar curve at one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curvature<T: FloatingPoint> {
    /// Unit tangent vector
    tangent: Vector2<T>,
    /// Signed curvature, positive when the curve turns counter-clockwise
    signed: T,
}

impl<T: FloatingPoint> Curvature<T> {
    pub fn new(tangent: Vector2<T>, signed: T) -> Self {
        Self { tangent, signed }
    }

    /// Compute curvature from first and second derivatives
    /// Returns an error holding a zero curvature if the first derivative vanishes
    ///
    /// # Example
    /// ```
    /// use foilsample::prelude::*;
    /// use nalgebra::Vector2;
    /// use approx::assert_relative_eq;
    ///
    /// // circle of radius 2 at angle 0: c'(t) = (0, 2), c''(t) = (-2, 0)
    /// let curvature = Curvature::derivatives(&Vector2::new(0., 2.), &Vector2::new(-2., 0.)).unwrap();
    /// assert_relative_eq!(curvature.kappa(), 0.5);
    /// assert_relative_eq!(curvature.signed_kappa(), 0.5);
    /// ```
    pub fn derivatives(deriv1: &Vector2<T>, deriv2: &Vector2<T>) -> Result<Self, Self> {
        // k = (x' y'' - y' x'') / (x'^2 + y'^2)^(3/2)
        let speed_squared = deriv1.norm_squared();
        if speed_squared <= T::default_epsilon() {
            return Err(Self::new(Vector2::zeros(), T::zero()));
        }
        let speed = speed_squared.sqrt();
        let cross = deriv1.x * deriv2.y - deriv1.y * deriv2.x;
        Ok(Self::new(deriv1 / speed, cross / (speed_squared * speed)))
    }

    /// Returns the unit tangent vector
    pub fn tangent_vector(&self) -> Vector2<T> {
        self.tangent
    }

    /// Returns the signed curvature
    pub fn signed_kappa(&self) -> T {
        self.signed
    }

    /// Returns the curvature magnitude
    pub fn kappa(&self) -> T {
        self.signed.abs()
    }
}
