//! Static directional light used to shade block faces at mesh time.

use cgmath::{InnerSpace, Vector3, Zero};

/// A single directional light shared by every chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    direction: Vector3<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vector3::new(0.5, 1.0, 0.3))
    }
}

impl Light {
    /// Creates a light shining along `direction`. The vector need not be normalized.
    pub fn new(direction: Vector3<f32>) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vector3<f32>) {
        self.direction = direction;
    }

    /// Diffuse intensity for a face with unit `normal`, in `0.0..=1.0`.
    ///
    /// Faces turned away from the light receive 0, never a negative value.
    /// A zero-length direction lights nothing.
    pub fn intensity(&self, normal: Vector3<f32>) -> f32 {
        if self.direction.is_zero() || !self.direction.magnitude2().is_finite() {
            return 0.0;
        }
        normal.dot(self.direction.normalize()).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_is_clamped_at_zero() {
        let light = Light::new(Vector3::new(0.0, 2.0, 0.0));
        assert!((light.intensity(Vector3::unit_y()) - 1.0).abs() < 1e-6);
        assert_eq!(light.intensity(-Vector3::unit_y()), 0.0);
        assert_eq!(light.intensity(Vector3::unit_x()), 0.0);
    }

    #[test]
    fn zero_direction_lights_nothing() {
        let light = Light::new(Vector3::zero());
        assert_eq!(light.intensity(Vector3::unit_y()), 0.0);
    }

    #[test]
    fn default_direction_lights_the_top_most() {
        let light = Light::default();
        let top = light.intensity(Vector3::unit_y());
        let side = light.intensity(Vector3::unit_x());
        assert!(top > side && side > 0.0);
    }
}
