//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Movement input processing
//!
//! ## Core Components
//! - `CameraProvider`: what the world needs from a camera, a position it may
//!   adjust and a combined projection×view matrix
//! - `FirstPersonCamera`: the default provider, built from a `Camera`, a
//!   `Projection` and a `CameraController`

use camera::{Camera, CameraController, MovementInput, Projection};
use cgmath::{Deg, Matrix4, Point3};
use web_time::Duration;

pub mod camera;

/// Source of the observer position and the view frustum.
pub trait CameraProvider {
    /// World-space position of the eye.
    fn position(&self) -> Point3<f32>;

    /// Moves the eye, e.g. after ground snapping.
    fn set_position(&mut self, position: Point3<f32>);

    /// The combined projection×view matrix.
    fn view_projection(&self) -> Matrix4<f32>;
}

/// A first-person camera with perspective projection.
#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    /// The current camera position and orientation
    pub camera: Camera,
    pub projection: Projection,
    /// Handles movement input
    pub controller: CameraController,
}

impl FirstPersonCamera {
    /// Creates a camera at `position` looking along `yaw` with a 70° vertical
    /// field of view.
    pub fn new(position: Point3<f32>, yaw: Deg<f32>, width: u32, height: u32) -> Self {
        FirstPersonCamera {
            camera: Camera::new(position, yaw, Deg(0.0)),
            projection: Projection::new(width, height, Deg(70.0), 0.1, 1000.0),
            controller: CameraController::new(8.0, 1.0),
        }
    }

    /// Queues movement for the next [`FirstPersonCamera::advance`].
    pub fn intake(&mut self, input: MovementInput) {
        self.controller.intake(input);
    }

    /// Applies the queued movement.
    ///
    /// # Returns
    /// Whether the camera moved or turned.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.controller.has_updates() {
            return false;
        }
        self.camera.apply_controller(&mut self.controller, dt);
        true
    }
}

impl CameraProvider for FirstPersonCamera {
    fn position(&self) -> Point3<f32> {
        self.camera.position
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.camera.position = position;
    }

    fn view_projection(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn points_ahead_land_inside_clip_space() {
        let camera = FirstPersonCamera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), 800, 600);
        let ahead = camera.view_projection() * Vector4::new(10.0, 0.0, 0.0, 1.0);
        let behind = camera.view_projection() * Vector4::new(-10.0, 0.0, 0.0, 1.0);
        assert!(ahead.w > 0.0 && ahead.z.abs() < ahead.w);
        assert!(behind.w < 0.0);
    }

    #[test]
    fn advance_only_reports_real_moves() {
        let mut camera = FirstPersonCamera::new(Point3::new(1.0, 2.0, 3.0), Deg(90.0), 4, 3);
        assert!(!camera.advance(Duration::from_millis(16)));

        camera.intake(MovementInput {
            forward: 1.0,
            ..MovementInput::default()
        });
        assert!(camera.advance(Duration::from_secs(1)));
        // yaw 90° moves along +z
        assert!((camera.position().z - 11.0).abs() < 1e-4);

        camera.set_position(Point3::new(0.0, 0.0, 0.0));
        assert_eq!(camera.position(), Point3::new(0.0, 0.0, 0.0));
    }
}
