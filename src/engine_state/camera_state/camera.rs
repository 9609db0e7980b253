//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation and transformations
//! - Projection matrix handling
//! - Camera controller for movement input
//!
//! ## Key Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages perspective projection settings
//! - `CameraController`: Accumulates movement input and applies it to a camera
//!
//! Matrices follow the OpenGL clip-space convention (`z` in `[-w, w]`), which
//! is what the frustum plane extraction expects.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use web_time::Duration;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Represents a first-person camera in 3D space.
///
/// # Fields
/// - `position`: The camera's position in world space
/// - `yaw`: Horizontal rotation (around Y axis) in radians, 0 looks along +X
/// - `pitch`: Vertical rotation in radians, positive looks up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Arguments
    /// * `position` - Initial position of the camera in world space. Can be any type that converts to `Point3<f32>`.
    /// * `yaw` - Initial yaw (horizontal rotation around Y axis). Can be any type that converts to `Rad<f32>`.
    /// * `pitch` - Initial pitch. Can be any type that converts to `Rad<f32>`.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_world::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(
    ///     Point3::new(0.0, 70.0, 0.0),
    ///     Deg(-90.0),                  // Facing along negative Z
    ///     Deg(0.0),                    // Level horizon
    /// );
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let pitch: Rad<f32> = pitch.into();
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: Rad(pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2)),
        }
    }

    /// Gets the camera's forward direction vector.
    ///
    /// # Returns
    /// A normalized 3D vector representing the camera's forward direction
    pub fn view_vec(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.view_vec(), Vector3::unit_y())
    }

    /// Applies the input accumulated in `controller` and resets it.
    ///
    /// # Arguments
    /// * `controller` - The camera controller containing input state
    /// * `dt` - Time elapsed since the last update
    pub fn apply_controller(&mut self, controller: &mut CameraController, dt: Duration) {
        let dt = dt.as_secs_f32();

        // Move forward/backward and left/right on the horizontal plane
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin);
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos);
        self.position += forward * controller.input.forward * controller.speed * dt;
        self.position += right * controller.input.right * controller.speed * dt;
        self.position.y += controller.input.up * controller.speed * dt;

        // Rotate
        self.yaw += Rad(controller.input.yaw) * controller.sensitivity * dt;
        self.pitch += Rad(controller.input.pitch) * controller.sensitivity * dt;
        self.pitch = Rad(self.pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));

        controller.input = MovementInput::default();
    }
}

/// Represents a camera's projection matrix and related parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Calculates the perspective projection matrix.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Movement requested since the last camera update.
///
/// Translation axes are in `-1.0..=1.0`; rotation is in radians per second
/// before sensitivity scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// Handles camera movement and rotation based on user input.
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    input: MovementInput,
    // Configuration
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given speed and sensitivity.
    ///
    /// # Arguments
    /// * `speed` - Base movement speed in units per second
    /// * `sensitivity` - Look sensitivity multiplier
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            input: MovementInput::default(),
            speed,
            sensitivity,
        }
    }

    /// Replaces the pending input.
    pub fn intake(&mut self, input: MovementInput) {
        self.input = input;
    }

    /// Checks if there are any pending updates that would affect the camera.
    pub fn has_updates(&self) -> bool {
        self.input != MovementInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_moves_along_the_view_direction() {
        let mut camera = Camera::new(Point3::new(0.0, 10.0, 0.0), Deg(0.0), Deg(0.0));
        let mut controller = CameraController::new(4.0, 1.0);
        controller.intake(MovementInput {
            forward: 1.0,
            up: -1.0,
            ..MovementInput::default()
        });
        assert!(controller.has_updates());

        camera.apply_controller(&mut controller, Duration::from_millis(500));
        assert!((camera.position.x - 2.0).abs() < 1e-5);
        assert!((camera.position.y - 8.0).abs() < 1e-5);
        assert!(camera.position.z.abs() < 1e-5);
        assert!(!controller.has_updates());
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(89.0));
        let mut controller = CameraController::new(1.0, 1.0);
        controller.intake(MovementInput {
            pitch: 10.0,
            ..MovementInput::default()
        });
        camera.apply_controller(&mut controller, Duration::from_secs(1));
        assert!((camera.pitch.0 - SAFE_FRAC_PI_2).abs() < 1e-6);
        assert!(camera.view_vec().x > 0.0);

        let view = camera.calc_matrix();
        let columns: [[f32; 4]; 4] = view.into();
        assert!(columns.iter().flatten().all(|v| v.is_finite()));
    }
}
