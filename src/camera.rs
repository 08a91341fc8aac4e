//! Camera and light animation
//!
//! A single rotation angle advances each frame. Camera position, light
//! position, and the per-cell ray basis are all derived from it in closed
//! form, so the whole view turns as one rigid rotation about the y axis.

use nalgebra::{Point3, Vector3};

use crate::{DEFAULT_ANGLE_STEP, DEFAULT_CAMERA_DISTANCE};

/// Rotate the pair `(x, z)` by `angle` radians in the x-z plane.
fn rotate_xz(x: f32, z: f32, angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (x * cos - z * sin, x * sin + z * cos)
}

/// Per-frame animation state.
///
/// The orbit flags are configuration set at startup (or toggled by the
/// user), not derived state: camera orbit and light orbit are independent.
#[derive(Debug, Clone, Copy)]
pub struct Animator {
    pub angle: f32,
    pub angle_step: f32,
    pub orbit_camera: bool,
    pub orbit_light: bool,
    pub camera_distance: f32,
    pub camera_height: f32,
    pub light_home: Point3<f32>,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            angle: 0.0,
            angle_step: DEFAULT_ANGLE_STEP,
            orbit_camera: true,
            orbit_light: false,
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            camera_height: 0.0,
            light_home: Point3::new(-5.0, 5.0, 5.0),
        }
    }
}

impl Animator {
    /// Advance the rotation by one frame.
    pub fn advance(&mut self) {
        self.angle += self.angle_step;
    }

    /// Rewind the rotation to its initial phase.
    pub fn reset(&mut self) {
        self.angle = 0.0;
    }

    /// Move the camera towards or away from the origin.
    pub fn adjust_distance(&mut self, delta: f32) {
        self.camera_distance = (self.camera_distance + delta).clamp(1.5, 10.0);
    }

    /// Current camera position.
    ///
    /// With camera orbit on, the home position `(0, h, distance)` is
    /// rotated about the y axis by the current angle; otherwise it is
    /// returned as-is.
    pub fn camera_position(&self) -> Point3<f32> {
        if self.orbit_camera {
            let (x, z) = rotate_xz(0.0, self.camera_distance, self.angle);
            Point3::new(x, self.camera_height, z)
        } else {
            Point3::new(0.0, self.camera_height, self.camera_distance)
        }
    }

    /// Current light position, orbiting its home position when enabled.
    pub fn light_position(&self) -> Point3<f32> {
        if self.orbit_light {
            let (x, z) = rotate_xz(self.light_home.x, self.light_home.z, self.angle);
            Point3::new(x, self.light_home.y, z)
        } else {
            self.light_home
        }
    }

    /// Ray direction for screen coordinates `(u, v)`, before normalization.
    ///
    /// A fixed camera looks down -z, giving `(u, v, -1)`. With camera
    /// orbit on, the forward axis and the horizontal basis are rotated by
    /// the same angle as the camera position, so the origin stays centered
    /// in view throughout the orbit.
    pub fn ray_direction(&self, u: f32, v: f32) -> Vector3<f32> {
        if self.orbit_camera {
            let (x, z) = rotate_xz(u, -1.0, self.angle);
            Vector3::new(x, v, z)
        } else {
            Vector3::new(u, v, -1.0)
        }
    }
}
