//! Transform component and helpers for parented scene objects.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Position, XYZ Euler angles (radians) and a uniform scale factor.
    pub fn from_euler_scale(position: Vec3, euler: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            scale: Vec3::splat(scale),
        }
    }

    /// Uniform scale about the origin, no rotation.
    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World matrix of `self` when parented under `parent`.
    pub fn under(&self, parent: Mat4) -> Mat4 {
        parent * self.to_matrix()
    }
}
