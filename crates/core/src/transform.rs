//! Model transforms.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Scale, rotation and translation applied as `T * R * S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_scale_translation(scale: Vec3, translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    /// Build from per-axis Euler angles in degrees, composed as `Rx * Ry * Rz`.
    pub fn from_euler_degrees(scale: Vec3, rotation_degrees: Vec3, translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(
                EulerRot::XYZ,
                rotation_degrees.x.to_radians(),
                rotation_degrees.y.to_radians(),
                rotation_degrees.z.to_radians(),
            ),
            scale,
        }
    }

    /// Set the rotation to `degrees` about `axis`.
    pub fn with_rotation_degrees(mut self, axis: Vec3, degrees: f32) -> Self {
        self.rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        self
    }

    /// Uniformly scaled transform at `translation`.
    pub fn uniform(scale: f32, translation: Vec3) -> Self {
        Self::from_scale_translation(Vec3::splat(scale), translation)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Inverse transpose of the upper 3x3, for transforming normals.
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }
}
