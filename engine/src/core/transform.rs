//! Local and world transforms of scene nodes

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::math::{self, FORWARD, RIGHT, UP};

/// Position, rotation, and scale relative to the parent node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
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
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Rotate so that forward points at `target`; unchanged when the target
    /// coincides with the position
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        if let Some(rotation) = math::rotation_towards(target - self.position, up) {
            self.rotation = rotation;
        }
        self
    }

    /// Unit rotation used for composition
    ///
    /// `rotation` keeps whatever was written to it, so an attribute edit reads
    /// back unchanged. A zero quaternion counts as identity.
    pub fn orientation(&self) -> Quat {
        if self.rotation.length_squared() > f32::EPSILON {
            self.rotation.normalize()
        } else {
            Quat::IDENTITY
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.position)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * FORWARD
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * RIGHT
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * UP
    }
}

/// World-space transformation of a node, composed from its ancestors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalTransform {
    pub matrix: Mat4,
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

impl GlobalTransform {
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn position(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn rotation(&self) -> Quat {
        let (_, rotation, _) = self.matrix.to_scale_rotation_translation();
        rotation
    }

    pub fn scale(&self) -> Vec3 {
        let (scale, _, _) = self.matrix.to_scale_rotation_translation();
        scale
    }

    /// Compose a child's local transform onto this one
    pub fn mul_transform(&self, local: &Transform) -> Self {
        Self::from_matrix(self.matrix * local.to_matrix())
    }
}
