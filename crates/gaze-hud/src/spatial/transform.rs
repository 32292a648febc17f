//! Placement of cameras and markers in the world

use serde::{Deserialize, Serialize};

use super::{Point3D, Quaternion, Vector3D};

/// Position, rotation and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_position_rotation(Point3D::ORIGIN, Quaternion::IDENTITY)
    }

    /// Unscaled transform
    pub fn from_position_rotation(position: Point3D, rotation: Quaternion) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3D::ONE,
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vector3D::splat(scale);
        self
    }

    pub fn forward(&self) -> Vector3D {
        self.rotation.forward()
    }

    /// Turn the +Z axis toward `target`, keeping world up. A target at the
    /// current position leaves the rotation alone.
    pub fn look_at(&mut self, target: Point3D) {
        let toward = target - self.position;
        if toward.try_normalize().is_some() {
            self.rotation = Quaternion::look_rotation(toward, Vector3D::UP);
        }
    }

    /// Local point to world: scale, then rotate, then translate
    pub fn transform_point(&self, local: Point3D) -> Point3D {
        let scaled = Vector3D::new(
            local.x * self.scale.x,
            local.y * self.scale.y,
            local.z * self.scale.z,
        );
        self.position + self.rotation.rotate_vector(scaled)
    }

    /// Rotate a local direction into world space; scale and position are ignored
    pub fn transform_direction(&self, direction: Vector3D) -> Vector3D {
        self.rotation.rotate_vector(direction)
    }

    /// Express a world point in this transform's local frame
    pub fn inverse_transform_point(&self, world: Point3D) -> Point3D {
        let local = self.rotation.inverse().rotate_vector(world - self.position);
        let unscale = |c: f32, s: f32| if s.abs() > f32::EPSILON { c / s } else { 0.0 };
        Point3D::new(
            unscale(local.x, self.scale.x),
            unscale(local.y, self.scale.y),
            unscale(local.z, self.scale.z),
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
