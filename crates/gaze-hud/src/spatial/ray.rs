//! Rays with a unit-length direction

use serde::{Deserialize, Serialize};

use super::{Point3D, Vector3D};

/// A half-line in 3D space. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3D,
    direction: Vector3D,
}

impl Ray {
    /// Build a ray, normalizing the direction. `None` if the direction has no length.
    pub fn new(origin: Point3D, direction: Vector3D) -> Option<Self> {
        if !origin.to_vector().is_finite() {
            return None;
        }
        direction.try_normalize().map(|direction| Self { origin, direction })
    }

    /// Ray from the origin along +Z
    pub fn forward() -> Self {
        Self {
            origin: Point3D::ORIGIN,
            direction: Vector3D::FORWARD,
        }
    }

    pub fn direction(&self) -> Vector3D {
        self.direction
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Point3D {
        self.origin + self.direction * t
    }

    /// Signed distance along the ray of the projection of `point`
    pub fn distance_along(&self, point: Point3D) -> f32 {
        (point - self.origin).dot(&self.direction)
    }
}
