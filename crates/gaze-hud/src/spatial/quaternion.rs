//! Rotations of the head, eyes and markers

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// Rotation quaternion, `(x, y, z, w)` as reported by XR runtimes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about `axis`
    pub fn from_axis_angle(axis: Vector3D, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        let axis = axis.normalize() * sin;
        Self::new(axis.x, axis.y, axis.z, cos)
    }

    /// Create a quaternion from yaw (around Y) then pitch (around X), in radians.
    /// Positive pitch tilts the forward axis downwards.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        Self::from_axis_angle(Vector3D::UP, yaw) * Self::from_axis_angle(Vector3D::RIGHT, pitch)
    }

    /// Rotation whose forward (+Z) axis points along `forward` with `up` as the
    /// preferred up direction. Degenerate input yields the identity.
    pub fn look_rotation(forward: Vector3D, up: Vector3D) -> Self {
        let Some(f) = forward.try_normalize() else {
            return Self::IDENTITY;
        };
        let r = match up.cross(&f).try_normalize() {
            Some(r) => r,
            // `up` is parallel to `forward`; any perpendicular will do
            None => match Vector3D::FORWARD.cross(&f).try_normalize() {
                Some(r) => r,
                None => Vector3D::RIGHT,
            },
        };
        let u = f.cross(&r);

        // Columns of the rotation matrix are r, u, f
        let (m00, m01, m02) = (r.x, u.x, f.x);
        let (m10, m11, m12) = (r.y, u.y, f.y);
        let (m20, m21, m22) = (r.z, u.z, f.z);

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalize()
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit quaternion; degenerate input collapses to the identity
    pub fn normalize(&self) -> Self {
        let m = self.magnitude();
        if m > 0.0 && m.is_finite() {
            Self::new(self.x / m, self.y / m, self.z / m, self.w / m)
        } else {
            Self::IDENTITY
        }
    }

    /// Opposite rotation. Zero-length input yields the identity.
    pub fn inverse(&self) -> Self {
        let norm_sq = self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w;
        if norm_sq > 0.0 && norm_sq.is_finite() {
            Self::new(-self.x / norm_sq, -self.y / norm_sq, -self.z / norm_sq, self.w / norm_sq)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate `v`; the quaternion must be unit length
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Where +Z ends up after the rotation
    pub fn forward(&self) -> Vector3D {
        self.rotate_vector(Vector3D::FORWARD)
    }

    /// Format as `(x, y, z, w)` with a fixed number of decimals
    pub fn format(&self, precision: usize) -> String {
        format!(
            "({:.p$}, {:.p$}, {:.p$}, {:.p$})",
            self.x,
            self.y,
            self.z,
            self.w,
            p = precision
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn assert_vec_eq(a: Vector3D, b: Vector3D) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity() {
        let rotated = Quaternion::IDENTITY.rotate_vector(Vector3D::FORWARD);
        assert_vec_eq(rotated, Vector3D::FORWARD);
    }

    #[test]
    fn test_90_degree_yaw() {
        // Rotating FORWARD by 90 degrees around UP gives RIGHT
        let q = Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0);
        assert_vec_eq(q.rotate_vector(Vector3D::FORWARD), Vector3D::RIGHT);
    }

    #[test]
    fn test_yaw_pitch_keeps_horizon_level() {
        let q = Quaternion::from_yaw_pitch(PI / 2.0, 0.3);
        let forward = q.forward();
        // Pitch tilts forward downward, yaw swings it toward +X
        assert!(forward.y < 0.0);
        assert!(forward.x > 0.0);
        assert!(forward.z.abs() < 1e-4);
        assert!((forward.magnitude() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, PI / 4.0);
        let result = q * q.inverse();
        assert!((result.w - 1.0).abs() < 0.0001);
        assert!(result.x.abs() < 0.0001);
        assert!(result.y.abs() < 0.0001);
        assert!(result.z.abs() < 0.0001);
    }

    #[test]
    fn test_look_rotation_matches_axis_angle() {
        let look = Quaternion::look_rotation(Vector3D::RIGHT, Vector3D::UP);
        let expected = Quaternion::from_axis_angle(Vector3D::UP, PI / 2.0);
        assert!((look.x - expected.x).abs() < 1e-4);
        assert!((look.y - expected.y).abs() < 1e-4);
        assert!((look.z - expected.z).abs() < 1e-4);
        assert!((look.w - expected.w).abs() < 1e-4);
    }

    #[test]
    fn test_look_rotation_points_forward_axis() {
        let directions = [
            Vector3D::new(0.3, -0.2, 1.0),
            Vector3D::new(-1.0, 0.5, -0.4),
            Vector3D::new(0.0, 0.0, -1.0),
            Vector3D::UP,
            -Vector3D::UP,
        ];
        for dir in directions {
            let q = Quaternion::look_rotation(dir, Vector3D::UP);
            assert_vec_eq(q.forward(), dir.normalize());
            assert!((q.magnitude() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_look_rotation_degenerate() {
        assert_eq!(
            Quaternion::look_rotation(Vector3D::ZERO, Vector3D::UP),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(Quaternion::IDENTITY.format(3), "(0.000, 0.000, 0.000, 1.000)");
    }
}
