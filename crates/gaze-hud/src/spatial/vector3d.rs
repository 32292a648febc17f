//! Directions, offsets and forces

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Lengths below this have no usable direction
const MIN_LENGTH: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// +X
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    /// +Y
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    /// +Z, the direction an unrotated head looks
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const ONE: Self = Self::splat(1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.x), f(self.y), f(self.z))
    }

    fn zip(self, other: Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Unit vector, or zero for a vector with no direction
    pub fn normalize(&self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// Unit vector, or `None` for zero, tiny or non-finite input
    pub fn try_normalize(&self) -> Option<Self> {
        let length = self.magnitude();
        (length.is_finite() && length > MIN_LENGTH).then(|| self.map(|c| c / length))
    }

    pub fn dot(&self, other: &Vector3D) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// `(x, y, z)` with `precision` decimals
    pub fn format(&self, precision: usize) -> String {
        let p = precision;
        format!("({:.p$}, {:.p$}, {:.p$})", self.x, self.y, self.z)
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip(rhs, |a, b| a + b)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul<f32> for Vector3D {
    type Output = Vector3D;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|c| c * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;

    fn neg(self) -> Self::Output {
        self.map(|c| -c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_direction() {
        let n = Vector3D::new(0.0, 3.0, 4.0).normalize();
        assert!((n.magnitude() - 1.0).abs() < 1e-6);
        assert!((n.y - 0.6).abs() < 1e-6);
        assert!((n.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_try_normalize_rejects_zero_and_nan() {
        assert!(Vector3D::ZERO.try_normalize().is_none());
        assert!(Vector3D::new(f32::NAN, 0.0, 1.0).try_normalize().is_none());
        assert!(Vector3D::splat(1e-8).try_normalize().is_none());
        assert_eq!(Vector3D::ZERO.normalize(), Vector3D::ZERO);
    }

    #[test]
    fn test_axes_are_right_handed() {
        assert_eq!(Vector3D::RIGHT.cross(&Vector3D::UP), Vector3D::FORWARD);
        assert_eq!(Vector3D::UP.cross(&Vector3D::FORWARD), Vector3D::RIGHT);
    }

    #[test]
    fn test_operators() {
        let mut v = Vector3D::new(1.0, -2.0, 0.5);
        v += Vector3D::ONE;
        assert_eq!(v, Vector3D::new(2.0, -1.0, 1.5));
        assert_eq!(-v * 2.0, Vector3D::new(-4.0, 2.0, -3.0));
        assert_eq!(v - v, Vector3D::ZERO);
    }

    #[test]
    fn test_format() {
        let v = Vector3D::new(0.5, -1.0, 2.12345);
        assert_eq!(v.format(3), "(0.500, -1.000, 2.123)");
        assert_eq!(v.format(1), "(0.5, -1.0, 2.1)");
    }
}
