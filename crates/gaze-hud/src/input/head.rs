//! Head pose tracking

use crate::spatial::{Point3D, Quaternion, Ray, Transform};

/// Default eye height of a standing user, in meters
pub const STANDING_EYE_HEIGHT: f32 = 1.6;

/// World pose of the headset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub position: Point3D,
    pub rotation: Quaternion,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self {
            position: Point3D::new(0.0, STANDING_EYE_HEIGHT, 0.0),
            rotation: Quaternion::IDENTITY,
        }
    }
}

impl HeadPose {
    pub fn new(position: Point3D, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Head at `position` turned by yaw (about +Y) and pitch (about +X)
    pub fn from_yaw_pitch(position: Point3D, yaw: f32, pitch: f32) -> Self {
        Self::new(position, Quaternion::from_yaw_pitch(yaw, pitch))
    }

    /// Head pose as a rigid transform
    pub fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }

    /// Ray along the head's forward axis
    pub fn forward_ray(&self) -> Ray {
        Ray::new(self.position, self.rotation.forward()).unwrap_or_else(|| {
            let mut ray = Ray::forward();
            ray.origin = self.position;
            ray
        })
    }

    /// Point in space the head faces at a given distance
    pub fn gaze_point(&self, distance: f32) -> Point3D {
        self.position + self.rotation.forward() * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_pose_default() {
        let pose = HeadPose::default();
        assert_eq!(pose.position.y, STANDING_EYE_HEIGHT);
        assert_eq!(pose.rotation, Quaternion::IDENTITY);
    }

    #[test]
    fn test_gaze_point() {
        let pose = HeadPose::default();
        let point = pose.gaze_point(5.0);
        // Default pose looks forward (+Z)
        assert!((point.z - 5.0).abs() < 1e-5);
        assert!((point.y - STANDING_EYE_HEIGHT).abs() < 1e-5);
    }

    #[test]
    fn test_forward_ray_follows_yaw() {
        let pose = HeadPose::from_yaw_pitch(Point3D::ORIGIN, std::f32::consts::FRAC_PI_2, 0.0);
        let ray = pose.forward_ray();
        assert!((ray.direction().x - 1.0).abs() < 1e-5);
        assert_eq!(ray.origin, Point3D::ORIGIN);
    }
}
