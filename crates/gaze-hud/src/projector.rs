//! Gaze projection from head-local space into the world

use std::fmt;

use serde::Serialize;

use crate::input::HeadPose;
use crate::scene::ProbeResult;
use crate::sdk::{GazeRay, GazeSample};
use crate::spatial::{Point3D, Ray};

/// Which distance placed the fixation point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixationSource {
    /// Distance to the surface the probe hit
    ProbeHit,
    /// Focus distance reported by the headset
    FocusDistance,
    /// Probe fallback distance, used when neither of the above is known
    Fallback,
}

impl fmt::Display for FixationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FixationSource::ProbeHit => "probe hit",
            FixationSource::FocusDistance => "focus distance",
            FixationSource::Fallback => "fallback",
        })
    }
}

/// World point the eyes are judged to converge on
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fixation {
    pub point: Point3D,
    pub distance: f32,
    pub source: FixationSource,
}

/// Transform a head-local gaze ray into a world ray.
///
/// The origin is offset by the head rotation and position; the direction is
/// rotated and normalized. Returns `None` when the result has no usable
/// direction.
pub fn project(gaze: &GazeRay, head: &HeadPose) -> Option<Ray> {
    let head = head.transform();
    Ray::new(
        head.transform_point(gaze.origin),
        head.transform_direction(gaze.forward),
    )
}

/// Project a sample's combined gaze, only when the sample is valid
pub fn project_sample(sample: &GazeSample, head: &HeadPose) -> Option<Ray> {
    if !sample.is_valid() {
        return None;
    }
    project(&sample.gaze, head)
}

/// Point the eyes converge on, `distance` meters along the ray
pub fn fixation_point(ray: &Ray, distance: f32) -> Point3D {
    ray.point_at(distance.max(0.0))
}

/// Resolve the fixation point for a tick.
///
/// A probe hit wins. On a miss the headset focus distance is used when it
/// is positive, else the probe's fallback distance.
pub fn resolve_fixation(ray: &Ray, probe: &ProbeResult, focus_distance: f32) -> Fixation {
    let (distance, source) = if probe.is_hit() {
        (probe.distance(), FixationSource::ProbeHit)
    } else if focus_distance > 0.0 {
        (focus_distance, FixationSource::FocusDistance)
    } else {
        (probe.distance(), FixationSource::Fallback)
    };
    Fixation {
        point: fixation_point(ray, distance),
        distance,
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::scene::{ObjectId, ProbeHit};
    use crate::sdk::GazeStatus;
    use crate::spatial::{Quaternion, Vector3D};

    fn approx(a: Vector3D, b: Vector3D) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_identity_head_keeps_ray() {
        let gaze = GazeRay::new(Point3D::new(0.0, 0.1, 0.0), Vector3D::FORWARD);
        let head = HeadPose::new(Point3D::ORIGIN, Quaternion::IDENTITY);
        let ray = project(&gaze, &head).unwrap();

        assert_eq!(ray.origin, Point3D::new(0.0, 0.1, 0.0));
        assert!(approx(ray.direction(), Vector3D::FORWARD));
    }

    #[test]
    fn test_direction_is_rotated_and_unit_length() {
        let gaze = GazeRay::new(Point3D::ORIGIN, Vector3D::new(0.0, 0.0, 3.0));
        let rotation = Quaternion::from_yaw_pitch(FRAC_PI_2, 0.0);
        let head = HeadPose::new(Point3D::new(1.0, 2.0, 3.0), rotation);
        let ray = project(&gaze, &head).unwrap();

        let expected = rotation.rotate_vector(gaze.forward).normalize();
        assert!(approx(ray.direction(), expected));
        assert!((ray.direction().magnitude() - 1.0).abs() < 1e-5);
        assert!(approx(ray.direction(), Vector3D::RIGHT));
    }

    #[test]
    fn test_origin_offset_follows_head() {
        // An eye offset to the right ends up behind a head turned right
        let gaze = GazeRay::new(Point3D::new(0.5, 0.0, 0.0), Vector3D::FORWARD);
        let head = HeadPose::from_yaw_pitch(Point3D::new(0.0, 1.0, 0.0), FRAC_PI_2, 0.0);
        let ray = project(&gaze, &head).unwrap();

        assert!((ray.origin.x).abs() < 1e-5);
        assert!((ray.origin.y - 1.0).abs() < 1e-5);
        assert!((ray.origin.z + 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_direction_yields_none() {
        let gaze = GazeRay::new(Point3D::ORIGIN, Vector3D::ZERO);
        assert!(project(&gaze, &HeadPose::default()).is_none());
    }

    #[test]
    fn test_invalid_sample_yields_none() {
        let mut sample = GazeSample::invalid(1, 0);
        assert!(project_sample(&sample, &HeadPose::default()).is_none());

        sample.status = GazeStatus::Valid;
        assert!(project_sample(&sample, &HeadPose::default()).is_some());
    }

    #[test]
    fn test_fixation_point_clamps_negative_distance() {
        let ray = Ray::forward();
        assert_eq!(fixation_point(&ray, -2.0), Point3D::ORIGIN);
        assert_eq!(fixation_point(&ray, 2.0), Point3D::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_fixation_prefers_probe_hit() {
        let ray = Ray::forward();
        let hit = ProbeResult::Hit(ProbeHit {
            object: ObjectId(1),
            point: Point3D::new(0.0, 0.0, 3.0),
            normal: -Vector3D::FORWARD,
            distance: 3.0,
            sweep_distance: 2.9,
        });
        let fixation = resolve_fixation(&ray, &hit, 1.5);
        assert_eq!(fixation.source, FixationSource::ProbeHit);
        assert_eq!(fixation.point, Point3D::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_fixation_on_miss_uses_focus_then_fallback() {
        let ray = Ray::forward();
        let miss = ProbeResult::Miss {
            point: Point3D::new(0.0, 0.0, 2.0),
            distance: 2.0,
        };

        let fixation = resolve_fixation(&ray, &miss, 1.5);
        assert_eq!(fixation.source, FixationSource::FocusDistance);
        assert_eq!(fixation.point, Point3D::new(0.0, 0.0, 1.5));

        let fixation = resolve_fixation(&ray, &miss, 0.0);
        assert_eq!(fixation.source, FixationSource::Fallback);
        assert_eq!(fixation.distance, 2.0);
    }
}
