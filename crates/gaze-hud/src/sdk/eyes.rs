//! Adapter for the generic XR "eyes" input feature

use std::collections::VecDeque;

use super::{
    CalibrationMode, EyeStatus, GazeRay, GazeSample, GazeSampleSource, GazeStatus, OutputFilter,
    Result, SdkError,
};
use crate::spatial::{Point3D, Quaternion, Vector3D};

/// Openness above which an eye counts as tracked
const OPEN_THRESHOLD: f32 = 0.5;
const MAX_BUFFERED: usize = 256;

/// One reading of the XR eyes feature, head-local
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyesFeature {
    pub left_position: Point3D,
    pub left_rotation: Quaternion,
    pub right_position: Point3D,
    pub right_rotation: Quaternion,
    pub fixation_point: Option<Point3D>,
    /// Lid openness (0 closed, 1 open)
    pub left_openness: f32,
    pub right_openness: f32,
    pub timestamp_ns: u64,
}

impl Default for EyesFeature {
    fn default() -> Self {
        Self {
            left_position: Point3D::new(-0.032, 0.0, 0.0),
            left_rotation: Quaternion::IDENTITY,
            right_position: Point3D::new(0.032, 0.0, 0.0),
            right_rotation: Quaternion::IDENTITY,
            fixation_point: None,
            left_openness: 1.0,
            right_openness: 1.0,
            timestamp_ns: 0,
        }
    }
}

fn eye_status(openness: f32) -> EyeStatus {
    if openness > OPEN_THRESHOLD {
        EyeStatus::Tracked
    } else {
        EyeStatus::Invalid
    }
}

/// Gaze source fed by pushing [`EyesFeature`] readings
///
/// The feature exposes no calibration or filter controls, so those requests
/// return [`SdkError::Unsupported`].
#[derive(Debug, Default)]
pub struct EyesFeatureSource {
    frame_number: u64,
    latest: Option<GazeSample>,
    buffer: VecDeque<GazeSample>,
}

impl EyesFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a feature reading into a sample and queue it
    pub fn push(&mut self, feature: EyesFeature) -> GazeSample {
        self.frame_number += 1;
        let sample = self.to_sample(&feature);
        self.latest = Some(sample);
        self.buffer.push_back(sample);
        while self.buffer.len() > MAX_BUFFERED {
            self.buffer.pop_front();
        }
        sample
    }

    fn to_sample(&self, feature: &EyesFeature) -> GazeSample {
        let left_status = eye_status(feature.left_openness);
        let right_status = eye_status(feature.right_openness);
        let left = GazeRay::new(feature.left_position, feature.left_rotation.forward());
        let right = GazeRay::new(feature.right_position, feature.right_rotation.forward());
        let origin = feature.left_position.midpoint(&feature.right_position);

        let (direction, focus_distance) = match feature.fixation_point {
            Some(point) => ((point - origin).try_normalize(), origin.distance(&point)),
            None => ((left.forward + right.forward).try_normalize(), 0.0),
        };

        let status = match direction {
            Some(_) if left_status.is_usable() || right_status.is_usable() => GazeStatus::Valid,
            _ => GazeStatus::Invalid,
        };

        GazeSample {
            frame_number: self.frame_number,
            timestamp_ns: feature.timestamp_ns,
            status,
            gaze: GazeRay::new(origin, direction.unwrap_or(Vector3D::FORWARD)),
            left_status,
            left,
            left_pupil_size: 0.0,
            right_status,
            right,
            right_pupil_size: 0.0,
            focus_distance,
            focus_stability: if feature.fixation_point.is_some() { 1.0 } else { 0.0 },
        }
    }
}

impl GazeSampleSource for EyesFeatureSource {
    fn name(&self) -> &str {
        "xr-eyes"
    }

    fn latest_sample(&self) -> Option<GazeSample> {
        self.latest
    }

    fn samples_since_last_tick(&mut self) -> Vec<GazeSample> {
        self.buffer.drain(..).collect()
    }

    fn request_calibration(&mut self, _mode: CalibrationMode) -> Result<()> {
        Err(SdkError::Unsupported("calibration"))
    }

    fn output_filter(&self) -> OutputFilter {
        OutputFilter::Standard
    }

    fn set_output_filter(&mut self, _filter: OutputFilter) -> Result<()> {
        Err(SdkError::Unsupported("output filter"))
    }

    fn is_allowed(&self) -> bool {
        true
    }

    fn is_calibrated(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixation_point_drives_gaze() {
        let mut source = EyesFeatureSource::new();
        let sample = source.push(EyesFeature {
            fixation_point: Some(Point3D::new(0.0, 0.0, 2.0)),
            ..EyesFeature::default()
        });

        assert!(sample.is_valid());
        assert_eq!(sample.gaze.origin, Point3D::ORIGIN);
        assert!((sample.gaze.forward.z - 1.0).abs() < 1e-5);
        assert!((sample.focus_distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_without_fixation_averages_eye_forwards() {
        let mut source = EyesFeatureSource::new();
        let sample = source.push(EyesFeature {
            left_rotation: Quaternion::from_yaw_pitch(0.2, 0.0),
            right_rotation: Quaternion::from_yaw_pitch(0.2, 0.0),
            ..EyesFeature::default()
        });

        assert!(sample.is_valid());
        assert!(sample.gaze.forward.x > 0.1);
        assert_eq!(sample.focus_distance, 0.0);
    }

    #[test]
    fn test_closed_eyes_invalidate() {
        let mut source = EyesFeatureSource::new();
        let sample = source.push(EyesFeature {
            left_openness: 0.1,
            right_openness: 0.0,
            ..EyesFeature::default()
        });

        assert_eq!(sample.status, GazeStatus::Invalid);
        assert_eq!(sample.left_status, EyeStatus::Invalid);
        assert_eq!(sample.right_status, EyeStatus::Invalid);
    }

    #[test]
    fn test_unsupported_controls() {
        let mut source = EyesFeatureSource::new();
        assert_eq!(
            source.request_calibration(CalibrationMode::Fast),
            Err(SdkError::Unsupported("calibration"))
        );
        assert!(source.set_output_filter(OutputFilter::Unfiltered).is_err());
    }

    #[test]
    fn test_buffer_drains() {
        let mut source = EyesFeatureSource::new();
        source.push(EyesFeature::default());
        source.push(EyesFeature::default());

        let samples = source.samples_since_last_tick();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].frame_number, 2);
        assert!(source.samples_since_last_tick().is_empty());
        assert!(source.latest_sample().is_some());
    }
}
