//! Telemetry snapshot shown on the HUD
//!
//! Values follow a last-known-good policy: fields backed by an invalid
//! sample keep whatever they held before.

use serde::Serialize;

use crate::input::HeadPose;
use crate::projector::Fixation;
use crate::sdk::{EyeStatus, GazeSample, GazeStatus, OutputFilter};
use crate::spatial::{Point3D, Quaternion, Vector3D};

/// Per-eye values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeTelemetry {
    pub status: EyeStatus,
    pub origin: Point3D,
    pub forward: Vector3D,
    pub pupil_size: f32,
}

impl Default for EyeTelemetry {
    fn default() -> Self {
        Self {
            status: EyeStatus::Invalid,
            origin: Point3D::ORIGIN,
            forward: Vector3D::FORWARD,
            pupil_size: 0.0,
        }
    }
}

impl EyeTelemetry {
    fn update(&mut self, status: EyeStatus, origin: Point3D, forward: Vector3D, pupil_size: f32) {
        self.status = status;
        if status.is_usable() {
            self.origin = origin;
            self.forward = forward;
            self.pupil_size = pupil_size;
        }
    }
}

/// A titled group of display lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetrySection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

impl TelemetrySection {
    fn new(title: &'static str, lines: Vec<String>) -> Self {
        Self { title, lines }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GazeTelemetry {
    pub display_position: Point3D,
    pub display_rotation: Quaternion,
    pub gaze_status: GazeStatus,
    pub gaze_origin: Point3D,
    pub gaze_forward: Vector3D,
    pub left: EyeTelemetry,
    pub right: EyeTelemetry,
    pub focus_distance: f32,
    pub focus_stability: f32,
    /// Fixation point of the last tick with a valid gaze
    pub fixation: Option<Fixation>,
    /// Wall clock of the last accepted valid sample, in milliseconds
    pub capture_time_ms: i64,
    pub calibrated: bool,
    pub output_filter: OutputFilter,
    /// Buffered samples drained on the last tick
    pub samples_consumed: usize,
    /// Frame number of the last sample that set the capture time
    #[serde(skip)]
    captured_frame: Option<u64>,
}

impl Default for GazeTelemetry {
    fn default() -> Self {
        Self {
            display_position: Point3D::ORIGIN,
            display_rotation: Quaternion::IDENTITY,
            gaze_status: GazeStatus::Invalid,
            gaze_origin: Point3D::ORIGIN,
            gaze_forward: Vector3D::FORWARD,
            left: EyeTelemetry::default(),
            right: EyeTelemetry::default(),
            focus_distance: 0.0,
            focus_stability: 0.0,
            fixation: None,
            capture_time_ms: 0,
            calibrated: false,
            output_filter: OutputFilter::Standard,
            samples_consumed: 0,
            captured_frame: None,
        }
    }
}

impl GazeTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick of data into the snapshot.
    ///
    /// Head pose and status fields always update. Combined gaze, focus and
    /// capture time update only for a valid sample; each eye only when it
    /// is tracked. A sample handed back again on a later tick keeps its
    /// original capture time.
    pub fn update(&mut self, head: &HeadPose, sample: Option<&GazeSample>, now_ms: i64) {
        self.display_position = head.position;
        self.display_rotation = head.rotation;

        let Some(sample) = sample else {
            self.gaze_status = GazeStatus::Invalid;
            return;
        };

        self.gaze_status = sample.status;
        if sample.status.is_valid() {
            self.gaze_origin = sample.gaze.origin;
            self.gaze_forward = sample.gaze.forward;
            self.focus_distance = sample.focus_distance;
            self.focus_stability = sample.focus_stability;
            let newer = self
                .captured_frame
                .map_or(true, |frame| sample.frame_number > frame);
            if newer {
                self.capture_time_ms = now_ms;
                self.captured_frame = Some(sample.frame_number);
            }
        }

        self.left.update(
            sample.left_status,
            sample.left.origin,
            sample.left.forward,
            sample.left_pupil_size,
        );
        self.right.update(
            sample.right_status,
            sample.right.origin,
            sample.right.forward,
            sample.right_pupil_size,
        );
    }

    pub fn set_fixation(&mut self, fixation: Fixation) {
        self.fixation = Some(fixation);
    }

    /// Record tracker state that is not part of a sample
    pub fn set_tracker_state(&mut self, calibrated: bool, filter: OutputFilter, consumed: usize) {
        self.calibrated = calibrated;
        self.output_filter = filter;
        self.samples_consumed = consumed;
    }

    /// Format the snapshot into labelled display sections
    pub fn sections(&self, precision: usize) -> Vec<TelemetrySection> {
        let eye = |eye: &EyeTelemetry| {
            vec![
                format!("Status: {}", eye.status),
                format!("Position (Origin): {}", eye.origin.format(precision)),
                format!("Position (Forward): {}", eye.forward.format(precision)),
                format!("Pupil Size: {:.precision$}", eye.pupil_size),
            ]
        };

        vec![
            TelemetrySection::new(
                "Display",
                vec![
                    format!("Position: {}", self.display_position.format(precision)),
                    format!("Rotation: {}", self.display_rotation.format(precision)),
                ],
            ),
            TelemetrySection::new(
                "Gaze",
                vec![
                    format!("Status: {}", self.gaze_status),
                    format!("Position (Origin): {}", self.gaze_origin.format(precision)),
                    format!("Position (Forward): {}", self.gaze_forward.format(precision)),
                ],
            ),
            TelemetrySection::new("Left Eye", eye(&self.left)),
            TelemetrySection::new("Right Eye", eye(&self.right)),
            TelemetrySection::new(
                "Focus",
                vec![
                    format!("Distance: {:.precision$}", self.focus_distance),
                    format!("Stability: {:.precision$}", self.focus_stability),
                    match &self.fixation {
                        Some(fixation) => format!(
                            "Fixation: {} ({})",
                            fixation.point.format(precision),
                            fixation.source
                        ),
                        None => "Fixation: none".to_string(),
                    },
                ],
            ),
            TelemetrySection::new(
                "Capture Time",
                vec![format!("Capture Time: {}", self.capture_time_ms)],
            ),
            TelemetrySection::new(
                "Tracker",
                vec![
                    format!(
                        "Calibration: {}",
                        if self.calibrated { "Done" } else { "Pending" }
                    ),
                    format!("Filter: {}", self.output_filter),
                    format!("Samples: {}", self.samples_consumed),
                ],
            ),
        ]
    }

    /// All section lines flattened, titles as headers
    pub fn to_lines(&self, precision: usize) -> Vec<String> {
        self.sections(precision)
            .into_iter()
            .flat_map(|section| {
                std::iter::once(format!("[{}]", section.title))
                    .chain(section.lines.into_iter().map(|line| format!("  {line}")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::GazeRay;

    fn valid_sample() -> GazeSample {
        GazeSample {
            frame_number: 1,
            timestamp_ns: 10,
            status: GazeStatus::Valid,
            gaze: GazeRay::new(Point3D::new(0.0, 0.0, 0.01), Vector3D::new(0.0, 0.6, 0.8)),
            left_status: EyeStatus::Tracked,
            left: GazeRay::new(Point3D::new(-0.03, 0.0, 0.0), Vector3D::FORWARD),
            left_pupil_size: 0.5,
            right_status: EyeStatus::Tracked,
            right: GazeRay::new(Point3D::new(0.03, 0.0, 0.0), Vector3D::FORWARD),
            right_pupil_size: 0.4,
            focus_distance: 1.25,
            focus_stability: 0.9,
        }
    }

    #[test]
    fn test_valid_sample_updates_everything() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_000);

        assert_eq!(telemetry.gaze_status, GazeStatus::Valid);
        assert_eq!(telemetry.gaze_forward, Vector3D::new(0.0, 0.6, 0.8));
        assert_eq!(telemetry.left.pupil_size, 0.5);
        assert_eq!(telemetry.focus_distance, 1.25);
        assert_eq!(telemetry.capture_time_ms, 1_000);
    }

    #[test]
    fn test_invalid_sample_keeps_last_known_good() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_000);
        let before = telemetry.clone();

        let moved = HeadPose::new(Point3D::new(1.0, 1.0, 1.0), Quaternion::IDENTITY);
        telemetry.update(&moved, Some(&GazeSample::invalid(2, 20)), 2_000);

        assert_eq!(telemetry.display_position, moved.position);
        assert_eq!(telemetry.gaze_status, GazeStatus::Invalid);
        assert_eq!(telemetry.left.status, EyeStatus::Invalid);
        assert_eq!(telemetry.gaze_forward, before.gaze_forward);
        assert_eq!(telemetry.left.origin, before.left.origin);
        assert_eq!(telemetry.right.pupil_size, before.right.pupil_size);
        assert_eq!(telemetry.focus_stability, before.focus_stability);
        assert_eq!(telemetry.capture_time_ms, 1_000);
    }

    #[test]
    fn test_repeated_sample_keeps_capture_time() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_000);
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_050);
        assert_eq!(telemetry.capture_time_ms, 1_000);

        let mut next = valid_sample();
        next.frame_number = 2;
        telemetry.update(&HeadPose::default(), Some(&next), 1_100);
        assert_eq!(telemetry.capture_time_ms, 1_100);
    }

    #[test]
    fn test_eyes_update_independently() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_000);

        let mut sample = valid_sample();
        sample.status = GazeStatus::Adjust;
        sample.left_status = EyeStatus::Invalid;
        sample.left_pupil_size = 0.9;
        sample.right_pupil_size = 0.7;
        sample.focus_distance = 9.0;
        telemetry.update(&HeadPose::default(), Some(&sample), 2_000);

        assert_eq!(telemetry.gaze_status, GazeStatus::Adjust);
        assert_eq!(telemetry.left.pupil_size, 0.5);
        assert_eq!(telemetry.right.pupil_size, 0.7);
        assert_eq!(telemetry.focus_distance, 1.25);
        assert_eq!(telemetry.capture_time_ms, 1_000);
    }

    #[test]
    fn test_missing_sample_marks_invalid() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_000);
        telemetry.update(&HeadPose::default(), None, 2_000);

        assert_eq!(telemetry.gaze_status, GazeStatus::Invalid);
        assert_eq!(telemetry.focus_distance, 1.25);
    }

    #[test]
    fn test_section_labels() {
        let mut telemetry = GazeTelemetry::new();
        telemetry.update(&HeadPose::default(), Some(&valid_sample()), 1_234);
        let sections = telemetry.sections(3);

        let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            ["Display", "Gaze", "Left Eye", "Right Eye", "Focus", "Capture Time", "Tracker"]
        );
        assert_eq!(sections[0].lines[0], "Position: (0.000, 1.600, 0.000)");
        assert_eq!(sections[0].lines[1], "Rotation: (0.000, 0.000, 0.000, 1.000)");
        assert_eq!(sections[1].lines[0], "Status: Valid");
        assert_eq!(sections[1].lines[2], "Position (Forward): (0.000, 0.600, 0.800)");
        assert_eq!(sections[2].lines[3], "Pupil Size: 0.500");
        assert_eq!(sections[4].lines[0], "Distance: 1.250");
        assert_eq!(sections[4].lines[2], "Fixation: none");
        assert_eq!(sections[5].lines[0], "Capture Time: 1234");
    }

    #[test]
    fn test_to_lines_includes_headers() {
        let lines = GazeTelemetry::new().to_lines(2);
        assert_eq!(lines[0], "[Display]");
        assert_eq!(lines[1], "  Position: (0.00, 0.00, 0.00)");
    }
}
