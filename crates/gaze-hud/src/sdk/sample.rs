//! Gaze samples as delivered by an eye tracker

use std::fmt;

use serde::Serialize;

use crate::spatial::{Point3D, Vector3D};

/// Quality of the combined gaze estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GazeStatus {
    /// No usable data
    #[default]
    Invalid,
    /// Headset is being adjusted or calibrated
    Adjust,
    /// Data is valid
    Valid,
}

impl GazeStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, GazeStatus::Valid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GazeStatus::Invalid => "Invalid",
            GazeStatus::Adjust => "Adjust",
            GazeStatus::Valid => "Valid",
        }
    }
}

impl fmt::Display for GazeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracking state of a single eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EyeStatus {
    /// Eye not tracked (closed or lost)
    #[default]
    Invalid,
    /// Eye visible but not fully tracked
    Visible,
    /// Tracked with compensation for headset slippage
    Compensated,
    /// Fully tracked
    Tracked,
}

impl EyeStatus {
    /// Whether the eye ray carries real data
    pub fn is_usable(&self) -> bool {
        !matches!(self, EyeStatus::Invalid)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EyeStatus::Invalid => "Invalid",
            EyeStatus::Visible => "Visible",
            EyeStatus::Compensated => "Compensated",
            EyeStatus::Tracked => "Tracked",
        }
    }
}

impl fmt::Display for EyeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A head-local ray: origin offset from the head and a forward direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GazeRay {
    pub origin: Point3D,
    pub forward: Vector3D,
}

impl GazeRay {
    pub fn new(origin: Point3D, forward: Vector3D) -> Self {
        Self { origin, forward }
    }
}

impl Default for GazeRay {
    fn default() -> Self {
        Self {
            origin: Point3D::ORIGIN,
            forward: Vector3D::FORWARD,
        }
    }
}

/// One eye-tracker frame. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GazeSample {
    /// Tracker frame counter
    pub frame_number: u64,
    /// Tracker clock at capture, in nanoseconds
    pub timestamp_ns: u64,
    /// Combined gaze
    pub status: GazeStatus,
    pub gaze: GazeRay,
    pub left_status: EyeStatus,
    pub left: GazeRay,
    /// Relative pupil size (0-1)
    pub left_pupil_size: f32,
    pub right_status: EyeStatus,
    pub right: GazeRay,
    pub right_pupil_size: f32,
    /// Distance from the gaze origin to the focus point, in meters
    pub focus_distance: f32,
    /// Confidence in the focus distance (0-1)
    pub focus_stability: f32,
}

impl GazeSample {
    /// A frame with nothing tracked
    pub fn invalid(frame_number: u64, timestamp_ns: u64) -> Self {
        Self {
            frame_number,
            timestamp_ns,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}
