//! Eye-tracker abstraction
//!
//! The headset runtime is an opaque collaborator behind [`GazeSampleSource`].
//! Two providers ship with the crate:
//! - [`SimulatedHeadset`] for running without hardware
//! - [`EyesFeatureSource`] for the generic XR "eyes" input feature

mod eyes;
mod sample;
mod simulated;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

pub use eyes::{EyesFeature, EyesFeatureSource};
pub use gaze_hud_config::CalibrationMode;
pub use sample::{EyeStatus, GazeRay, GazeSample, GazeStatus};
pub use simulated::SimulatedHeadset;

/// Errors reported by a gaze source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    #[error("Eye tracking is not allowed by the headset runtime")]
    NotAllowed,

    #[error("Operation not supported by this gaze source: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, SdkError>;

/// Smoothing applied by the tracker before samples are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OutputFilter {
    /// Runtime smoothing enabled
    #[default]
    Standard,
    /// Raw samples
    Unfiltered,
}

impl OutputFilter {
    /// The other filter setting
    pub fn toggled(&self) -> Self {
        match self {
            OutputFilter::Standard => OutputFilter::Unfiltered,
            OutputFilter::Unfiltered => OutputFilter::Standard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFilter::Standard => "Standard",
            OutputFilter::Unfiltered => "None",
        }
    }
}

impl fmt::Display for OutputFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Narrow polling interface over an eye-tracking runtime
pub trait GazeSampleSource {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Let the provider move its clock forward by one tick
    fn advance(&mut self, _dt: Duration) {}

    /// Most recent sample, if the runtime has produced one
    fn latest_sample(&self) -> Option<GazeSample>;

    /// Drain samples captured since the previous call, oldest first
    fn samples_since_last_tick(&mut self) -> Vec<GazeSample>;

    /// Ask the runtime to start a calibration. Completion is not reported.
    fn request_calibration(&mut self, mode: CalibrationMode) -> Result<()>;

    fn output_filter(&self) -> OutputFilter;

    fn set_output_filter(&mut self, filter: OutputFilter) -> Result<()>;

    /// Whether the user has allowed eye tracking
    fn is_allowed(&self) -> bool;

    fn is_calibrated(&self) -> bool;
}
