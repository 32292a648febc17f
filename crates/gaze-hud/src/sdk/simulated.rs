//! Software headset for development without eye-tracking hardware
//!
//! Produces head-local gaze samples around a steerable direction with jitter,
//! blinks and a calibration procedure that takes a number of ticks.

use std::collections::VecDeque;
use std::time::Duration;

use gaze_hud_config::SimulatorConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    CalibrationMode, EyeStatus, GazeRay, GazeSample, GazeSampleSource, GazeStatus, OutputFilter,
    Result, SdkError,
};
use crate::spatial::{Point3D, Quaternion};

/// Samples kept when nobody drains the buffer
const MAX_BUFFERED: usize = 256;
/// Yaw/pitch limit of the simulated eyes, in radians
const MAX_GAZE_ANGLE: f32 = 0.8;
/// Fraction of raw jitter left under the standard output filter
const FILTERED_JITTER: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Calibration {
    Uncalibrated,
    InProgress { mode: CalibrationMode, remaining: u32 },
    Calibrated(CalibrationMode),
}

/// Simulated eye-tracking headset
pub struct SimulatedHeadset {
    config: SimulatorConfig,
    rng: StdRng,
    /// Head-local gaze angles
    gaze_yaw: f32,
    gaze_pitch: f32,
    focus_distance: f32,
    allowed: bool,
    calibration: Calibration,
    filter: OutputFilter,
    frame_number: u64,
    elapsed: Duration,
    latest: Option<GazeSample>,
    buffer: VecDeque<GazeSample>,
}

impl SimulatedHeadset {
    /// Create a headset from simulator settings
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            gaze_yaw: 0.0,
            gaze_pitch: 0.0,
            focus_distance: 1.5,
            allowed: true,
            calibration: Calibration::Uncalibrated,
            filter: OutputFilter::Standard,
            frame_number: 0,
            elapsed: Duration::ZERO,
            latest: None,
            buffer: VecDeque::new(),
        }
    }

    /// Move the simulated eyes by the given yaw and pitch deltas (radians)
    pub fn steer(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.gaze_yaw = (self.gaze_yaw + yaw_delta).clamp(-MAX_GAZE_ANGLE, MAX_GAZE_ANGLE);
        self.gaze_pitch = (self.gaze_pitch + pitch_delta).clamp(-MAX_GAZE_ANGLE, MAX_GAZE_ANGLE);
    }

    /// Current head-local gaze angles (yaw, pitch)
    pub fn gaze_angles(&self) -> (f32, f32) {
        (self.gaze_yaw, self.gaze_pitch)
    }

    /// Distance the simulated eyes converge at
    pub fn set_focus_distance(&mut self, distance: f32) {
        self.focus_distance = distance.max(0.0);
    }

    /// Simulate the user granting or revoking eye-tracking permission
    pub fn set_allowed(&mut self, allowed: bool) {
        self.allowed = allowed;
    }

    /// Whether a calibration is running
    pub fn is_calibrating(&self) -> bool {
        matches!(self.calibration, Calibration::InProgress { .. })
    }

    fn progress_calibration(&mut self) {
        if let Calibration::InProgress { mode, remaining } = self.calibration {
            if remaining <= 1 {
                info!("Simulated {} calibration complete", mode.name());
                self.calibration = Calibration::Calibrated(mode);
            } else {
                self.calibration = Calibration::InProgress {
                    mode,
                    remaining: remaining - 1,
                };
            }
        }
    }

    fn jitter(&mut self) -> f32 {
        let amplitude = match self.filter {
            OutputFilter::Standard => self.config.jitter * FILTERED_JITTER,
            OutputFilter::Unfiltered => self.config.jitter,
        };
        if amplitude > 0.0 {
            self.rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }

    fn next_sample(&mut self, timestamp_ns: u64) -> GazeSample {
        self.frame_number += 1;
        let frame_number = self.frame_number;

        let status = match self.calibration {
            Calibration::Uncalibrated => return GazeSample::invalid(frame_number, timestamp_ns),
            Calibration::InProgress { .. } => GazeStatus::Adjust,
            Calibration::Calibrated(_) => GazeStatus::Valid,
        };

        if self.config.blink_probability > 0.0
            && self.rng.gen_bool(f64::from(self.config.blink_probability))
        {
            return GazeSample::invalid(frame_number, timestamp_ns);
        }

        let yaw = self.gaze_yaw + self.jitter();
        let pitch = self.gaze_pitch + self.jitter();
        let forward = Quaternion::from_yaw_pitch(yaw, pitch).forward();

        // Eyes converge on the focus point in front of the combined origin
        let focus_point = Point3D::ORIGIN + forward * self.focus_distance.max(0.1);
        let half_ipd = self.config.ipd * 0.5;
        let left_origin = Point3D::new(-half_ipd, 0.0, 0.0);
        let right_origin = Point3D::new(half_ipd, 0.0, 0.0);

        let eye_status = match status {
            GazeStatus::Valid => EyeStatus::Tracked,
            _ => EyeStatus::Visible,
        };
        let stability_floor = match self.filter {
            OutputFilter::Standard => 0.8,
            OutputFilter::Unfiltered => 0.5,
        };

        GazeSample {
            frame_number,
            timestamp_ns,
            status,
            gaze: GazeRay::new(Point3D::ORIGIN, forward),
            left_status: eye_status,
            left: GazeRay::new(left_origin, (focus_point - left_origin).normalize()),
            left_pupil_size: self.rng.gen_range(0.35..0.6),
            right_status: eye_status,
            right: GazeRay::new(right_origin, (focus_point - right_origin).normalize()),
            right_pupil_size: self.rng.gen_range(0.35..0.6),
            focus_distance: self.focus_distance,
            focus_stability: self.rng.gen_range(stability_floor..=1.0),
        }
    }
}

impl GazeSampleSource for SimulatedHeadset {
    fn name(&self) -> &str {
        "simulated"
    }

    fn advance(&mut self, dt: Duration) {
        let start = self.elapsed;
        self.elapsed += dt;
        self.progress_calibration();

        if !self.allowed {
            return;
        }

        let count = self.config.samples_per_tick.max(1);
        let step = dt / count;
        for i in 1..=count {
            let timestamp = start + step * i;
            let sample = self.next_sample(timestamp.as_nanos() as u64);
            self.buffer.push_back(sample);
            self.latest = Some(sample);
        }
        while self.buffer.len() > MAX_BUFFERED {
            self.buffer.pop_front();
        }
    }

    fn latest_sample(&self) -> Option<GazeSample> {
        if self.allowed {
            self.latest
        } else {
            None
        }
    }

    fn samples_since_last_tick(&mut self) -> Vec<GazeSample> {
        self.buffer.drain(..).collect()
    }

    fn request_calibration(&mut self, mode: CalibrationMode) -> Result<()> {
        if !self.allowed {
            return Err(SdkError::NotAllowed);
        }
        debug!(
            "Simulated calibration started ({} ticks)",
            self.config.calibration_ticks
        );
        self.calibration = if self.config.calibration_ticks == 0 {
            Calibration::Calibrated(mode)
        } else {
            Calibration::InProgress {
                mode,
                remaining: self.config.calibration_ticks,
            }
        };
        Ok(())
    }

    fn output_filter(&self) -> OutputFilter {
        self.filter
    }

    fn set_output_filter(&mut self, filter: OutputFilter) -> Result<()> {
        if !self.allowed {
            return Err(SdkError::NotAllowed);
        }
        self.filter = filter;
        Ok(())
    }

    fn is_allowed(&self) -> bool {
        self.allowed
    }

    fn is_calibrated(&self) -> bool {
        matches!(self.calibration, Calibration::Calibrated(_))
    }
}
