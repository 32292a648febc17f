//! Per-tick gaze pipeline
//!
//! Each tick polls the gaze source, folds the sample into telemetry,
//! projects the gaze into the world, probes the scene, pushes what the user
//! looks at and moves the indicator. A tick without a valid sample leaves
//! the ray, probe result, fixation and indicator as they were and pushes
//! nothing. State persists only in memory.

use std::time::Duration;

use gaze_hud_config::{AppConfig, CalibrationConfig, IndicatorConfig, ProbeConfig};
use tracing::{debug, info, warn};

use crate::indicator::Indicator;
use crate::input::{Action, HeadPose};
use crate::projector::{self, Fixation};
use crate::scene::{probe, GazePush, ObjectId, ProbeResult, Scene};
use crate::sdk::{GazeSample, GazeSampleSource};
use crate::spatial::Ray;
use crate::telemetry::GazeTelemetry;

/// Everything the host loop hands to one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub head: HeadPose,
    pub actions: Vec<Action>,
    pub dt: Duration,
    /// Wall clock in milliseconds, recorded as capture time
    pub now_ms: i64,
}

impl FrameInput {
    pub fn new(head: HeadPose, dt: Duration) -> Self {
        Self {
            head,
            actions: Vec::new(),
            dt,
            now_ms: chrono::Local::now().timestamp_millis(),
        }
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// World gaze ray used for the probe
    pub ray: Ray,
    pub probe: ProbeResult,
    /// Where the eyes converge, and which distance placed it
    pub fixation: Fixation,
    pub indicator: Indicator,
    /// Object that received a gaze push this tick
    pub pushed: Option<ObjectId>,
    /// Buffered samples drained from the source
    pub samples_consumed: usize,
    /// Whether this tick had a valid sample
    pub sample_valid: bool,
}

/// Owns a gaze source and the scene it probes
pub struct GazeTracker<S: GazeSampleSource> {
    source: S,
    scene: Scene,
    calibration: CalibrationConfig,
    probe_config: ProbeConfig,
    indicator_config: IndicatorConfig,
    push: GazePush,
    /// Ray, probe result and fixation of the last valid tick
    last_gaze: Option<(Ray, ProbeResult, Fixation)>,
    last_sample: Option<GazeSample>,
    indicator: Indicator,
    telemetry: GazeTelemetry,
}

impl<S: GazeSampleSource> GazeTracker<S> {
    pub fn new(source: S, scene: Scene, config: &AppConfig) -> Self {
        Self {
            source,
            scene,
            calibration: config.calibration.clone(),
            probe_config: config.probe.clone(),
            indicator_config: config.indicator.clone(),
            push: GazePush::new(config.push.clone()),
            last_gaze: None,
            last_sample: None,
            indicator: Indicator::new(config.indicator.visible),
            telemetry: GazeTelemetry::new(),
        }
    }

    /// Request calibration if configured to do so at startup
    pub fn start(&mut self) {
        info!("Gaze tracker started with source '{}'", self.source.name());
        if self.calibration.on_start {
            self.request_calibration();
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn telemetry(&self) -> &GazeTelemetry {
        &self.telemetry
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Most recent sample seen, valid or not
    pub fn last_sample(&self) -> Option<&GazeSample> {
        self.last_sample.as_ref()
    }

    /// Run one tick of the pipeline
    pub fn tick(&mut self, input: FrameInput) -> FrameOutput {
        for action in &input.actions {
            self.apply_action(*action);
        }

        self.source.advance(input.dt);
        let drained = self.source.samples_since_last_tick();
        let samples_consumed = drained.len();
        let sample = drained
            .iter()
            .rev()
            .find(|s| s.is_valid())
            .copied()
            .or_else(|| self.source.latest_sample());
        if sample.is_some() {
            self.last_sample = sample;
        }

        self.telemetry.update(&input.head, sample.as_ref(), input.now_ms);
        self.telemetry.set_tracker_state(
            self.source.is_calibrated(),
            self.source.output_filter(),
            samples_consumed,
        );

        let projected = sample
            .as_ref()
            .and_then(|s| projector::project_sample(s, &input.head));
        let sample_valid = projected.is_some();

        let dt = input.dt.as_secs_f32();
        let mut pushed = None;
        let (ray, result, fixation) = match (projected, self.last_gaze) {
            (Some(ray), _) => {
                let result = probe(&self.scene, &ray, &self.probe_config);
                let focus = sample.map_or(0.0, |s| s.focus_distance);
                let fixation = projector::resolve_fixation(&ray, &result, focus);
                pushed = self.push.apply(&mut self.scene, &result, &ray, dt);
                self.indicator.update(&result, &ray, &self.indicator_config);
                self.last_gaze = Some((ray, result, fixation));
                (ray, result, fixation)
            }
            (None, Some(last)) => last,
            // No gaze yet: place the indicator along the head, never push
            (None, None) => {
                let ray = input.head.forward_ray();
                let result = probe(&self.scene, &ray, &self.probe_config);
                let fixation = projector::resolve_fixation(&ray, &result, 0.0);
                self.indicator.update(&result, &ray, &self.indicator_config);
                (ray, result, fixation)
            }
        };
        self.scene.step(dt);
        if sample_valid {
            self.telemetry.set_fixation(fixation);
        }

        debug!(
            "Tick: {} samples, valid={}, distance={:.3}",
            samples_consumed,
            sample_valid,
            result.distance()
        );

        FrameOutput {
            ray,
            probe: result,
            fixation,
            indicator: self.indicator.clone(),
            pushed,
            samples_consumed,
            sample_valid,
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::RequestCalibration => self.request_calibration(),
            Action::ToggleOutputFilter => {
                let filter = self.source.output_filter().toggled();
                match self.source.set_output_filter(filter) {
                    Ok(()) => info!("Output filter set to {}", filter),
                    Err(e) => warn!("Failed to set output filter: {}", e),
                }
            }
            Action::LogSample => self.log_sample(),
            Action::ToggleIndicator => {
                let visible = self.indicator.toggle_visibility();
                info!("Indicator {}", if visible { "shown" } else { "hidden" });
            }
            // Handled by the app loop
            Action::Quit => {}
        }
    }

    fn request_calibration(&mut self) {
        let mode = self.calibration.mode;
        match self.source.request_calibration(mode) {
            Ok(()) => info!("Requested {} calibration", mode.name()),
            Err(e) => warn!("Calibration request failed: {}", e),
        }
    }

    fn log_sample(&self) {
        let Some(sample) = self.source.latest_sample().or(self.last_sample) else {
            info!("No gaze sample to log");
            return;
        };
        match serde_json::to_string(&sample) {
            Ok(json) => info!(target: "gaze_hud::sample", "{}", json),
            Err(e) => warn!("Failed to serialize gaze sample: {}", e),
        }
    }
}
