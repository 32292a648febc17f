//! gaze-hud-app: terminal HUD for the gaze tracker
//!
//! Runs the tracker against the simulated headset and the demo scene.
//!
//! Controls:
//! - Space: request calibration
//! - F: toggle the output filter
//! - L: log the current sample
//! - I: show or hide the gaze indicator
//! - WASD: turn the head
//! - Arrow keys: move the eyes
//! - Q, Esc or Ctrl+C: quit
//!
//! Every binding except movement and Ctrl+C can be changed in the config file.

use std::time::Duration;

use anyhow::{Context, Result};
use gaze_hud::{
    app::{OpticalApp, OpticalAppRunner, TickInfo},
    context::FrameContext,
    input::{Action, HeadPose, InputEvent, InputSimulator, KeyBindings},
    renderer::RenderBackend,
    scene::Scene,
    sdk::SimulatedHeadset,
    tracker::{FrameInput, FrameOutput, GazeTracker},
    widget::{
        anchored::{GazeMarker, SceneView},
        hud::{StatusBar, TelemetryPanel},
        HudWidget,
    },
};
use gaze_hud_config::AppConfig;
use tracing::{debug, info};

/// Per-run state of the HUD
pub struct HudState {
    tracker: GazeTracker<SimulatedHeadset>,
    /// Actions received since the last tick
    pending: Vec<Action>,
    last_output: Option<FrameOutput>,
}

impl HudState {
    pub fn tracker(&self) -> &GazeTracker<SimulatedHeadset> {
        &self.tracker
    }

    pub fn last_output(&self) -> Option<&FrameOutput> {
        self.last_output.as_ref()
    }
}

/// The gaze HUD application
pub struct GazeHudApp {
    config: AppConfig,
    widgets: Vec<Box<dyn HudWidget>>,
}

impl GazeHudApp {
    pub fn new(config: AppConfig, bindings: &KeyBindings) -> Self {
        let widgets: Vec<Box<dyn HudWidget>> = vec![
            Box::new(SceneView::new("scene", config.push.tag.clone())),
            Box::new(GazeMarker::new("marker")),
            Box::new(TelemetryPanel::new("telemetry")),
            Box::new(StatusBar::new("status", bindings)),
        ];
        Self { config, widgets }
    }

    fn tracker_for(config: &AppConfig) -> GazeTracker<SimulatedHeadset> {
        let headset = SimulatedHeadset::new(config.simulator.clone());
        let mut tracker = GazeTracker::new(headset, Scene::demo(&config.push.tag), config);
        tracker.start();
        tracker
    }
}

impl OpticalApp for GazeHudApp {
    type State = HudState;

    fn init(&mut self) -> Self::State {
        let ids: Vec<&str> = self.widgets.iter().map(|w| w.id()).collect();
        debug!("HUD widgets: {}", ids.join(", "));
        HudState {
            tracker: Self::tracker_for(&self.config),
            pending: Vec::new(),
            last_output: None,
        }
    }

    fn handle_event(&mut self, event: InputEvent, state: &mut Self::State) -> bool {
        match event {
            InputEvent::SteerGaze { yaw, pitch } => {
                state.tracker.source_mut().steer(yaw, pitch);
            }
            InputEvent::Action(Action::Quit) => return false,
            InputEvent::Action(action) => state.pending.push(action),
            // The runner hands the head pose to every tick
            InputEvent::HeadPose(_) => {}
            InputEvent::Key(key) => debug!("Unbound key {:?}", key.code),
        }
        true
    }

    fn update(&mut self, state: &mut Self::State, tick: &TickInfo) {
        let input =
            FrameInput::new(tick.head, tick.delta_time).with_actions(state.pending.drain(..));
        let output = state.tracker.tick(input);
        // Eyes converge on whatever they look at
        state
            .tracker
            .source_mut()
            .set_focus_distance(output.probe.distance());
        state.last_output = Some(output);

        let ctx = FrameContext {
            tick: tick.count,
            time: tick.time,
            delta_time: tick.delta_time,
            precision: self.config.display.precision,
            telemetry: state.tracker.telemetry(),
            scene: state.tracker.scene(),
            output: state.last_output.as_ref(),
        };
        for widget in &mut self.widgets {
            widget.update(&ctx);
        }
    }

    fn render(&self, _state: &Self::State, backend: &mut dyn RenderBackend) {
        for widget in &self.widgets {
            widget.render(backend);
        }
    }
}

/// Outcome of a headless run
pub struct HeadlessRun {
    pub state: HudState,
    /// Text of the gaze status line after the last tick
    pub gaze_line: String,
}

impl HeadlessRun {
    /// Telemetry sections followed by the gaze status line
    pub fn report(&self, precision: usize) -> Vec<String> {
        let mut lines = self.state.tracker.telemetry().to_lines(precision);
        lines.push(self.gaze_line.clone());
        lines
    }
}

/// Run `ticks` ticks without a terminal, head fixed at the default pose
pub fn run_headless(config: &AppConfig, ticks: u64) -> HeadlessRun {
    let mut app = GazeHudApp::new(config.clone(), &KeyBindings::from_config(&config.keys));
    let mut state = app.init();
    let dt = Duration::from_millis(config.display.tick_rate_ms);
    let head = HeadPose::default();

    info!("Headless run for {} ticks", ticks);
    let mut time = Duration::ZERO;
    for count in 0..ticks {
        let tick = TickInfo {
            count,
            time,
            delta_time: dt,
            head,
        };
        app.update(&mut state, &tick);
        time = time.saturating_add(dt);
    }

    let mut marker = GazeMarker::new("marker");
    let ctx = FrameContext {
        tick: ticks,
        time,
        delta_time: dt,
        precision: config.display.precision,
        telemetry: state.tracker.telemetry(),
        scene: state.tracker.scene(),
        output: state.last_output.as_ref(),
    };
    marker.update(&ctx);

    HeadlessRun {
        state,
        gaze_line: marker.status_line(),
    }
}

/// Run the interactive HUD until the user quits
pub fn run_interactive(config: AppConfig) -> Result<()> {
    let bindings = KeyBindings::from_config(&config.keys);
    let tick_rate = Duration::from_millis(config.display.tick_rate_ms);
    let app = GazeHudApp::new(config, &bindings);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let mut runner = OpticalAppRunner::new(app, InputSimulator::new(bindings))
        .context("Failed to open the terminal")?
        .with_tick_rate(tick_rate);
    runtime
        .block_on(runner.run())
        .context("Terminal HUD failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaze_hud::sdk::GazeSampleSource;

    fn seeded_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.simulator.seed = Some(7);
        config.simulator.blink_probability = 0.0;
        config
    }

    #[test]
    fn test_headless_run_calibrates_and_tracks() {
        let config = seeded_config();
        let ticks = config.simulator.calibration_ticks as u64 + 5;
        let run = run_headless(&config, ticks);

        let tracker = run.state.tracker();
        assert!(tracker.source().is_calibrated());
        assert!(run.state.last_output().is_some_and(|o| o.sample_valid));
        assert!(tracker.telemetry().calibrated);
    }

    #[test]
    fn test_report_lists_sections_and_gaze_line() {
        let config = seeded_config();
        let run = run_headless(&config, 3);
        let report = run.report(config.display.precision);

        assert_eq!(report.first().map(String::as_str), Some("[Display]"));
        assert!(report.iter().any(|line| line == "[Capture Time]"));
        assert!(report.last().is_some_and(|line| line.starts_with("Gaze: ")));
    }

    #[test]
    fn test_huge_tick_rate_does_not_overflow_time() {
        let mut config = seeded_config();
        config.display.tick_rate_ms = u64::MAX;
        let run = run_headless(&config, 3);
        assert!(run.state.last_output().is_some());
    }

    #[test]
    fn test_quit_action_stops_app() {
        let config = seeded_config();
        let mut app = GazeHudApp::new(config, &KeyBindings::default());
        let mut state = app.init();

        assert!(app.handle_event(InputEvent::Action(Action::LogSample), &mut state));
        assert_eq!(state.pending, vec![Action::LogSample]);
        assert!(!app.handle_event(InputEvent::Action(Action::Quit), &mut state));
    }

    #[test]
    fn test_steering_moves_simulated_eyes() {
        let mut app = GazeHudApp::new(seeded_config(), &KeyBindings::default());
        let mut state = app.init();

        app.handle_event(InputEvent::SteerGaze { yaw: 0.1, pitch: -0.05 }, &mut state);
        let (yaw, pitch) = state.tracker().source().gaze_angles();
        assert!((yaw - 0.1).abs() < 1e-6);
        assert!((pitch + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_pending_actions_reach_tracker() {
        let mut app = GazeHudApp::new(seeded_config(), &KeyBindings::default());
        let mut state = app.init();
        let visible = state.tracker().indicator().visible;

        app.handle_event(InputEvent::Action(Action::ToggleIndicator), &mut state);
        let tick = TickInfo {
            count: 0,
            time: Duration::ZERO,
            delta_time: Duration::from_millis(50),
            head: HeadPose::default(),
        };
        app.update(&mut state, &tick);

        assert!(state.pending.is_empty());
        assert_eq!(state.tracker().indicator().visible, !visible);
    }
}
