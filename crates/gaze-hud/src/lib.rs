//! gaze-hud: eye-tracking telemetry and gaze-to-world probing for XR headsets
//!
//! Each tick the [`GazeTracker`] polls a [`GazeSampleSource`], records the
//! sample as [`GazeTelemetry`], projects the gaze ray into the world using
//! the head pose, sweeps a small sphere along it through the [`Scene`], and
//! places an indicator where the gaze lands. Gazed-at interactive objects
//! receive a push.
//!
//! The [`app`] and [`widget`] modules draw the result as a terminal HUD.

pub mod app;
pub mod context;
pub mod indicator;
pub mod input;
pub mod projector;
pub mod renderer;
pub mod scene;
pub mod sdk;
pub mod spatial;
pub mod telemetry;
pub mod tracker;
pub mod widget;

// Re-export commonly used types
pub use app::{OpticalApp, OpticalAppRunner, TickInfo};
pub use context::FrameContext;
pub use indicator::Indicator;
pub use projector::{Fixation, FixationSource};
pub use input::{Action, HeadPose, InputEvent, InputSimulator, KeyBindings};
pub use renderer::{Color, RenderBackend, RenderError};
pub use scene::{ObjectId, ProbeResult, Scene, SceneObject, Shape};
pub use sdk::{GazeSample, GazeSampleSource, OutputFilter, SdkError, SimulatedHeadset};
pub use spatial::{Point3D, Quaternion, Ray, Transform, Vector3D};
pub use telemetry::GazeTelemetry;
pub use tracker::{FrameInput, FrameOutput, GazeTracker};
pub use widget::HudWidget;
